//! Bounded reply buffer.
//!
//! [`ReplyBuffer`] is the only way replies get written. Every write goes
//! through [`ReplyBuffer::try_append`], which checks the remaining capacity
//! first and refuses the whole write if it does not fit.

use std::borrow::Cow;
use std::fmt;

use crate::error::{BabblerError, Result};
use crate::reply::ReplyCode;

/// A byte buffer that never grows past its capacity.
#[derive(Clone, PartialEq, Eq)]
pub struct ReplyBuffer {
    data: Vec<u8>,
    capacity: usize,
}

impl ReplyBuffer {
    /// Create an empty buffer that holds at most `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Maximum number of bytes this buffer accepts.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the capacity limit.
    ///
    /// Used to reserve tail room for framing. The limit never drops below
    /// the current length.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(self.data.len());
    }

    /// Bytes currently written.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes still available before the capacity limit.
    pub fn remaining(&self) -> usize {
        self.capacity - self.data.len()
    }

    /// Logically reinitialize the buffer.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Drop everything past `len`.
    pub fn truncate(&mut self, len: usize) {
        self.data.truncate(len);
    }

    /// Append `bytes` if they fit, otherwise leave the buffer untouched.
    pub fn try_append(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > self.remaining() {
            return Err(BabblerError::BufferOverflow {
                requested: bytes.len(),
                remaining: self.remaining(),
            });
        }
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Append a string slice.
    pub fn try_append_str(&mut self, s: &str) -> Result<()> {
        self.try_append(s.as_bytes())
    }

    /// Append a single byte.
    pub fn try_push(&mut self, byte: u8) -> Result<()> {
        self.try_append(&[byte])
    }

    /// Replace the contents with `s`.
    pub fn set_str(&mut self, s: &str) -> Result<()> {
        self.clear();
        self.try_append_str(s)
    }

    /// Replace the contents with `s` and report the resulting code.
    ///
    /// This is the one-liner most handlers need.
    pub fn reply(&mut self, s: &str) -> ReplyCode {
        let res = self.set_str(s);
        self.finish(res)
    }

    /// Collapse a write sequence into a reply code.
    ///
    /// Success yields the current length (or `NoReply` if empty), any error
    /// is mapped through [`ReplyCode::from`].
    pub fn finish(&self, res: Result<()>) -> ReplyCode {
        match res {
            Ok(()) => self.code(),
            Err(e) => {
                log::warn!("reply not completed: {e}");
                ReplyCode::from(&e)
            },
        }
    }

    /// Reply code describing the current contents.
    pub fn code(&self) -> ReplyCode {
        ReplyCode::from_len(self.data.len())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Contents as text, replacing invalid UTF-8.
    pub fn to_str_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }
}

impl fmt::Debug for ReplyBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplyBuffer")
            .field("data", &self.to_str_lossy())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl fmt::Write for ReplyBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.try_append_str(s).map_err(|_| fmt::Error)
    }
}
