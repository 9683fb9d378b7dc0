//! Packet accumulation over a byte stream.

use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

use babbler_types::error::Result;

/// Bytes requested from the stream per read call.
const CHUNK_SIZE: usize = 64;

/// Where the reader is within the current packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketState {
    /// No bytes of the next packet yet.
    Idle,
    /// Some bytes collected, boundary not reached.
    Accumulating,
    /// A full packet was handed out.
    Complete,
}

/// Splits a byte stream into packets.
///
/// Bytes are fed into the packet one at a time and the predicate is checked
/// after each, so a boundary in the middle of a read chunk is honoured and
/// the rest of the chunk is kept for the next packet. A packet also ends
/// when it reaches `capacity` bytes, and at end of stream.
pub struct PacketReader<R> {
    inner: R,
    capacity: usize,
    packet: Vec<u8>,
    pending: VecDeque<u8>,
    state: PacketState,
    eof: bool,
}

impl<R: Read> PacketReader<R> {
    /// Reader producing packets of at most `capacity` bytes (minimum 1).
    pub fn new(inner: R, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner,
            capacity,
            packet: Vec::with_capacity(capacity),
            pending: VecDeque::new(),
            state: PacketState::Idle,
            eof: false,
        }
    }

    pub fn state(&self) -> PacketState {
        self.state
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes already read from the stream but not yet part of a packet.
    pub fn buffered(&self) -> usize {
        self.pending.len()
    }

    /// Read the next packet.
    ///
    /// Returns `None` once the stream is exhausted. A partial packet left
    /// at end of stream is returned as is.
    pub fn next_packet<F>(&mut self, is_complete: F) -> Result<Option<&[u8]>>
    where
        F: Fn(&[u8]) -> bool,
    {
        self.packet.clear();
        self.state = PacketState::Idle;

        loop {
            while let Some(byte) = self.pending.pop_front() {
                self.packet.push(byte);
                self.state = PacketState::Accumulating;
                if is_complete(&self.packet) {
                    self.state = PacketState::Complete;
                    return Ok(Some(&self.packet));
                }
                if self.packet.len() >= self.capacity {
                    log::debug!("packet reached read buffer size {}", self.capacity);
                    self.state = PacketState::Complete;
                    return Ok(Some(&self.packet));
                }
            }

            if self.eof || !self.fill()? {
                self.eof = true;
                if self.packet.is_empty() {
                    return Ok(None);
                }
                log::debug!("flushing {}-byte partial packet at end of stream", self.packet.len());
                self.state = PacketState::Complete;
                return Ok(Some(&self.packet));
            }
        }
    }

    /// Pull one chunk from the stream; `false` at end of stream.
    fn fill(&mut self) -> Result<bool> {
        let mut chunk = [0u8; CHUNK_SIZE];
        loop {
            match self.inner.read(&mut chunk) {
                Ok(0) => return Ok(false),
                Ok(n) => {
                    self.pending.extend(&chunk[..n]);
                    return Ok(true);
                },
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}
