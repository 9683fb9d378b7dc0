//! Reply codes and canonical reply tokens.
//!
//! Every reply-producing operation returns a [`ReplyCode`]. On the wire it
//! maps onto the classic integer contract: a positive byte count, `0` for
//! "send nothing", `-1` for a reply that did not fit, and any other negative
//! value for a handler-specific failure.

use crate::error::BabblerError;

/// Command completed.
pub const REPLY_OK: &str = "ok";
/// Command name is not registered (or the envelope carried none).
pub const REPLY_DONTUNDERSTAND: &str = "dontunderstand";
/// Command arguments were rejected.
pub const REPLY_BAD_PARAMS: &str = "badparams";
/// Generic failure.
pub const REPLY_ERROR: &str = "error";
/// Device cannot take the command right now.
pub const REPLY_BUSY: &str = "busy";
/// Rendering of [`ReplyCode::BufferError`].
pub const REPLY_BUF_ERROR: &str = "replybuferror";

/// Raw value of [`ReplyCode::BufferError`].
pub const BUFFER_ERROR_CODE: i32 = -1;

/// Raw code reported for failures that carry no code of their own.
pub const GENERIC_ERROR_CODE: i32 = -2;

/// Outcome of a reply-producing operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyCode {
    /// A reply of this many bytes sits in the buffer.
    Written(usize),
    /// Nothing should be sent back.
    NoReply,
    /// The reply did not fit. Buffer contents are not to be trusted.
    BufferError,
    /// Handler-specific failure code (always negative, never `-1`).
    Failed(i32),
}

impl ReplyCode {
    /// Build a code from a reply length; zero means no reply.
    pub fn from_len(len: usize) -> Self {
        if len == 0 { Self::NoReply } else { Self::Written(len) }
    }

    /// Decode the integer wire contract.
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            0 => Self::NoReply,
            n if n > 0 => Self::Written(n as usize),
            -1 => Self::BufferError,
            n => Self::Failed(i32::try_from(n).unwrap_or(i32::MIN)),
        }
    }

    /// Encode as the integer wire contract.
    pub fn raw(self) -> i64 {
        match self {
            Self::Written(n) => n as i64,
            Self::NoReply => 0,
            Self::BufferError => i64::from(BUFFER_ERROR_CODE),
            Self::Failed(code) => i64::from(code),
        }
    }

    /// Reply length, or zero for every non-success code.
    pub fn len(self) -> usize {
        match self {
            Self::Written(n) => n,
            _ => 0,
        }
    }

    /// Whether there is nothing to send.
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Whether the code is `BufferError` or a handler failure.
    pub fn is_error(self) -> bool {
        matches!(self, Self::BufferError | Self::Failed(_))
    }
}

impl From<&BabblerError> for ReplyCode {
    fn from(err: &BabblerError) -> Self {
        match err {
            BabblerError::BufferOverflow { .. } => Self::BufferError,
            _ => Self::Failed(GENERIC_ERROR_CODE),
        }
    }
}

impl From<BabblerError> for ReplyCode {
    fn from(err: BabblerError) -> Self {
        Self::from(&err)
    }
}
