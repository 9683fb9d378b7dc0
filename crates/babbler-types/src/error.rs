//! Error types for Babbler.

use std::io;

/// Errors produced by the Babbler engine and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum BabblerError {
    #[error("reply buffer overflow: {requested} bytes requested, {remaining} remaining")]
    BufferOverflow { requested: usize, remaining: usize },

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl BabblerError {
    /// Whether this error means the reply did not fit its buffer.
    pub fn is_overflow(&self) -> bool {
        matches!(self, Self::BufferOverflow { .. })
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, BabblerError>;
