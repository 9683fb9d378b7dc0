//! Engine and device configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no file
//! at all) yields a working serial-style setup: plain text commands, 128-byte
//! read buffer, 256-byte write buffer, newline-terminated replies.

use std::path::Path;

use serde::Deserialize;

use crate::error::{BabblerError, Result};

/// Bytes every top-level handler keeps free for the trailing newline and
/// terminator.
pub const FRAMING_RESERVE: usize = 2;

/// Default cap on command tokens (name included).
pub const DEFAULT_MAX_TOKENS: usize = 20;

/// Default read buffer size in bytes.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 128;

/// Default write buffer size in bytes.
pub const DEFAULT_WRITE_BUFFER_SIZE: usize = 256;

/// How an input packet is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolMode {
    /// One whitespace-separated command per packet.
    #[default]
    Simple,
    /// One JSON envelope per packet.
    Json,
    /// Several plain commands joined by the separator.
    Multi,
}

/// Which envelope, if any, wraps each reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapMode {
    #[default]
    None,
    Newline,
    Json,
    JsonId,
    Xml,
    XmlId,
}

/// Protocol engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    pub mode: ProtocolMode,
    /// Separator between batched commands.
    pub separator: String,
    pub wrap: WrapMode,
    /// Maximum tokens per command, name included.
    pub max_tokens: usize,
    pub read_buffer_size: usize,
    pub write_buffer_size: usize,
    /// Append `\n` to outgoing replies.
    pub add_newline: bool,
    /// Append a NUL terminator after the newline.
    pub add_terminator: bool,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            mode: ProtocolMode::Simple,
            separator: ";".to_string(),
            wrap: WrapMode::None,
            max_tokens: DEFAULT_MAX_TOKENS,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            write_buffer_size: DEFAULT_WRITE_BUFFER_SIZE,
            add_newline: true,
            add_terminator: false,
        }
    }
}

/// Identity strings reported by the device-info commands.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeviceInfo {
    pub name: String,
    pub model: String,
    pub serial_number: String,
    pub description: String,
    pub version: String,
    pub manufacturer: String,
    pub uri: String,
}

impl Default for DeviceInfo {
    fn default() -> Self {
        Self {
            name: "Babbler device".to_string(),
            model: "babbler".to_string(),
            serial_number: "000001".to_string(),
            description: "Babbler command protocol endpoint".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            manufacturer: "unknown".to_string(),
            uri: String::new(),
        }
    }
}

/// Transport settings for the daemon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// TCP port to serve on (0 = stdin/stdout).
    pub tcp_port: u16,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BabblerConfig {
    pub protocol: ProtocolConfig,
    pub device: DeviceInfo,
    pub transport: TransportConfig,
}

impl BabblerConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| BabblerError::Config(format!("babbler.toml: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        log::debug!("Loaded config from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        let p = &self.protocol;
        if p.max_tokens == 0 {
            return Err(BabblerError::Config("max_tokens must be at least 1".into()));
        }
        if p.separator.is_empty() {
            return Err(BabblerError::Config("separator must not be empty".into()));
        }
        if p.write_buffer_size <= FRAMING_RESERVE {
            return Err(BabblerError::Config(format!(
                "write_buffer_size must exceed {FRAMING_RESERVE} bytes"
            )));
        }
        if p.read_buffer_size == 0 {
            return Err(BabblerError::Config(
                "read_buffer_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
