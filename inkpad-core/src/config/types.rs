//! Configuration type definitions
//!
//! [`TerminalConfig`] holds everything a board may want to tune: link
//! timing, frame tags, the marker on echoed messages, and panel geometry.
//! It is persisted as postcard-serialized binary data.

use heapless::String;
use inkpad_protocol::{ReadTimeout, Tag, INBOUND_TAG, OUTBOUND_TAG, TAG_LEN};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::layout::Layout;
use crate::log::MAX_LOG_LINES;

/// Current config format version
pub const CONFIG_VERSION: u8 = 1;

/// Maximum length of the outgoing-message marker
pub const MAX_MARKER_LEN: usize = 8;

/// Largest serialized config, in bytes
pub const MAX_CONFIG_SIZE: usize = 64;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Serialization failed (buffer too small)
    Serialize,
    /// Deserialization failed
    Deserialize,
    /// Config version mismatch
    VersionMismatch,
    /// A tag contains non-printable bytes
    InvalidTag,
    /// Inbound and outbound tags are identical
    DuplicateTag,
    /// Timeout or poll interval out of range
    InvalidTiming,
    /// Panel regions do not fit
    InvalidLayout,
}

/// Terminal configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TerminalConfig {
    /// Config format version
    pub version: u8,
    /// Longest wait for one byte of an inbound frame (ms)
    pub read_timeout_ms: u32,
    /// Pause between polls, both in the main loop and in bounded reads (ms)
    pub poll_interval_ms: u32,
    /// Tag for frames sent by the terminal
    pub outbound_tag: [u8; TAG_LEN],
    /// Tag for frames the terminal displays
    pub inbound_tag: [u8; TAG_LEN],
    /// Prefix of echoed local messages in the log
    pub outgoing_marker: String<MAX_MARKER_LEN>,
    /// Skip to the next plausible tag after a malformed length
    pub resync_on_malformed: bool,
    /// Panel geometry
    pub layout: Layout,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        let mut outgoing_marker = String::new();
        let _ = outgoing_marker.push_str("> ");

        Self {
            version: CONFIG_VERSION,
            read_timeout_ms: 1000,
            poll_interval_ms: 1,
            outbound_tag: *OUTBOUND_TAG.as_bytes(),
            inbound_tag: *INBOUND_TAG.as_bytes(),
            outgoing_marker,
            resync_on_malformed: true,
            layout: Layout::DEFAULT,
        }
    }
}

impl TerminalConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag written on outbound frames
    pub fn outbound(&self) -> Tag {
        Tag::new(self.outbound_tag)
    }

    /// Tag accepted on inbound frames
    pub fn inbound(&self) -> Tag {
        Tag::new(self.inbound_tag)
    }

    /// Bounded-read timing for the decoder
    pub fn read_timeout(&self) -> ReadTimeout {
        ReadTimeout {
            timeout_ms: self.read_timeout_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }

    /// Number of log lines kept and shown
    pub fn log_capacity(&self) -> usize {
        self.layout.max_lines().min(MAX_LOG_LINES)
    }

    /// Check the configuration for values the terminal cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.outbound().is_printable_ascii() || !self.inbound().is_printable_ascii() {
            return Err(ConfigError::InvalidTag);
        }
        if self.outbound_tag == self.inbound_tag {
            return Err(ConfigError::DuplicateTag);
        }
        if self.read_timeout_ms == 0
            || self.poll_interval_ms == 0
            || self.poll_interval_ms > self.read_timeout_ms
        {
            return Err(ConfigError::InvalidTiming);
        }
        if !self.layout.is_valid() {
            return Err(ConfigError::InvalidLayout);
        }
        Ok(())
    }

    /// Serialize into `buf`, returning the used part
    #[cfg(feature = "serde")]
    pub fn to_bytes<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Serialize)
    }

    /// Deserialize and validate a stored configuration
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;

        if config.version != CONFIG_VERSION {
            return Err(ConfigError::VersionMismatch);
        }
        config.validate()?;

        Ok(config)
    }
}
