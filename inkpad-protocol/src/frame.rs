//! Frame layout for the terminal link.
//!
//! Frame format:
//! - TAG (4 bytes): ASCII identifier of the frame kind
//! - LENGTH (2 bytes): payload length, little-endian (1-60000)
//! - PAYLOAD (LENGTH bytes): text, `\n`-delimited for inbound frames

use alloc::vec::Vec;

/// Size of a frame tag in bytes
pub const TAG_LEN: usize = 4;

/// Size of the length field in bytes
pub const LENGTH_LEN: usize = 2;

/// Size of the fixed frame header (TAG + LENGTH)
pub const HEADER_LEN: usize = TAG_LEN + LENGTH_LEN;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 60_000;

/// Tag for text composed on the terminal (terminal → host)
pub const OUTBOUND_TAG: Tag = Tag::new(*b"SEND");

/// Tag for text the terminal should display (host → terminal)
pub const INBOUND_TAG: Tag = Tag::new(*b"RECV");

/// Errors that can occur during frame handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// A bounded read ran out of time mid-frame
    Timeout,
    /// Tag did not match the expected frame kind
    UnknownTag,
    /// Length field outside 1..=MAX_PAYLOAD_SIZE
    InvalidLength(u16),
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Scratch buffer for the payload could not be allocated
    OutOfMemory,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// Four-byte frame identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tag([u8; TAG_LEN]);

impl Tag {
    /// Create a tag from its wire bytes
    pub const fn new(bytes: [u8; TAG_LEN]) -> Self {
        Self(bytes)
    }

    /// Wire bytes of this tag
    pub const fn as_bytes(&self) -> &[u8; TAG_LEN] {
        &self.0
    }

    /// First wire byte, used to spot a plausible frame start
    pub const fn first(&self) -> u8 {
        self.0[0]
    }

    /// Whether every byte is printable ASCII
    pub fn is_printable_ascii(&self) -> bool {
        self.0.iter().all(|b| b.is_ascii_graphic())
    }
}

impl From<[u8; TAG_LEN]> for Tag {
    fn from(bytes: [u8; TAG_LEN]) -> Self {
        Self(bytes)
    }
}

/// Build the fixed header for a frame
pub fn encode_header(tag: Tag, length: u16) -> [u8; HEADER_LEN] {
    let mut header = [0u8; HEADER_LEN];
    header[..TAG_LEN].copy_from_slice(tag.as_bytes());
    header[TAG_LEN..].copy_from_slice(&length.to_le_bytes());
    header
}

/// A decoded or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Frame kind
    pub tag: Tag,
    payload: Vec<u8>,
}

impl Frame {
    /// Create a new frame with the given tag and payload
    pub fn new(tag: Tag, payload: &[u8]) -> Result<Self, FrameError> {
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(FrameError::PayloadTooLarge);
        }

        Ok(Self {
            tag,
            payload: payload.to_vec(),
        })
    }

    /// Build a frame from a payload already checked against the size limit
    pub(crate) fn from_checked(tag: Tag, payload: Vec<u8>) -> Self {
        debug_assert!(payload.len() <= MAX_PAYLOAD_SIZE);
        Self { tag, payload }
    }

    /// Payload bytes
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Take the payload
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// Payload length as carried in the header
    pub fn length(&self) -> u16 {
        // Every constructor caps the payload at MAX_PAYLOAD_SIZE
        self.payload.len() as u16
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = HEADER_LEN + self.payload.len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        buffer[..HEADER_LEN].copy_from_slice(&encode_header(self.tag, self.length()));
        buffer[HEADER_LEN..frame_len].copy_from_slice(&self.payload);

        Ok(frame_len)
    }

    /// Encode this frame into a freshly allocated vector
    pub fn encode_to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.payload.len());
        out.extend_from_slice(&encode_header(self.tag, self.length()));
        out.extend_from_slice(&self.payload);
        out
    }

    /// Split the payload into display lines
    ///
    /// Lines break on `\n`; a trailing `\r` is dropped and empty lines are
    /// skipped. Text after the last line break still forms a line.
    pub fn lines(&self) -> impl Iterator<Item = &[u8]> {
        self.payload
            .split(|&b| b == b'\n')
            .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
            .filter(|line| !line.is_empty())
    }
}
