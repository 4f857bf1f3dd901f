//! Inkpad serial frame protocol
//!
//! This crate defines the framing used between the e-paper terminal and the
//! host bridge that relays its messages. Frames are deliberately minimal:
//! ```text
//! ┌──────────┬────────────┬─────────────────┐
//! │ TAG      │ LENGTH     │ PAYLOAD         │
//! │ 4B ASCII │ 2B (LE)    │ 1–60000B text   │
//! └──────────┴────────────┴─────────────────┘
//! ```
//!
//! The terminal sends composed text under the outbound tag and displays
//! text received under the inbound tag. There is no checksum; the decoder
//! relies on the tag to resynchronize after stray or foreign bytes, and on
//! bounded per-byte reads so a stalled peer can never hang the poll loop.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod decoder;
pub mod encoder;
pub mod frame;
pub mod read;
pub mod stats;

pub use decoder::{DecodeError, FrameDecoder};
pub use encoder::{encode_text, FrameEncoder};
pub use frame::{
    Frame, FrameError, Tag, HEADER_LEN, INBOUND_TAG, MAX_PAYLOAD_SIZE, OUTBOUND_TAG, TAG_LEN,
};
pub use read::{read_byte_timeout, read_exact_timeout, ReadError, ReadTimeout};
pub use stats::{RxStats, TxStats};
