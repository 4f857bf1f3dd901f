//! Inkpad Hardware Abstraction Layer
//!
//! This crate defines the collaborator traits the terminal core talks to.
//! Board support crates implement them for their UART and touch controller;
//! the core never touches registers directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  inkpad-core (Terminal polling loop)    │
//! └─────────────────────────────────────────┘
//!           │                     │
//!           ▼                     ▼
//! ┌───────────────────┐  ┌──────────────────┐
//! │ inkpad-protocol   │  │ TouchPanel       │
//! │ (frame codec)     │  │ (this crate)     │
//! └───────────────────┘  └──────────────────┘
//!           │
//!           ▼
//! ┌─────────────────────────────────────────┐
//! │  UartTx / UartRx (this crate)           │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`], [`uart::UartRx`] - Buffered serial transport
//! - [`touch::TouchPanel`] - Touch controller sampling
//!
//! Delays use [`embedded_hal::delay::DelayNs`] directly.

#![no_std]
#![deny(unsafe_code)]

#[cfg(any(test, feature = "mock"))]
extern crate alloc;

#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod touch;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use embedded_hal::delay::DelayNs;
pub use touch::{TouchPanel, TouchPoint};
pub use uart::{Uart, UartRx, UartTx};
