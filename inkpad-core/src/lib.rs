//! Board-agnostic logic for the e-paper terminal
//!
//! This crate contains everything between the raw collaborators (UART,
//! touch controller, panel) and the user:
//!
//! - Scrolling terminal log with oldest-line eviction
//! - On-screen keyboard layout and touch resolution
//! - Input composer (the line being typed)
//! - Full/partial refresh policy and region rendering
//! - Terminal configuration and its postcard persistence
//! - The [`Terminal`] controller that runs the polling loop

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

// Must come first so the logging macros are visible to later modules
mod fmt;

pub mod composer;
pub mod config;
pub mod keyboard;
pub mod log;
pub mod refresh;
pub mod render;
pub mod terminal;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use composer::{Composer, Edit};
pub use config::{ConfigError, Layout, TerminalConfig};
pub use keyboard::KeyAction;
pub use log::TerminalLog;
pub use refresh::{Refresh, RefreshTracker, Region};
pub use terminal::{CycleReport, Terminal};
pub use traits::EpaperPanel;
