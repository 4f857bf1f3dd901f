//! Hardware abstraction traits
//!
//! The serial link and the touch controller are described by `inkpad-hal`.
//! The panel lives here because drawing is expressed with
//! `embedded-graphics`, which the HAL crate does not depend on.

pub mod display;

pub use display::EpaperPanel;
