//! Configuration types
//!
//! Terminal configuration stored as postcard binary data.

pub mod layout;
pub mod types;

pub use layout::*;
pub use types::*;
