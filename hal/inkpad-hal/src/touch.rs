//! Touch controller abstraction

/// A single touch sample in display pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchPoint {
    /// Horizontal position (0 = left edge)
    pub x: u16,
    /// Vertical position (0 = top edge)
    pub y: u16,
}

impl TouchPoint {
    /// Create a new touch point
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Touch controller
///
/// Implementations report the contacts of one scan. Controllers that
/// support multi-touch may fill several points; callers that only care about
/// single taps use the first.
pub trait TouchPanel {
    /// Error type for touch reads
    type Error;

    /// Check whether the controller has a new sample ready
    ///
    /// Must not block.
    fn touch_available(&mut self) -> bool;

    /// Read the latest scan into `points`
    ///
    /// Returns the number of points written (0 when nothing is touched).
    fn read_touch(&mut self, points: &mut [TouchPoint]) -> Result<usize, Self::Error>;
}
