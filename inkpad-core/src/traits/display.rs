//! E-paper panel trait

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::DrawTarget;
use embedded_graphics::primitives::Rectangle;

/// Monochrome e-paper panel
///
/// Drawing goes to the panel's frame buffer through [`DrawTarget`]; nothing
/// reaches the glass until one of the commit methods is called.
/// `BinaryColor::On` is ink, `BinaryColor::Off` is paper.
pub trait EpaperPanel: DrawTarget<Color = BinaryColor> {
    /// Push the whole frame buffer with a full (flashing) update
    fn commit_full(&mut self) -> Result<(), Self::Error>;

    /// Push `area` of the frame buffer with a partial update
    fn commit_partial(&mut self, area: Rectangle) -> Result<(), Self::Error>;
}
