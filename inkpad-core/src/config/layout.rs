//! Panel geometry
//!
//! The panel is split into three horizontal bands, top to bottom:
//!
//! ```text
//! ┌──────────────────────────┐ 0
//! │ log (N lines)            │
//! ├──────────────────────────┤ input_bar_top
//! │ > input_                 │
//! ├──────────────────────────┤ keyboard_top
//! │ 4 rows × 10 char keys    │
//! │ DEL  │  SPACE   │  SEND  │
//! └──────────────────────────┘ height
//! ```

use embedded_graphics::geometry::{Point, Size};
use embedded_graphics::primitives::Rectangle;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::refresh::Region;

/// Character keys per row
pub const KEY_COLUMNS: u16 = 10;

/// Rows of character keys
pub const CHAR_ROWS: u16 = 4;

/// Keyboard rows including the control row
pub const KEY_ROWS: u16 = CHAR_ROWS + 1;

/// Pixel geometry of the panel and its regions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Layout {
    /// Panel width in pixels
    pub width: u16,
    /// Panel height in pixels
    pub height: u16,
    /// Gap above the first log line and left of all text
    pub margin: u16,
    /// Height of one log line
    pub line_height: u16,
    /// Height of the input bar
    pub input_bar_height: u16,
    /// Height of one keyboard row
    pub key_height: u16,
}

impl Default for Layout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Layout {
    /// 540×960 portrait panel
    pub const DEFAULT: Self = Self {
        width: 540,
        height: 960,
        margin: 10,
        line_height: 30,
        input_bar_height: 60,
        key_height: 60,
    };

    /// Top edge of the keyboard
    pub const fn keyboard_top(&self) -> u16 {
        self.height.saturating_sub(KEY_ROWS.saturating_mul(self.key_height))
    }

    /// Top edge of the input bar
    pub const fn input_bar_top(&self) -> u16 {
        self.keyboard_top().saturating_sub(self.input_bar_height)
    }

    /// Top edge of the first log line
    pub const fn log_top(&self) -> u16 {
        self.margin
    }

    /// Vertical space available to log lines
    pub const fn log_height(&self) -> u16 {
        self.input_bar_top().saturating_sub(self.margin)
    }

    /// Number of log lines that fit
    pub const fn max_lines(&self) -> usize {
        if self.line_height == 0 {
            0
        } else {
            (self.log_height() / self.line_height) as usize
        }
    }

    /// Width of one character key
    pub const fn key_width(&self) -> u16 {
        self.width / KEY_COLUMNS
    }

    /// Horizontal pixel offset of `units` tenths of the panel width
    pub const fn tenths(&self, units: u16) -> u16 {
        ((self.width as u32 * units as u32) / KEY_COLUMNS as u32) as u16
    }

    /// Whether the regions fit on the panel
    pub fn is_valid(&self) -> bool {
        let stacked = u32::from(KEY_ROWS) * u32::from(self.key_height)
            + u32::from(self.input_bar_height)
            + u32::from(self.margin);

        self.width >= KEY_COLUMNS
            && self.key_height > 0
            && self.line_height > 0
            && self.input_bar_height > 0
            && stacked < u32::from(self.height)
            && self.max_lines() > 0
    }

    /// Whole panel
    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(
            Point::zero(),
            Size::new(u32::from(self.width), u32::from(self.height)),
        )
    }

    /// Pixel band occupied by `region`
    pub fn region(&self, region: Region) -> Rectangle {
        let (top, bottom) = match region {
            Region::Log => (0, self.input_bar_top()),
            Region::InputBar => (self.input_bar_top(), self.keyboard_top()),
            Region::Keyboard => (self.keyboard_top(), self.height),
        };
        Rectangle::new(
            Point::new(0, i32::from(top)),
            Size::new(u32::from(self.width), u32::from(bottom - top)),
        )
    }

    /// Top-left corner of log line `index`
    pub fn line_origin(&self, index: usize) -> Point {
        let y = u32::from(self.log_top()) + index as u32 * u32::from(self.line_height);
        Point::new(i32::from(self.margin), y as i32)
    }
}
