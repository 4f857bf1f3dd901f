//! On-screen keyboard
//!
//! Forty character keys in four rows of ten, plus a control row split
//! 3:4:3 into Backspace, Space and Enter. Character rows use uniform key
//! widths; control zones are measured in tenths of the panel width.

use embedded_graphics::geometry::{Point, Size};
use embedded_graphics::primitives::Rectangle;

use crate::config::{Layout, CHAR_ROWS, KEY_COLUMNS};
use crate::refresh::Region;

/// Character keys, row by row
pub const KEY_LAYOUT: &[u8; 40] = b"1234567890qwertyuiopasdfghjklzxcvbnm,.:_";

/// Control row zones as (action, start tenth, end tenth)
const CONTROL_ZONES: [(KeyAction, u16, u16); 3] = [
    (KeyAction::Backspace, 0, 3),
    (KeyAction::Space, 3, 7),
    (KeyAction::Enter, 7, 10),
];

/// What a key does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyAction {
    /// Type a character
    Char(char),
    /// Remove the last character
    Backspace,
    /// Type a space
    Space,
    /// Send the composed line
    Enter,
}

impl KeyAction {
    /// Label drawn on the key face
    ///
    /// Character keys write their label into `buf`.
    pub fn label<'a>(&self, buf: &'a mut [u8; 4]) -> &'a str {
        match self {
            KeyAction::Char(c) => c.encode_utf8(buf),
            KeyAction::Backspace => "DEL",
            KeyAction::Space => "SPACE",
            KeyAction::Enter => "SEND",
        }
    }
}

/// A key and where it sits on the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    /// Action on touch
    pub action: KeyAction,
    /// Touch and draw area
    pub bounds: Rectangle,
}

/// Action of a character key at `row`, `col`
pub fn char_key(row: usize, col: usize) -> Option<KeyAction> {
    if row >= usize::from(CHAR_ROWS) || col >= usize::from(KEY_COLUMNS) {
        return None;
    }
    KEY_LAYOUT
        .get(row * usize::from(KEY_COLUMNS) + col)
        .map(|&b| KeyAction::Char(char::from(b)))
}

/// Map a touch to the key under it
///
/// Returns `None` outside the keyboard and right of the last full column
/// of a character row.
pub fn resolve_touch(layout: &Layout, point: Point) -> Option<KeyAction> {
    if !layout.region(Region::Keyboard).contains(point) {
        return None;
    }

    // Inside the keyboard, so both coordinates are non-negative
    let x = point.x as u32;
    let row = (point.y as u32 - u32::from(layout.keyboard_top())) / u32::from(layout.key_height);

    if row < u32::from(CHAR_ROWS) {
        let col = x / u32::from(layout.key_width());
        char_key(row as usize, col as usize)
    } else {
        CONTROL_ZONES
            .iter()
            .find(|(_, _, end)| x < u32::from(layout.tenths(*end)))
            .map(|(action, _, _)| *action)
    }
}

/// Every key with its bounds, character rows first
pub fn keys(layout: &Layout) -> impl Iterator<Item = Key> + '_ {
    let key_width = u32::from(layout.key_width());
    let key_height = u32::from(layout.key_height);
    let top = i32::from(layout.keyboard_top());

    let chars = (0..usize::from(CHAR_ROWS)).flat_map(move |row| {
        (0..usize::from(KEY_COLUMNS)).filter_map(move |col| {
            let action = char_key(row, col)?;
            let origin = Point::new(
                (col as u32 * key_width) as i32,
                top + (row as u32 * key_height) as i32,
            );
            Some(Key {
                action,
                bounds: Rectangle::new(origin, Size::new(key_width, key_height)),
            })
        })
    });

    let control_top = top + (u32::from(CHAR_ROWS) * key_height) as i32;
    let controls = CONTROL_ZONES.iter().map(move |&(action, start, end)| {
        let left = layout.tenths(start);
        let right = layout.tenths(end);
        Key {
            action,
            bounds: Rectangle::new(
                Point::new(i32::from(left), control_top),
                Size::new(u32::from(right - left), key_height),
            ),
        }
    });

    chars.chain(controls)
}
