//! Input composer
//!
//! Holds the line being typed. Editing is limited to appending at the end
//! and removing the last character.

use alloc::string::String;
use inkpad_protocol::MAX_PAYLOAD_SIZE;

use crate::keyboard::KeyAction;

/// Result of applying a key to the composer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edit {
    /// Nothing changed; no redraw needed
    Unchanged,
    /// The buffer changed; the input bar needs a redraw
    Changed,
    /// Enter on a non-empty buffer; the caller should send and then clear
    Submit,
}

/// Line under composition
#[derive(Debug, Clone)]
pub struct Composer {
    buffer: String,
    limit: usize,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

impl Composer {
    /// Create an empty composer limited to one frame's payload
    pub fn new() -> Self {
        Self::with_limit(MAX_PAYLOAD_SIZE)
    }

    /// Create an empty composer holding at most `limit` bytes
    pub fn with_limit(limit: usize) -> Self {
        Self {
            buffer: String::new(),
            limit,
        }
    }

    /// Current text
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether nothing has been typed
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Apply a key press
    ///
    /// Enter does not clear the buffer; call [`Composer::take`] once the
    /// text has actually been sent.
    pub fn apply(&mut self, action: KeyAction) -> Edit {
        match action {
            KeyAction::Char(c) => self.push(c),
            KeyAction::Space => self.push(' '),
            KeyAction::Backspace => match self.buffer.pop() {
                Some(_) => Edit::Changed,
                None => Edit::Unchanged,
            },
            KeyAction::Enter if self.buffer.is_empty() => Edit::Unchanged,
            KeyAction::Enter => Edit::Submit,
        }
    }

    /// Take the text, leaving the composer empty
    pub fn take(&mut self) -> String {
        core::mem::take(&mut self.buffer)
    }

    fn push(&mut self, c: char) -> Edit {
        if self.buffer.len() + c.len_utf8() > self.limit {
            return Edit::Unchanged;
        }
        self.buffer.push(c);
        Edit::Changed
    }
}
