//! Refresh policy
//!
//! E-paper full refreshes are slow and flash the panel but leave no ghosting;
//! partial refreshes are fast but degrade over time. The tracker collects
//! dirty regions between draws and decides which kind to issue:
//!
//! - start-up and every sent message: full
//! - typing: partial, input bar only
//! - received lines: partial, log only
//!
//! The keyboard never changes, so it is only drawn by full refreshes.

/// A band of the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Region {
    /// Scrolling message log
    Log,
    /// Line under composition
    InputBar,
    /// On-screen keyboard
    Keyboard,
}

/// A draw to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Refresh {
    /// Clear and redraw everything, then commit a full update
    Full,
    /// Redraw only the flagged regions and commit partial updates
    Partial {
        /// Log changed
        log: bool,
        /// Input bar changed
        input_bar: bool,
    },
}

impl Refresh {
    /// Whether this draw repaints `region`
    pub fn includes(&self, region: Region) -> bool {
        match (self, region) {
            (Refresh::Full, _) => true,
            (Refresh::Partial { log, .. }, Region::Log) => *log,
            (Refresh::Partial { input_bar, .. }, Region::InputBar) => *input_bar,
            (Refresh::Partial { .. }, Region::Keyboard) => false,
        }
    }
}

/// Dirty-region tracker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshTracker {
    full: bool,
    log: bool,
    input_bar: bool,
}

impl RefreshTracker {
    /// Create a tracker with nothing pending
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a full refresh
    pub fn request_full(&mut self) {
        self.full = true;
    }

    /// Flag a region as changed
    ///
    /// The keyboard can only be drawn by a full refresh.
    pub fn mark_dirty(&mut self, region: Region) {
        match region {
            Region::Log => self.log = true,
            Region::InputBar => self.input_bar = true,
            Region::Keyboard => self.full = true,
        }
    }

    /// Whether a draw is pending
    pub fn is_pending(&self) -> bool {
        self.full || self.log || self.input_bar
    }

    /// The draw that would be issued now
    ///
    /// A pending full refresh absorbs any partial ones.
    pub fn pending(&self) -> Option<Refresh> {
        if self.full {
            Some(Refresh::Full)
        } else if self.log || self.input_bar {
            Some(Refresh::Partial {
                log: self.log,
                input_bar: self.input_bar,
            })
        } else {
            None
        }
    }

    /// Take the pending draw and reset the tracker
    pub fn take(&mut self) -> Option<Refresh> {
        let pending = self.pending();
        *self = Self::default();
        pending
    }

    /// Put back a draw that could not be performed
    pub fn restore(&mut self, refresh: Refresh) {
        match refresh {
            Refresh::Full => self.full = true,
            Refresh::Partial { log, input_bar } => {
                self.log |= log;
                self.input_bar |= input_bar;
            }
        }
    }
}
