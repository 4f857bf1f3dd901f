//! Scrolling terminal log
//!
//! A fixed-capacity ring of display lines. The oldest line is at index 0;
//! appending to a full log evicts exactly that line.

use alloc::string::String;
use heapless::Deque;

/// Storage ceiling for log lines, independent of panel geometry
pub const MAX_LOG_LINES: usize = 64;

/// One rendered row of the log
pub type TerminalLine = String;

/// Scrolling log of display lines
#[derive(Debug, Clone)]
pub struct TerminalLog<const N: usize = MAX_LOG_LINES> {
    lines: Deque<TerminalLine, N>,
    capacity: usize,
}

impl<const N: usize> Default for TerminalLog<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TerminalLog<N> {
    /// Create a log using all `N` slots
    pub fn new() -> Self {
        Self::with_capacity(N)
    }

    /// Create a log that keeps at most `capacity` lines
    ///
    /// `capacity` is clamped to `1..=N`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: Deque::new(),
            capacity: capacity.clamp(1, N.max(1)),
        }
    }

    /// Maximum number of lines kept
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of lines currently held
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the log holds no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether the next append will evict a line
    pub fn is_full(&self) -> bool {
        self.lines.len() >= self.capacity
    }

    /// Append a line, evicting the oldest when full
    ///
    /// Returns the evicted line, if any.
    pub fn append(&mut self, line: TerminalLine) -> Option<TerminalLine> {
        let evicted = if self.is_full() {
            self.lines.pop_front()
        } else {
            None
        };

        // capacity <= N, so there is always room after eviction
        let _ = self.lines.push_back(line);
        evicted
    }

    /// Lines from oldest to newest
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|line| line.as_str())
    }

    /// Line at `index` (0 = oldest)
    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.iter().nth(index).map(|line| line.as_str())
    }

    /// Most recent line
    pub fn newest(&self) -> Option<&str> {
        self.lines.back().map(|line| line.as_str())
    }

    /// Drop every line
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
