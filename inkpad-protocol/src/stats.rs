//! Link counters
//!
//! Counters saturate instead of wrapping; a long-running panel should show
//! "a lot" rather than restart from zero.

/// Receive-side counters kept by the decoder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxStats {
    /// Frames decoded successfully
    pub frames: u32,
    /// Payload bytes delivered in decoded frames
    pub payload_bytes: u32,
    /// Decode attempts aborted by a read timeout
    pub timeouts: u32,
    /// Frames dropped because of a foreign tag
    pub unknown_tags: u32,
    /// Frames dropped because of an oversized length
    pub malformed: u32,
    /// Frames dropped because the payload buffer could not be allocated
    pub alloc_failures: u32,
    /// Bytes thrown away while resynchronizing
    pub discarded_bytes: u32,
}

impl RxStats {
    pub(crate) fn record_frame(&mut self, payload_len: usize) {
        self.frames = self.frames.saturating_add(1);
        self.payload_bytes = self.payload_bytes.saturating_add(payload_len as u32);
    }

    pub(crate) fn record_timeout(&mut self) {
        self.timeouts = self.timeouts.saturating_add(1);
    }

    pub(crate) fn record_unknown_tag(&mut self) {
        self.unknown_tags = self.unknown_tags.saturating_add(1);
    }

    pub(crate) fn record_malformed(&mut self) {
        self.malformed = self.malformed.saturating_add(1);
    }

    pub(crate) fn record_alloc_failure(&mut self) {
        self.alloc_failures = self.alloc_failures.saturating_add(1);
    }

    pub(crate) fn record_discarded(&mut self, count: usize) {
        self.discarded_bytes = self.discarded_bytes.saturating_add(count as u32);
    }

    /// Total frames dropped for any reason
    pub fn dropped(&self) -> u32 {
        self.timeouts
            .saturating_add(self.unknown_tags)
            .saturating_add(self.malformed)
            .saturating_add(self.alloc_failures)
    }
}

/// Transmit-side counters kept by the encoder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxStats {
    /// Frames written and flushed
    pub frames: u32,
    /// Payload bytes sent
    pub payload_bytes: u32,
    /// Sends that hit the size limit and were cut short
    pub truncated: u32,
    /// Sends aborted by a UART error
    pub failures: u32,
}

impl TxStats {
    pub(crate) fn record_frame(&mut self, payload_len: usize, truncated: bool) {
        self.frames = self.frames.saturating_add(1);
        self.payload_bytes = self.payload_bytes.saturating_add(payload_len as u32);
        if truncated {
            self.truncated = self.truncated.saturating_add(1);
        }
    }

    pub(crate) fn record_failure(&mut self) {
        self.failures = self.failures.saturating_add(1);
    }
}
