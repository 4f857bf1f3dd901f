//! Inbound frame decoder
//!
//! The decoder runs one attempt per poll cycle. It never waits longer than
//! the per-byte timeout for any read, and every failure leaves the caller
//! with "no frame this cycle" rather than a partial payload.

use alloc::vec::Vec;

use embedded_hal::delay::DelayNs;
use inkpad_hal::UartRx;

use crate::frame::{Frame, FrameError, Tag, INBOUND_TAG, LENGTH_LEN, MAX_PAYLOAD_SIZE, TAG_LEN};
use crate::read::{read_exact_timeout, ReadError, ReadTimeout};
use crate::stats::RxStats;

/// Errors from a decode attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError<E> {
    /// The frame was dropped
    Frame(FrameError),
    /// The UART reported an error
    Transport(E),
}

impl<E> From<FrameError> for DecodeError<E> {
    fn from(e: FrameError) -> Self {
        DecodeError::Frame(e)
    }
}

/// Decoder for frames sent to the terminal
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    tag: Tag,
    timeout: ReadTimeout,
    resync: bool,
    stats: RxStats,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new(INBOUND_TAG, ReadTimeout::default())
    }
}

impl FrameDecoder {
    /// Create a decoder accepting frames tagged `tag`
    pub fn new(tag: Tag, timeout: ReadTimeout) -> Self {
        Self {
            tag,
            timeout,
            resync: true,
            stats: RxStats::default(),
        }
    }

    /// Choose whether bytes following a malformed header are skipped
    ///
    /// When enabled (the default), a frame dropped for its length is
    /// followed by discarding buffered bytes up to the next byte that could
    /// start a tag. When disabled, those bytes are left for the next cycle.
    pub fn with_resync(mut self, resync: bool) -> Self {
        self.resync = resync;
        self
    }

    /// Tag this decoder accepts
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Per-byte timing
    pub fn timeout(&self) -> ReadTimeout {
        self.timeout
    }

    /// Receive counters
    pub fn stats(&self) -> &RxStats {
        &self.stats
    }

    /// Whether an attempt should start this cycle
    ///
    /// True once a whole tag's worth of bytes is buffered, or as soon as
    /// the buffer starts with the tag's first byte. A started header is
    /// then either completed or consumed by the per-byte timeout, so a
    /// fragment left by a peer reset cannot prefix the next frame.
    pub fn ready<R: UartRx>(&self, rx: &mut R) -> bool {
        match rx.bytes_available() {
            0 => false,
            n if n >= TAG_LEN => true,
            _ => rx.peek_byte() == Some(self.tag.first()),
        }
    }

    /// Attempt to decode one frame
    ///
    /// Returns `Ok(None)` when a stray byte was skipped or a zero-length
    /// frame was consumed, and `Err` when a frame was dropped.
    pub fn decode<R, D>(
        &mut self,
        rx: &mut R,
        delay: &mut D,
    ) -> Result<Option<Frame>, DecodeError<R::Error>>
    where
        R: UartRx,
        D: DelayNs,
    {
        let Some(first) = rx.peek_byte() else {
            return Ok(None);
        };

        if first != self.tag.first() {
            // Not a frame start: drop one byte and try again next cycle
            rx.try_read_byte().map_err(DecodeError::Transport)?;
            self.stats.record_discarded(1);
            return Ok(None);
        }

        let mut tag = [0u8; TAG_LEN];
        self.read(rx, delay, &mut tag)?;

        if Tag::new(tag) != self.tag {
            let dropped = rx.discard_buffered();
            self.stats.record_unknown_tag();
            self.stats.record_discarded(TAG_LEN + dropped);
            return Err(FrameError::UnknownTag.into());
        }

        let mut length = [0u8; LENGTH_LEN];
        self.read(rx, delay, &mut length)?;
        let length = u16::from_le_bytes(length);

        if length == 0 {
            return Ok(None);
        }

        if usize::from(length) > MAX_PAYLOAD_SIZE {
            self.stats.record_malformed();
            self.skip_to_tag_start(rx);
            return Err(FrameError::InvalidLength(length).into());
        }

        let len = usize::from(length);
        let mut payload = Vec::new();
        if payload.try_reserve_exact(len + 1).is_err() {
            self.stats.record_alloc_failure();
            self.skip_to_tag_start(rx);
            return Err(FrameError::OutOfMemory.into());
        }
        payload.resize(len, 0);

        // On timeout `payload` is dropped here along with the partial data
        self.read(rx, delay, &mut payload)?;

        self.stats.record_frame(len);
        Ok(Some(Frame::from_checked(self.tag, payload)))
    }

    fn read<R, D>(
        &mut self,
        rx: &mut R,
        delay: &mut D,
        buf: &mut [u8],
    ) -> Result<(), DecodeError<R::Error>>
    where
        R: UartRx,
        D: DelayNs,
    {
        read_exact_timeout(rx, delay, buf, self.timeout).map_err(|e| match e {
            ReadError::Timeout => {
                self.stats.record_timeout();
                DecodeError::Frame(FrameError::Timeout)
            }
            ReadError::Transport(e) => DecodeError::Transport(e),
        })
    }

    fn skip_to_tag_start<R: UartRx>(&mut self, rx: &mut R) {
        if !self.resync {
            return;
        }

        let pending = rx.bytes_available();
        let mut dropped = 0;
        for _ in 0..pending {
            match rx.peek_byte() {
                Some(byte) if byte != self.tag.first() => {
                    if !matches!(rx.try_read_byte(), Ok(Some(_))) {
                        break;
                    }
                    dropped += 1;
                }
                _ => break,
            }
        }
        self.stats.record_discarded(dropped);
    }
}
