//! Outbound frame writer

use inkpad_hal::UartTx;

use crate::frame::{encode_header, Tag, MAX_PAYLOAD_SIZE, OUTBOUND_TAG};
use crate::stats::TxStats;

/// Write `text` as one frame under `tag` and flush
///
/// The payload is cut to [`MAX_PAYLOAD_SIZE`] bytes. Empty text writes
/// nothing. Returns the number of payload bytes sent; when this returns
/// `Ok`, the whole frame has left the UART.
pub fn encode_text<W: UartTx>(tx: &mut W, tag: Tag, text: &[u8]) -> Result<usize, W::Error> {
    let len = text.len().min(MAX_PAYLOAD_SIZE);
    if len == 0 {
        return Ok(0);
    }

    tx.write_blocking(&encode_header(tag, len as u16))?;
    tx.write_blocking(&text[..len])?;
    tx.flush()?;

    Ok(len)
}

/// Sends composed text and keeps transmit counters
#[derive(Debug, Clone)]
pub struct FrameEncoder {
    tag: Tag,
    stats: TxStats,
}

impl Default for FrameEncoder {
    fn default() -> Self {
        Self::new(OUTBOUND_TAG)
    }
}

impl FrameEncoder {
    /// Create an encoder for the given outbound tag
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            stats: TxStats::default(),
        }
    }

    /// Tag written on every frame
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Transmit counters
    pub fn stats(&self) -> &TxStats {
        &self.stats
    }

    /// Send `text` as one outbound frame
    ///
    /// See [`encode_text`].
    pub fn send<W: UartTx>(&mut self, tx: &mut W, text: &[u8]) -> Result<usize, W::Error> {
        match encode_text(tx, self.tag, text) {
            Ok(0) => Ok(0),
            Ok(sent) => {
                self.stats.record_frame(sent, sent < text.len());
                Ok(sent)
            }
            Err(e) => {
                self.stats.record_failure();
                Err(e)
            }
        }
    }
}
