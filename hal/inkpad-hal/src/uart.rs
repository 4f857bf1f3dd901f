//! UART serial communication abstractions
//!
//! The terminal polls the receiver once per cycle, so the receive side is
//! modelled as a driver-owned buffer that can be inspected without blocking.

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Blocks until all data has been queued or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    ///
    /// Returns once every queued byte has left the device.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// UART receiver
///
/// Non-blocking view of the driver's receive buffer.
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Number of received bytes waiting in the buffer
    fn bytes_available(&mut self) -> usize;

    /// Look at the next buffered byte without consuming it
    fn peek_byte(&mut self) -> Option<u8>;

    /// Take the next buffered byte
    ///
    /// Returns `Ok(None)` when the buffer is empty.
    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error>;

    /// Drop every byte that is buffered right now
    ///
    /// Bytes that arrive while draining are left alone. Returns the number
    /// of bytes dropped.
    fn discard_buffered(&mut self) -> usize {
        let pending = self.bytes_available();
        let mut dropped = 0;
        for _ in 0..pending {
            match self.try_read_byte() {
                Ok(Some(_)) => dropped += 1,
                _ => break,
            }
        }
        dropped
    }
}

/// Combined UART interface
///
/// For UARTs that provide both TX and RX on a single peripheral.
pub trait Uart: UartTx + UartRx {}

// Blanket implementation
impl<T: UartTx + UartRx> Uart for T {}
