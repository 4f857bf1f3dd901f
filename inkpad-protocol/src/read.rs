//! Bounded reads from a polled UART
//!
//! Every read waits at most [`ReadTimeout::timeout_ms`] per byte, checking
//! the receive buffer every [`ReadTimeout::poll_interval_ms`].

use embedded_hal::delay::DelayNs;
use inkpad_hal::UartRx;

/// Default per-byte wait
pub const DEFAULT_TIMEOUT_MS: u32 = 1000;

/// Default pause between buffer checks
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 1;

/// Timing for a bounded read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReadTimeout {
    /// Longest wait for any single byte (ms)
    pub timeout_ms: u32,
    /// Pause between receive-buffer checks (ms)
    pub poll_interval_ms: u32,
}

impl Default for ReadTimeout {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl ReadTimeout {
    /// Create a timeout with the default poll interval
    pub const fn millis(timeout_ms: u32) -> Self {
        Self {
            timeout_ms,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

/// Outcome of a failed bounded read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadError<E> {
    /// No byte arrived within the timeout
    Timeout,
    /// The UART reported an error
    Transport(E),
}

/// Read one byte, waiting at most `timeout.timeout_ms`
pub fn read_byte_timeout<R, D>(
    rx: &mut R,
    delay: &mut D,
    timeout: ReadTimeout,
) -> Result<u8, ReadError<R::Error>>
where
    R: UartRx,
    D: DelayNs,
{
    // A zero interval would spin without ever advancing the wait
    let step = timeout.poll_interval_ms.max(1);
    let mut waited_ms = 0u32;

    loop {
        if let Some(byte) = rx.try_read_byte().map_err(ReadError::Transport)? {
            return Ok(byte);
        }
        if waited_ms >= timeout.timeout_ms {
            return Err(ReadError::Timeout);
        }
        delay.delay_ms(step);
        waited_ms = waited_ms.saturating_add(step);
    }
}

/// Fill `buf` completely, applying the timeout to each byte
///
/// On timeout the bytes already read are lost to the caller; bytes still
/// buffered in the UART are left untouched.
pub fn read_exact_timeout<R, D>(
    rx: &mut R,
    delay: &mut D,
    buf: &mut [u8],
    timeout: ReadTimeout,
) -> Result<(), ReadError<R::Error>>
where
    R: UartRx,
    D: DelayNs,
{
    for slot in buf.iter_mut() {
        *slot = read_byte_timeout(rx, delay, timeout)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkpad_hal::mock::{MockClock, MockDelay, MockSerial};

    fn fixture() -> (MockClock, MockSerial, MockDelay) {
        let clock = MockClock::new();
        let serial = MockSerial::with_clock(clock.clone());
        let delay = MockDelay::new(clock.clone());
        (clock, serial, delay)
    }

    #[test]
    fn test_buffered_bytes_read_without_waiting() {
        let (_, mut serial, mut delay) = fixture();
        serial.push_rx(b"abc");

        let mut buf = [0u8; 3];
        read_exact_timeout(&mut serial, &mut delay, &mut buf, ReadTimeout::default()).unwrap();
        assert_eq!(&buf, b"abc");
        assert_eq!(delay.calls(), 0);
    }

    #[test]
    fn test_late_byte_within_timeout() {
        let (clock, mut serial, mut delay) = fixture();
        serial.schedule_rx(30, b"z");

        let byte = read_byte_timeout(&mut serial, &mut delay, ReadTimeout::millis(100)).unwrap();
        assert_eq!(byte, b'z');
        assert_eq!(clock.now_ms(), 30);
    }

    #[test]
    fn test_timeout_is_bounded() {
        let (clock, mut serial, mut delay) = fixture();

        let result = read_byte_timeout(&mut serial, &mut delay, ReadTimeout::millis(1000));
        assert_eq!(result, Err(ReadError::Timeout));
        assert_eq!(clock.now_ms(), 1000);
    }

    #[test]
    fn test_timeout_leaves_later_bytes_buffered() {
        let (_, mut serial, mut delay) = fixture();
        serial.push_rx(b"ab");
        serial.schedule_rx(500, b"c");

        let mut buf = [0u8; 3];
        let result = read_exact_timeout(&mut serial, &mut delay, &mut buf, ReadTimeout::millis(50));
        assert_eq!(result, Err(ReadError::Timeout));

        // The late byte is still delivered on a later attempt
        let byte = read_byte_timeout(&mut serial, &mut delay, ReadTimeout::millis(1000)).unwrap();
        assert_eq!(byte, b'c');
    }

    #[test]
    fn test_zero_poll_interval_still_terminates() {
        let (clock, mut serial, mut delay) = fixture();
        let timeout = ReadTimeout {
            timeout_ms: 5,
            poll_interval_ms: 0,
        };

        assert_eq!(
            read_byte_timeout(&mut serial, &mut delay, timeout),
            Err(ReadError::Timeout)
        );
        assert_eq!(clock.now_ms(), 5);
    }
}
