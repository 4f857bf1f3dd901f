//! Host-side test doubles
//!
//! A shared [`MockClock`] ties the pieces together: [`MockDelay`] advances it,
//! and [`MockSerial`] only makes scheduled bytes visible once the clock has
//! reached their arrival time. This lets tests script a peer that stalls in
//! the middle of a frame without sleeping.

use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;

use embedded_hal::delay::DelayNs;

use crate::touch::{TouchPanel, TouchPoint};
use crate::uart::{UartRx, UartTx};

const NS_PER_MS: u64 = 1_000_000;

/// Simulated monotonic clock shared between mocks
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    now_ns: Rc<Cell<u64>>,
}

impl MockClock {
    /// Create a clock starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time in nanoseconds
    pub fn now_ns(&self) -> u64 {
        self.now_ns.get()
    }

    /// Current time in whole milliseconds
    pub fn now_ms(&self) -> u64 {
        self.now_ns.get() / NS_PER_MS
    }

    /// Move the clock forward
    pub fn advance_ns(&self, ns: u64) {
        self.now_ns.set(self.now_ns.get().saturating_add(ns));
    }
}

/// Delay that advances a [`MockClock`] instead of sleeping
#[derive(Debug, Clone, Default)]
pub struct MockDelay {
    clock: MockClock,
    calls: usize,
}

impl MockDelay {
    /// Create a delay driving the given clock
    pub fn new(clock: MockClock) -> Self {
        Self { clock, calls: 0 }
    }

    /// Number of delay calls made so far
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.calls += 1;
        self.clock.advance_ns(u64::from(ns));
    }
}

/// Error reported by the mock serial port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MockError {
    /// Writes were configured to fail
    WriteFailed,
}

/// In-memory serial port
///
/// Written bytes sit in a pending queue until [`UartTx::flush`] moves them
/// to the wire log, so tests can check that a sender flushed.
#[derive(Debug, Default)]
pub struct MockSerial {
    clock: MockClock,
    scheduled: VecDeque<(u64, u8)>,
    rx: VecDeque<u8>,
    pending_tx: Vec<u8>,
    wire: Vec<u8>,
    flushes: usize,
    fail_writes: bool,
}

impl MockSerial {
    /// Create a port with its own clock
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a port whose scheduled bytes follow `clock`
    pub fn with_clock(clock: MockClock) -> Self {
        Self {
            clock,
            ..Self::default()
        }
    }

    /// Make bytes available for reading immediately
    pub fn push_rx(&mut self, bytes: &[u8]) {
        self.schedule_rx(0, bytes);
    }

    /// Make bytes available `after_ms` milliseconds from now
    ///
    /// Bytes keep their order relative to everything already scheduled.
    pub fn schedule_rx(&mut self, after_ms: u32, bytes: &[u8]) {
        let at = self.clock.now_ns() + u64::from(after_ms) * NS_PER_MS;
        for &byte in bytes {
            self.scheduled.push_back((at, byte));
        }
    }

    /// Bytes that have been written and flushed
    pub fn wire(&self) -> &[u8] {
        &self.wire
    }

    /// Take the flushed bytes, leaving the wire log empty
    pub fn take_wire(&mut self) -> Vec<u8> {
        core::mem::take(&mut self.wire)
    }

    /// Bytes written but not yet flushed
    pub fn pending_tx(&self) -> &[u8] {
        &self.pending_tx
    }

    /// Number of flush calls
    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    /// Make every subsequent write fail
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Feed everything flushed so far back into the receive side
    pub fn loopback(&mut self) {
        let wire = self.take_wire();
        self.push_rx(&wire);
    }

    fn release_due(&mut self) {
        let now = self.clock.now_ns();
        while let Some(&(at, byte)) = self.scheduled.front() {
            if at > now {
                break;
            }
            self.scheduled.pop_front();
            self.rx.push_back(byte);
        }
    }
}

impl UartRx for MockSerial {
    type Error = MockError;

    fn bytes_available(&mut self) -> usize {
        self.release_due();
        self.rx.len()
    }

    fn peek_byte(&mut self) -> Option<u8> {
        self.release_due();
        self.rx.front().copied()
    }

    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        self.release_due();
        Ok(self.rx.pop_front())
    }
}

impl UartTx for MockSerial {
    type Error = MockError;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(MockError::WriteFailed);
        }
        self.pending_tx.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(MockError::WriteFailed);
        }
        self.flushes += 1;
        self.wire.append(&mut self.pending_tx);
        Ok(())
    }
}

/// Scripted touch controller
///
/// Each queued report is returned by one `read_touch` call.
#[derive(Debug, Default)]
pub struct MockTouch {
    reports: VecDeque<Vec<TouchPoint>>,
}

impl MockTouch {
    /// Create a controller with nothing queued
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a single-finger tap
    pub fn tap(&mut self, x: u16, y: u16) {
        self.reports.push_back(alloc::vec![TouchPoint::new(x, y)]);
    }

    /// Queue a scan with several contacts
    pub fn multi(&mut self, points: &[TouchPoint]) {
        self.reports.push_back(points.to_vec());
    }
}

impl TouchPanel for MockTouch {
    type Error = core::convert::Infallible;

    fn touch_available(&mut self) -> bool {
        !self.reports.is_empty()
    }

    fn read_touch(&mut self, points: &mut [TouchPoint]) -> Result<usize, Self::Error> {
        let Some(report) = self.reports.pop_front() else {
            return Ok(0);
        };
        let n = report.len().min(points.len());
        points[..n].copy_from_slice(&report[..n]);
        Ok(n)
    }
}
