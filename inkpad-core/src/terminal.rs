//! Terminal controller
//!
//! Owns the log, the composer and the refresh tracker together with the
//! collaborators, and runs the cooperative polling loop:
//!
//! ```text
//! loop {
//!     touch  -> key -> composer -> (send frame) -> refresh request
//!     serial -> frame -> log lines -> refresh request
//!     refresh tracker -> render -> panel commit
//!     sleep(poll interval)
//! }
//! ```
//!
//! Only panel errors leave the loop. Serial and touch errors cost at most
//! the current cycle.

use alloc::string::String;
use core::convert::Infallible;

use embedded_graphics::geometry::Point;
use embedded_hal::delay::DelayNs;
use inkpad_hal::{TouchPanel, TouchPoint, UartRx, UartTx};
use inkpad_protocol::{DecodeError, Frame, FrameDecoder, FrameEncoder, RxStats, TxStats};

use crate::composer::{Composer, Edit};
use crate::config::{ConfigError, TerminalConfig};
use crate::keyboard::{resolve_touch, KeyAction};
use crate::log::TerminalLog;
use crate::refresh::{Refresh, RefreshTracker, Region};
use crate::render::{render, View};
use crate::traits::EpaperPanel;

/// Contacts read per touch scan; only the first is used
pub const MAX_TOUCH_POINTS: usize = 5;

/// What happened during one [`Terminal::poll`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    /// Key under the first touch, if any
    pub key: Option<KeyAction>,
    /// Lines appended to the log from an inbound frame
    pub lines_received: usize,
    /// Whether the composed line was sent
    pub sent: bool,
    /// Draw performed at the end of the cycle
    pub refresh: Option<Refresh>,
}

/// E-paper terminal
pub struct Terminal<S, T, P, D> {
    config: TerminalConfig,
    serial: S,
    touch: T,
    panel: P,
    delay: D,
    decoder: FrameDecoder,
    encoder: FrameEncoder,
    log: TerminalLog,
    composer: Composer,
    refresh: RefreshTracker,
    touches: [TouchPoint; MAX_TOUCH_POINTS],
}

impl<S, T, P, D> Terminal<S, T, P, D>
where
    S: UartTx + UartRx,
    T: TouchPanel,
    P: EpaperPanel,
    D: DelayNs,
{
    /// Create a terminal from a validated configuration
    pub fn new(
        config: TerminalConfig,
        serial: S,
        touch: T,
        panel: P,
        delay: D,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let decoder = FrameDecoder::new(config.inbound(), config.read_timeout())
            .with_resync(config.resync_on_malformed);
        let encoder = FrameEncoder::new(config.outbound());
        let log = TerminalLog::with_capacity(config.log_capacity());

        Ok(Self {
            config,
            serial,
            touch,
            panel,
            delay,
            decoder,
            encoder,
            log,
            composer: Composer::new(),
            refresh: RefreshTracker::new(),
            touches: [TouchPoint::default(); MAX_TOUCH_POINTS],
        })
    }

    /// Draw the initial screen
    pub fn start(&mut self) -> Result<(), P::Error> {
        info!(
            "terminal up: {}x{}, {} log lines",
            self.config.layout.width,
            self.config.layout.height,
            self.log.capacity()
        );
        self.refresh.request_full();
        self.flush_display()?;
        Ok(())
    }

    /// Run one cycle: touch, then serial, then any pending draw
    pub fn poll(&mut self) -> Result<CycleReport, P::Error> {
        let mut report = CycleReport::default();

        if let Some(action) = self.poll_touch() {
            report.key = Some(action);
            report.sent = self.press(action);
        }
        report.lines_received = self.poll_serial();
        report.refresh = self.flush_display()?;

        Ok(report)
    }

    /// Draw the initial screen and poll forever
    ///
    /// Returns only when the panel fails.
    pub fn run(&mut self) -> Result<Infallible, P::Error> {
        self.start()?;
        loop {
            self.poll()?;
            self.delay.delay_ms(self.config.poll_interval_ms);
        }
    }

    /// Apply a key press as if it had been touched
    ///
    /// Returns `true` when Enter sent the composed line.
    pub fn press(&mut self, action: KeyAction) -> bool {
        trace!("key {}", action);
        match self.composer.apply(action) {
            Edit::Unchanged => false,
            Edit::Changed => {
                self.refresh.mark_dirty(Region::InputBar);
                false
            }
            Edit::Submit => self.submit(),
        }
    }

    /// Append the lines of an inbound frame to the log
    ///
    /// Returns the number of lines added.
    pub fn receive(&mut self, frame: &Frame) -> usize {
        let mut added = 0;
        for line in frame.lines() {
            self.log.append(String::from_utf8_lossy(line).into_owned());
            added += 1;
        }

        if added > 0 {
            debug!("received {} lines", added);
            self.refresh.mark_dirty(Region::Log);
        }
        added
    }

    /// Active configuration
    pub fn config(&self) -> &TerminalConfig {
        &self.config
    }

    /// Message log
    pub fn log(&self) -> &TerminalLog {
        &self.log
    }

    /// Line under composition
    pub fn input(&self) -> &str {
        self.composer.text()
    }

    /// Draw waiting for the next cycle, if any
    pub fn pending_refresh(&self) -> Option<Refresh> {
        self.refresh.pending()
    }

    /// Receive counters
    pub fn rx_stats(&self) -> &RxStats {
        self.decoder.stats()
    }

    /// Transmit counters
    pub fn tx_stats(&self) -> &TxStats {
        self.encoder.stats()
    }

    /// Serial port
    pub fn serial(&self) -> &S {
        &self.serial
    }

    /// Serial port, mutably
    pub fn serial_mut(&mut self) -> &mut S {
        &mut self.serial
    }

    /// Touch controller, mutably
    pub fn touch_mut(&mut self) -> &mut T {
        &mut self.touch
    }

    /// Panel
    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// Panel, mutably
    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    /// Give the collaborators back
    pub fn release(self) -> (S, T, P, D) {
        (self.serial, self.touch, self.panel, self.delay)
    }

    fn poll_touch(&mut self) -> Option<KeyAction> {
        if !self.touch.touch_available() {
            return None;
        }

        let count = match self.touch.read_touch(&mut self.touches) {
            Ok(count) => count,
            Err(_) => {
                warn!("touch read failed");
                return None;
            }
        };
        if count == 0 {
            return None;
        }

        let first = self.touches[0];
        let point = Point::new(i32::from(first.x), i32::from(first.y));
        let action = resolve_touch(&self.config.layout, point);
        if action.is_none() {
            trace!("touch at {},{} hit no key", first.x, first.y);
        }
        action
    }

    fn poll_serial(&mut self) -> usize {
        if !self.decoder.ready(&mut self.serial) {
            return 0;
        }

        match self.decoder.decode(&mut self.serial, &mut self.delay) {
            Ok(Some(frame)) => self.receive(&frame),
            Ok(None) => 0,
            Err(DecodeError::Frame(e)) => {
                warn!("inbound frame dropped: {}", e);
                0
            }
            Err(DecodeError::Transport(_)) => {
                warn!("serial read failed");
                0
            }
        }
    }

    fn submit(&mut self) -> bool {
        let text = self.composer.text().as_bytes();
        match self.encoder.send(&mut self.serial, text) {
            Ok(sent) => {
                debug!("sent {} bytes", sent);
                let text = self.composer.take();
                let marker = self.config.outgoing_marker.as_str();

                let mut line = String::with_capacity(marker.len() + text.len());
                line.push_str(marker);
                line.push_str(&text);
                self.log.append(line);

                self.refresh.request_full();
                true
            }
            Err(_) => {
                warn!("send failed, keeping input");
                false
            }
        }
    }

    fn flush_display(&mut self) -> Result<Option<Refresh>, P::Error> {
        let Some(refresh) = self.refresh.take() else {
            return Ok(None);
        };

        let view = View {
            layout: &self.config.layout,
            log: &self.log,
            input: self.composer.text(),
            marker: self.config.outgoing_marker.as_str(),
        };
        if let Err(e) = render(&mut self.panel, &view, refresh) {
            self.refresh.restore(refresh);
            return Err(e);
        }

        Ok(Some(refresh))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::vec::Vec;
    use inkpad_hal::mock::{MockClock, MockDelay, MockSerial, MockTouch};
    use inkpad_protocol::{Frame, INBOUND_TAG};

    use crate::config::Layout;
    use crate::testing::{within, RecordingPanel};

    type TestTerminal = Terminal<MockSerial, MockTouch, RecordingPanel, MockDelay>;

    fn terminal() -> (MockClock, TestTerminal) {
        let clock = MockClock::new();
        let serial = MockSerial::with_clock(clock.clone());
        let delay = MockDelay::new(clock.clone());
        let panel = RecordingPanel::new(Layout::DEFAULT.bounds().size);

        let mut terminal =
            Terminal::new(TerminalConfig::default(), serial, MockTouch::new(), panel, delay)
                .unwrap();
        terminal.start().unwrap();
        (clock, terminal)
    }

    /// Center of character key `row`, `col` on the default layout
    fn key(row: u16, col: u16) -> (u16, u16) {
        (col * 54 + 27, 660 + row * 60 + 30)
    }

    const DEL: (u16, u16) = (80, 930);
    const SEND: (u16, u16) = (460, 930);

    fn tap(terminal: &mut TestTerminal, (x, y): (u16, u16)) -> CycleReport {
        terminal.touch_mut().tap(x, y);
        terminal.poll().unwrap()
    }

    fn inbound(payload: &[u8]) -> Vec<u8> {
        Frame::new(INBOUND_TAG, payload).unwrap().encode_to_vec()
    }

    fn lines(terminal: &TestTerminal) -> Vec<&str> {
        terminal.log().lines().collect()
    }

    #[test]
    fn test_start_draws_full_screen() {
        let (_, terminal) = terminal();
        assert_eq!(terminal.panel().full_commits(), 1);
        assert_eq!(terminal.panel().clears, 1);
        assert_eq!(terminal.pending_refresh(), None);
    }

    #[test]
    fn test_inbound_lines_appended_in_order() {
        let (_, mut terminal) = terminal();
        terminal.serial_mut().push_rx(&inbound(b"hello\nworld"));

        let report = terminal.poll().unwrap();

        assert_eq!(report.lines_received, 2);
        assert_eq!(lines(&terminal), ["hello", "world"]);
        assert_eq!(
            report.refresh,
            Some(Refresh::Partial {
                log: true,
                input_bar: false
            })
        );
        assert_eq!(
            terminal.panel().partial_commits(),
            [Layout::DEFAULT.region(Region::Log)]
        );
    }

    #[test]
    fn test_touch_types_key_under_finger() {
        let (_, mut terminal) = terminal();

        let report = tap(&mut terminal, key(1, 3));

        assert_eq!(report.key, Some(KeyAction::Char('r')));
        assert_eq!(terminal.input(), "r");
        assert_eq!(
            report.refresh,
            Some(Refresh::Partial {
                log: false,
                input_bar: true
            })
        );
    }

    #[test]
    fn test_typing_never_touches_keyboard() {
        let (_, mut terminal) = terminal();
        tap(&mut terminal, key(0, 0));

        let record = terminal.panel().commits.last().copied().unwrap();
        let input_bar = Layout::DEFAULT.region(Region::InputBar);
        assert!(within(&record.painted.unwrap(), &input_bar));
        assert_eq!(terminal.panel().full_commits(), 1);
    }

    #[test]
    fn test_compose_and_send() {
        let (_, mut terminal) = terminal();
        tap(&mut terminal, key(2, 5));
        tap(&mut terminal, key(1, 7));
        assert_eq!(terminal.input(), "hi");

        let report = tap(&mut terminal, SEND);

        assert!(report.sent);
        assert_eq!(report.key, Some(KeyAction::Enter));
        assert_eq!(report.refresh, Some(Refresh::Full));
        assert_eq!(terminal.serial().wire(), b"SEND\x02\x00hi");
        assert_eq!(terminal.serial().flush_count(), 1);
        assert_eq!(lines(&terminal), ["> hi"]);
        assert_eq!(terminal.input(), "");
        assert_eq!(terminal.panel().full_commits(), 2);
        assert_eq!(terminal.tx_stats().frames, 1);
    }

    #[test]
    fn test_enter_on_empty_sends_nothing() {
        let (_, mut terminal) = terminal();

        let report = tap(&mut terminal, SEND);

        assert!(!report.sent);
        assert_eq!(report.refresh, None);
        assert!(terminal.serial().wire().is_empty());
        assert!(terminal.log().is_empty());
    }

    #[test]
    fn test_backspace_on_empty_requests_nothing() {
        let (_, mut terminal) = terminal();
        let commits = terminal.panel().commits.len();

        let report = tap(&mut terminal, DEL);

        assert_eq!(report.key, Some(KeyAction::Backspace));
        assert_eq!(report.refresh, None);
        assert_eq!(terminal.input(), "");
        assert_eq!(terminal.panel().commits.len(), commits);
    }

    #[test]
    fn test_backspace_and_space_edit_input() {
        let (_, mut terminal) = terminal();
        terminal.press(KeyAction::Char('a'));
        terminal.press(KeyAction::Space);
        terminal.press(KeyAction::Char('b'));
        terminal.press(KeyAction::Backspace);
        assert_eq!(terminal.input(), "a ");
    }

    #[test]
    fn test_send_failure_keeps_input() {
        let (_, mut terminal) = terminal();
        terminal.press(KeyAction::Char('o'));
        terminal.press(KeyAction::Char('k'));
        terminal.poll().unwrap();
        terminal.serial_mut().set_fail_writes(true);

        let report = tap(&mut terminal, SEND);

        assert!(!report.sent);
        assert_eq!(report.refresh, None);
        assert_eq!(terminal.input(), "ok");
        assert!(terminal.log().is_empty());
        assert_eq!(terminal.tx_stats().failures, 1);

        terminal.serial_mut().set_fail_writes(false);
        let report = tap(&mut terminal, SEND);
        assert!(report.sent);
        assert_eq!(lines(&terminal), ["> ok"]);
    }

    #[test]
    fn test_multi_touch_uses_first_point() {
        let (_, mut terminal) = terminal();
        let (rx, ry) = key(1, 3);
        terminal
            .touch_mut()
            .multi(&[TouchPoint::new(rx, ry), TouchPoint::new(DEL.0, DEL.1)]);

        let report = terminal.poll().unwrap();

        assert_eq!(report.key, Some(KeyAction::Char('r')));
        assert_eq!(terminal.input(), "r");
    }

    #[test]
    fn test_touch_outside_keys_ignored() {
        let (_, mut terminal) = terminal();

        let report = tap(&mut terminal, (100, 100));

        assert_eq!(report.key, None);
        assert_eq!(report.refresh, None);
    }

    #[test]
    fn test_stale_tag_fragment_then_frame() {
        let (clock, mut terminal) = terminal();
        terminal.serial_mut().push_rx(b"REC");

        let report = terminal.poll().unwrap();
        assert_eq!(report.lines_received, 0);
        assert_eq!(terminal.rx_stats().timeouts, 1);
        assert_eq!(clock.now_ms(), 1000);

        terminal.serial_mut().push_rx(&inbound(b"ok"));
        let report = terminal.poll().unwrap();
        assert_eq!(report.lines_received, 1);
        assert_eq!(lines(&terminal), ["ok"]);
        assert_eq!(terminal.rx_stats().unknown_tags, 0);
    }

    #[test]
    fn test_few_stray_bytes_do_not_stall() {
        let (clock, mut terminal) = terminal();
        terminal.serial_mut().push_rx(b"xy");

        let report = terminal.poll().unwrap();

        assert_eq!(report.lines_received, 0);
        assert_eq!(clock.now_ms(), 0);
    }

    #[test]
    fn test_partial_header_times_out_then_recovers() {
        let (clock, mut terminal) = terminal();
        terminal.serial_mut().push_rx(b"RECV\x05");

        let report = terminal.poll().unwrap();
        assert_eq!(report.lines_received, 0);
        assert!(terminal.log().is_empty());
        assert_eq!(terminal.rx_stats().timeouts, 1);
        assert!(clock.now_ms() >= 1000);
        assert!(clock.now_ms() < 1100);

        terminal.serial_mut().push_rx(&inbound(b"ok"));
        let report = terminal.poll().unwrap();
        assert_eq!(report.lines_received, 1);
        assert_eq!(lines(&terminal), ["ok"]);
    }

    #[test]
    fn test_unknown_tag_is_dropped() {
        let (_, mut terminal) = terminal();
        terminal.serial_mut().push_rx(b"RXYZ\x02\x00hi");

        let report = terminal.poll().unwrap();

        assert_eq!(report.lines_received, 0);
        assert_eq!(terminal.rx_stats().unknown_tags, 1);
        assert!(terminal.log().is_empty());
    }

    #[test]
    fn test_log_keeps_newest_lines() {
        let (_, mut terminal) = terminal();
        let payload: Vec<String> = (0..25).map(|i| format!("line {}", i)).collect();
        terminal
            .serial_mut()
            .push_rx(&inbound(payload.join("\n").as_bytes()));

        let report = terminal.poll().unwrap();

        assert_eq!(report.lines_received, 25);
        assert_eq!(terminal.log().len(), 19);
        assert_eq!(terminal.log().get(0), Some("line 6"));
        assert_eq!(terminal.log().newest(), Some("line 24"));
    }

    #[test]
    fn test_typing_and_receiving_in_one_cycle() {
        let (_, mut terminal) = terminal();
        terminal.serial_mut().push_rx(&inbound(b"ping"));
        let (x, y) = key(0, 1);
        terminal.touch_mut().tap(x, y);

        let report = terminal.poll().unwrap();

        assert_eq!(report.key, Some(KeyAction::Char('2')));
        assert_eq!(report.lines_received, 1);
        assert_eq!(
            report.refresh,
            Some(Refresh::Partial {
                log: true,
                input_bar: true
            })
        );
    }

    #[test]
    fn test_panel_error_returned_and_draw_retried() {
        let (_, mut terminal) = terminal();
        terminal.panel_mut().fail_commits = true;
        terminal.press(KeyAction::Char('x'));

        assert!(terminal.poll().is_err());
        assert!(terminal.pending_refresh().is_some());

        terminal.panel_mut().fail_commits = false;
        let report = terminal.poll().unwrap();
        assert_eq!(
            report.refresh,
            Some(Refresh::Partial {
                log: false,
                input_bar: true
            })
        );
    }

    #[test]
    fn test_run_returns_on_panel_failure() {
        let clock = MockClock::new();
        let mut panel = RecordingPanel::new(Layout::DEFAULT.bounds().size);
        panel.fail_commits = true;
        let mut terminal = Terminal::new(
            TerminalConfig::default(),
            MockSerial::with_clock(clock.clone()),
            MockTouch::new(),
            panel,
            MockDelay::new(clock),
        )
        .unwrap();

        assert!(terminal.run().is_err());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let clock = MockClock::new();
        let config = TerminalConfig {
            inbound_tag: *b"SEND",
            ..TerminalConfig::default()
        };
        let result = Terminal::new(
            config,
            MockSerial::with_clock(clock.clone()),
            MockTouch::new(),
            RecordingPanel::new(Layout::DEFAULT.bounds().size),
            MockDelay::new(clock),
        );
        assert!(matches!(result, Err(ConfigError::DuplicateTag)));
    }

    #[test]
    fn test_custom_marker_and_tags() {
        let clock = MockClock::new();
        let mut config = TerminalConfig::default();
        config.outbound_tag = *b"TXD0";
        config.inbound_tag = *b"RXD0";
        config.outgoing_marker.clear();
        let _ = config.outgoing_marker.push_str("me: ");

        let mut terminal = Terminal::new(
            config,
            MockSerial::with_clock(clock.clone()),
            MockTouch::new(),
            RecordingPanel::new(Layout::DEFAULT.bounds().size),
            MockDelay::new(clock),
        )
        .unwrap();
        terminal.start().unwrap();

        terminal.press(KeyAction::Char('y'));
        assert!(terminal.press(KeyAction::Enter));
        assert_eq!(terminal.serial().wire(), b"TXD0\x01\x00y");
        assert_eq!(lines(&terminal), ["me: y"]);

        terminal.serial_mut().push_rx(b"RXD0\x02\x00ok");
        assert_eq!(terminal.poll().unwrap().lines_received, 1);
    }
}
