use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::animation::Mode;
use crate::compose::StrandFrame;
use crate::installation::Installation;
use crate::session::command::Command;
use crate::stream::{PixelSink, Transmitter};

/// Outcome of one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// Mode that produced the frame.
    pub mode: Mode,
    /// Ticks completed so far, this one included.
    pub tick: u64,
    /// Whether the sink accepted the frame.
    pub delivered: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    Shutdown,
    ChannelClosed,
    TickLimit,
}

/// Totals for one [`LightSession::run`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunStats {
    pub ticks: u64,
    pub delivered: u64,
    pub stop: StopReason,
}

/// Fixed-period tick driver.
///
/// Each tick applies queued commands, runs the active mode, composes the strands and hands them
/// to the sink, strictly in that order. Commands only ever land between ticks.
pub struct LightSession<S> {
    installation: Installation,
    tx: Transmitter<S>,
    pending: VecDeque<Command>,
    ticks: u64,
    shutdown: bool,
    last_frame: StrandFrame,
}

impl<S: PixelSink> LightSession<S> {
    pub fn new(installation: Installation, sink: S) -> Self {
        let send_twice = installation.config().stream.send_twice;
        let last_frame = installation.frame();
        Self {
            installation,
            tx: Transmitter::new(sink, send_twice),
            pending: VecDeque::new(),
            ticks: 0,
            shutdown: false,
            last_frame,
        }
    }

    pub fn installation(&self) -> &Installation {
        &self.installation
    }

    pub fn installation_mut(&mut self) -> &mut Installation {
        &mut self.installation
    }

    pub fn sink(&self) -> &S {
        self.tx.sink()
    }

    pub fn into_sink(self) -> S {
        self.tx.into_sink()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Last frame handed to the sink.
    pub fn last_frame(&self) -> &StrandFrame {
        &self.last_frame
    }

    /// Queue a command for the start of the next tick.
    pub fn submit(&mut self, cmd: Command) {
        self.pending.push_back(cmd);
    }

    /// Tick length of the active mode.
    pub fn tick_period(&self) -> Duration {
        self.installation.tick_rate().period()
    }

    #[tracing::instrument(skip(self))]
    pub fn tick(&mut self, elapsed: Duration) -> TickReport {
        while let Some(cmd) = self.pending.pop_front() {
            self.apply(cmd);
        }

        self.installation.update(elapsed);
        self.last_frame = self.installation.frame();
        let delivered = self.tx.send(self.last_frame.as_pixels());
        self.ticks += 1;

        TickReport {
            mode: self.installation.mode(),
            tick: self.ticks,
            delivered,
        }
    }

    fn apply(&mut self, cmd: Command) {
        tracing::debug!(%cmd, "applying command");
        match cmd {
            Command::SetMode(name) => {
                self.installation.request_mode(&name);
            }
            Command::Brightness(step) => {
                self.installation.adjust_brightness(step);
            }
            Command::Toggle(pt) => {
                self.installation.toggle(pt);
            }
            Command::Shutdown => self.shutdown = true,
        }
    }

    /// Drive ticks until shutdown, a closed command channel, or `max_ticks`, then fade out.
    ///
    /// Commands arriving while waiting out a tick are queued for the next one. The wait uses the
    /// period of the mode active when it began.
    pub fn run(&mut self, commands: &Receiver<Command>, max_ticks: Option<u64>) -> RunStats {
        let mut delivered = 0;
        let mut last = Instant::now();
        let stop = loop {
            if self.shutdown {
                break StopReason::Shutdown;
            }
            if max_ticks.is_some_and(|max| self.ticks >= max) {
                break StopReason::TickLimit;
            }

            let deadline = last + self.tick_period();
            let mut closed = false;
            loop {
                let wait = deadline.saturating_duration_since(Instant::now());
                if wait.is_zero() {
                    break;
                }
                match commands.recv_timeout(wait) {
                    Ok(cmd) => self.submit(cmd),
                    Err(RecvTimeoutError::Timeout) => break,
                    Err(RecvTimeoutError::Disconnected) => {
                        closed = true;
                        break;
                    }
                }
            }
            if closed && self.pending.is_empty() {
                break StopReason::ChannelClosed;
            }

            let now = Instant::now();
            let report = self.tick(now - last);
            last = now;
            if report.delivered {
                delivered += 1;
            }
            if closed {
                break StopReason::ChannelClosed;
            }
        };

        tracing::info!(ticks = self.ticks, ?stop, "stopping");
        self.fade_out();
        RunStats {
            ticks: self.ticks,
            delivered,
            stop,
        }
    }

    /// Hold the last frame, then leave every LED dark.
    pub fn fade_out(&mut self) {
        let hold = Duration::from_millis(self.installation.config().stream.fade_ms);
        self.tx.fade_out(self.last_frame.as_pixels(), hold);
    }
}
