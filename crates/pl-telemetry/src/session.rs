//! Session loop: binds an [`Engine`] to a command [`Inbox`] and a telemetry writer.

use crate::error::TelemetryResult;
use crate::inbox::Inbox;
use crate::protocol::Command;
use crate::writer::TelemetryWriter;
use pl_core::Real;
use pl_sim::{Engine, EngineState};
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How the loop spaces steps in wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Sleep until wall-clock time catches up with simulated time.
    RealTime,
    /// Sleep a fixed amount after every step.
    Yield { micros: u64 },
    /// No sleeping.
    Free,
}

impl Default for Pacing {
    fn default() -> Self {
        Pacing::Yield { micros: 1000 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SessionOptions {
    pub pacing: Pacing,
    /// Simulated seconds to run for; `None` runs until stopped.
    pub duration: Option<Real>,
    /// Wait for a `start` command instead of starting immediately.
    pub start_idle: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSummary {
    pub steps: u64,
    pub samples: u64,
    pub sim_time: Real,
}

/// Idle poll period while waiting for `start`.
const IDLE_POLL: Duration = Duration::from_millis(1);

pub struct Session<W: Write> {
    engine: Engine,
    inbox: Inbox,
    writer: TelemetryWriter<W>,
    options: SessionOptions,
    stop: Arc<AtomicBool>,
}

impl<W: Write> Session<W> {
    pub fn new(
        engine: Engine,
        inbox: Inbox,
        writer: TelemetryWriter<W>,
        options: SessionOptions,
    ) -> Self {
        Self {
            engine,
            inbox,
            writer,
            options,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Setting the flag stops the loop at the next step boundary.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Run until stopped, the duration elapses, or an I/O error on the output.
    ///
    /// Each iteration polls commands, then runs one engine step (which applies any
    /// pending gains first), then writes the sample if one is due.
    pub fn run(&mut self) -> TelemetryResult<SessionSummary> {
        if !self.options.start_idle {
            self.engine.start()?;
        }
        let mut clock: Option<(Instant, Real)> = None;

        while !self.stop.load(Ordering::Relaxed) {
            self.poll_commands();
            if self.engine.state() == EngineState::Stopped {
                break;
            }

            if self.engine.state() != EngineState::Running {
                thread::sleep(IDLE_POLL);
                continue;
            }

            if let Some(sample) = self.engine.step()? {
                self.writer.write_sample(&sample)?;
            }

            if self.duration_elapsed() {
                debug!(t = self.engine.time(), "run duration reached");
                break;
            }

            let origin = *clock.get_or_insert_with(|| (Instant::now(), self.engine.time()));
            self.pace(origin);
        }

        self.engine.stop();
        let summary = SessionSummary {
            steps: self.engine.steps(),
            samples: self.writer.written(),
            sim_time: self.engine.time(),
        };
        info!(
            steps = summary.steps,
            samples = summary.samples,
            sim_time = summary.sim_time,
            "session finished"
        );
        Ok(summary)
    }

    pub fn into_parts(self) -> (Engine, W) {
        (self.engine, self.writer.into_inner())
    }

    fn poll_commands(&mut self) {
        while let Some(command) = self.inbox.next_control() {
            self.apply(command);
        }
        if let Some(gains) = self.inbox.take_gains() {
            self.engine.request_gains(gains);
        }
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::SetGains(gains) => self.engine.request_gains(gains),
            Command::SetSetpoint(value) => {
                if let Err(e) = self.engine.set_setpoint(value) {
                    warn!(error = %e, value, "setpoint ignored");
                }
            }
            Command::Reset => self.engine.reset_controller(),
            Command::Start => {
                if let Err(e) = self.engine.start() {
                    warn!(error = %e, "start ignored");
                }
            }
            Command::Stop => self.engine.stop(),
        }
    }

    fn duration_elapsed(&self) -> bool {
        match self.options.duration {
            Some(d) => self.engine.time() + 0.5 * self.engine.options().dt >= d,
            None => false,
        }
    }

    fn pace(&self, (wall_origin, sim_origin): (Instant, Real)) {
        match self.options.pacing {
            Pacing::RealTime => {
                let ahead = self.engine.time() - sim_origin;
                let target = wall_origin + Duration::from_secs_f64(ahead.max(0.0));
                let now = Instant::now();
                if target > now {
                    thread::sleep(target - now);
                }
            }
            Pacing::Yield { micros } => thread::sleep(Duration::from_micros(micros)),
            Pacing::Free => {}
        }
    }
}
