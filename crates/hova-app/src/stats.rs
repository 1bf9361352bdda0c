//! Frame/logic rate measurement and the console diagnostics around sessions.

use hova_sim::{ElapsedStyle, format_elapsed};
use tracing::info;

/// Average rates over one measurement window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateReport {
    /// Rendered frames per second.
    pub fps: f64,
    /// Logic ticks per second.
    pub lps: f64,
    /// Window length in seconds.
    pub window: f64,
}

/// Counts frames and ticks since the last report.
///
/// A report is only produced once the window is longer than the cooldown, so
/// hammering the stats key prints at most once per cooldown.
#[derive(Debug, Clone)]
pub struct RateWindow {
    start: f64,
    frames: u64,
    ticks: u64,
    cooldown: f64,
}

impl RateWindow {
    /// Open a window at `now`.
    pub fn new(now: f64, cooldown: f64) -> Self {
        Self {
            start: now,
            frames: 0,
            ticks: 0,
            cooldown,
        }
    }

    /// Count one rendered frame.
    pub fn record_frame(&mut self) {
        self.frames += 1;
    }

    /// Count one logic tick.
    pub fn record_tick(&mut self) {
        self.ticks += 1;
    }

    /// Close the window and start a new one at `now`, unless the window is
    /// still within the cooldown.
    pub fn report(&mut self, now: f64) -> Option<RateReport> {
        let window = now - self.start;
        if window <= self.cooldown {
            return None;
        }
        let report = RateReport {
            fps: self.frames as f64 / window,
            lps: self.ticks as f64 / window,
            window,
        };
        *self = Self::new(now, self.cooldown);
        Some(report)
    }
}

/// Local wall-clock time as `HH:MM:SS`.
pub fn timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Status line shown while a session runs, e.g. `| 12 Sec |`.
pub fn status_line(session_elapsed: f64) -> String {
    format!("| {} |", format_elapsed(session_elapsed, ElapsedStyle::Short))
}

pub(crate) fn log_session_start(seed: u64) {
    info!("[{}] Sim Start [{seed}].", timestamp());
}

/// End-of-session duration line, e.g. `Time-Taken: 1.67 Minutes or 100.000 Seconds`.
pub fn time_taken(session_elapsed: f64) -> String {
    format!(
        "Time-Taken: {} or {session_elapsed:.3} Seconds",
        format_elapsed(session_elapsed, ElapsedStyle::Long)
    )
}

pub(crate) fn log_session_end(session_elapsed: f64) {
    let ts = timestamp();
    info!("[{ts}] Sim End.");
    info!("[{ts}] {}", time_taken(session_elapsed));
}

pub(crate) fn log_rates(report: &RateReport) {
    let ts = timestamp();
    info!("[{ts}] FPS: {}", report.fps);
    info!("[{ts}] LPS: {}", report.lps);
}
