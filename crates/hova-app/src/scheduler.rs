//! Fixed-timestep scheduler with an independently capped render rate.
//!
//! Each iteration sleeps toward the fixed logic interval, polls input, decides
//! whether this iteration draws, and always runs exactly one logic tick with
//! the fixed step. Physics never sees the real elapsed time, so the same seed
//! and inputs give the same trajectory however fast the display is.

use std::time::{Duration, Instant};

use hova_config::Config;
use hova_sim::{Entropy, HoverParams, SessionParams, SimulationSession, TerrainMesh};
use tracing::{debug, info, instrument};

use crate::input::{InputSource, SimCommand};
use crate::render::Renderer;
use crate::stats::{self, RateReport, RateWindow};

/// Slack when comparing timestamps built from accumulated intervals.
const TIME_EPSILON: f64 = 1e-9;

/// Timing settings for a [`Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerSettings {
    /// Logic ticks per second.
    pub logic_rate: f64,
    /// Render cap in frames per second.
    pub max_fps: f64,
    /// Simulated seconds between status line refreshes.
    pub status_interval: f64,
    /// Minimum seconds between rate reports.
    pub stats_cooldown: f64,
    /// Stop once simulated time reaches this, if set.
    pub duration: Option<f64>,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            logic_rate: 60.0,
            max_fps: 144.0,
            status_interval: 1.0,
            stats_cooldown: 2.0,
            duration: None,
        }
    }
}

impl SchedulerSettings {
    /// Settings from the loaded config plus an optional run duration.
    pub fn from_config(config: &Config, duration: Option<f64>) -> Self {
        Self {
            logic_rate: config.sim.logic_rate,
            max_fps: config.render.max_fps,
            status_interval: config.render.status_interval,
            stats_cooldown: config.debug.stats_cooldown,
            duration,
        }
    }

    /// Nominal wall-clock length of one iteration.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.logic_rate)
    }
}

/// Session parameters from the loaded config.
pub fn session_params(config: &Config) -> SessionParams {
    SessionParams {
        delta_time: config.delta_time(),
        cosmos_size: config.sim.cosmos_size,
        hover: HoverParams {
            sim_speed: config.sim.sim_speed,
            correction_gain: config.sim.correction_gain,
            sample_radius: config.sim.sample_radius,
            rest_height: config.sim.rest_height,
            midpoint: config.sim.midpoint,
            vehicle_offset: config.sim.vehicle_offset,
        },
    }
}

/// Decides which iterations draw.
///
/// Uncapped when the cap is at or above the logic rate. Otherwise each frame
/// moves the deadline forward by exactly one render interval, so over any
/// stretch of time the frame count stays within one of `duration * cap`.
#[derive(Debug, Clone)]
pub struct RenderGate {
    interval: Option<f64>,
    next_due: Option<f64>,
}

impl RenderGate {
    /// Gate for a render cap and logic rate.
    pub fn new(max_fps: f64, logic_rate: f64) -> Self {
        Self {
            interval: (max_fps < logic_rate).then(|| 1.0 / max_fps),
            next_due: None,
        }
    }

    /// True if rendering is throttled below the logic rate.
    pub fn is_capped(&self) -> bool {
        self.interval.is_some()
    }

    /// Whether the iteration at `now` should render. Consumes the slot if so.
    pub fn should_render(&mut self, now: f64) -> bool {
        let Some(interval) = self.interval else {
            return true;
        };
        match self.next_due {
            Some(due) if now + TIME_EPSILON < due => false,
            Some(due) => {
                let mut next = due + interval;
                // Fell more than a whole interval behind: re-anchor instead of bursting.
                if next <= now {
                    next = now + interval;
                }
                self.next_due = Some(next);
                true
            }
            None => {
                self.next_due = Some(now + interval);
                true
            }
        }
    }
}

/// Sleep before the next iteration: the nominal interval minus the time this
/// one took, never negative and never more than the nominal interval.
///
/// An iteration that overran gets a zero wait, so the next one starts at once.
/// It does not sleep a full interval to recover.
pub fn next_wait(nominal: Duration, spent: Duration) -> Duration {
    nominal.saturating_sub(spent)
}

/// Lifecycle of the loop. There is no pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Built but not started.
    Idle,
    /// Ticking.
    Running,
    /// Finished; will not tick again.
    Stopped,
}

/// What one iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Iteration {
    /// A frame was handed to the renderer.
    pub rendered: bool,
    /// Terrain vertices that fed this tick's height estimate.
    pub samples: usize,
}

/// Owns the session and terrain and drives both.
pub struct Scheduler {
    state: SchedulerState,
    settings: SchedulerSettings,
    session: SimulationSession,
    mesh: TerrainMesh,
    entropy: Box<dyn Entropy>,
    gate: RenderGate,
    rates: RateWindow,
    last_report: Option<RateReport>,
    next_status: f64,
    shutdown: bool,
}

impl Scheduler {
    /// Build a scheduler. The first session's seed is drawn from `entropy` here.
    ///
    /// The session's fixed step is always `1 / settings.logic_rate`; any
    /// `delta_time` in `params` is replaced.
    pub fn new(
        settings: SchedulerSettings,
        mut params: SessionParams,
        mesh: TerrainMesh,
        mut entropy: Box<dyn Entropy>,
    ) -> Self {
        params.delta_time = 1.0 / settings.logic_rate;
        let seed = entropy.entropy();
        Self {
            state: SchedulerState::Idle,
            gate: RenderGate::new(settings.max_fps, settings.logic_rate),
            rates: RateWindow::new(0.0, settings.stats_cooldown),
            last_report: None,
            next_status: settings.status_interval,
            shutdown: false,
            session: SimulationSession::new(params, seed),
            settings,
            mesh,
            entropy,
        }
    }

    /// Move from idle to running at wall time `now` and announce the first session.
    pub fn start(&mut self, now: f64) {
        if self.state != SchedulerState::Idle {
            return;
        }
        self.state = SchedulerState::Running;
        self.rates = RateWindow::new(now, self.settings.stats_cooldown);
        info!(
            logic_rate = self.settings.logic_rate,
            max_fps = self.settings.max_fps,
            capped = self.gate.is_capped(),
            "Scheduler running"
        );
        stats::log_session_start(self.session.seed());
    }

    /// Ask the loop to stop after the current iteration.
    pub fn request_shutdown(&mut self) {
        self.shutdown = true;
    }

    /// Run one iteration at wall time `now` (seconds since the loop started).
    ///
    /// Does nothing unless the scheduler is running.
    pub fn iterate<I, R>(&mut self, now: f64, input: &mut I, renderer: &mut R) -> Iteration
    where
        I: InputSource + ?Sized,
        R: Renderer + ?Sized,
    {
        if self.state != SchedulerState::Running {
            return Iteration {
                rendered: false,
                samples: 0,
            };
        }

        while let Some(command) = input.poll_command() {
            self.handle_command(command, now);
        }

        let rendered = self.gate.should_render(now);

        let sample = self.session.tick(&self.mesh);
        self.rates.record_tick();

        if rendered {
            self.session.clock_mut().record_frame();
            self.rates.record_frame();
            renderer.render(&self.session.snapshot());
        }

        let clock = self.session.clock();
        let sim_time = clock.sim_time();
        if sim_time + TIME_EPSILON >= self.next_status {
            renderer.show_status(&stats::status_line(clock.session_elapsed()));
            self.next_status = sim_time + self.settings.status_interval;
        }

        if let Some(duration) = self.settings.duration
            && sim_time + TIME_EPSILON >= duration
        {
            debug!(sim_time, "run duration reached");
            self.shutdown = true;
        }

        if self.shutdown {
            self.finish();
        }

        Iteration {
            rendered,
            samples: sample.count,
        }
    }

    /// Pace iterations against the monotonic clock until shutdown.
    #[instrument(skip_all)]
    pub fn run<I, R>(&mut self, input: &mut I, renderer: &mut R)
    where
        I: InputSource + ?Sized,
        R: Renderer + ?Sized,
    {
        let origin = Instant::now();
        let nominal = self.settings.tick_interval();
        let mut wait = nominal;

        self.start(0.0);
        while self.state == SchedulerState::Running {
            std::thread::sleep(wait);
            let began = Instant::now();
            let now = began.duration_since(origin).as_secs_f64();
            self.iterate(now, input, renderer);
            wait = next_wait(nominal, began.elapsed());
        }
    }

    /// Close the current session and start a new one with a fresh seed.
    pub fn new_session(&mut self) {
        stats::log_session_end(self.session.clock().session_elapsed());
        let seed = self.entropy.entropy();
        self.session.reset(seed);
        stats::log_session_start(seed);
    }

    fn handle_command(&mut self, command: SimCommand, now: f64) {
        debug!(?command, "input");
        match command {
            SimCommand::NewSession => self.new_session(),
            SimCommand::ReportStats => {
                if let Some(report) = self.rates.report(now) {
                    stats::log_rates(&report);
                    self.last_report = Some(report);
                }
            }
            SimCommand::Quit => self.shutdown = true,
        }
    }

    fn finish(&mut self) {
        if self.state == SchedulerState::Stopped {
            return;
        }
        self.state = SchedulerState::Stopped;
        stats::log_session_end(self.session.clock().session_elapsed());
        info!(
            frames = self.session.clock().frame_count(),
            ticks = self.session.clock().logic_count(),
            "Scheduler stopped"
        );
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// The session being simulated.
    pub fn session(&self) -> &SimulationSession {
        &self.session
    }

    /// Timing settings.
    pub fn settings(&self) -> &SchedulerSettings {
        &self.settings
    }

    /// The most recent rate report, if any was produced.
    pub fn last_report(&self) -> Option<RateReport> {
        self.last_report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use hova_sim::{BandParams, COSMOS_SIZE, FixedEntropy, FrameSnapshot, generate_band};

    #[derive(Default)]
    struct RecordingRenderer {
        frames: Vec<(u64, f64, f32)>,
        statuses: Vec<String>,
    }

    impl Renderer for RecordingRenderer {
        fn render(&mut self, frame: &FrameSnapshot<'_>) {
            self.frames
                .push((frame.frame, frame.sim_time, frame.terrain_height));
        }

        fn show_status(&mut self, status: &str) {
            self.statuses.push(status.to_string());
        }
    }

    /// Entropy that counts up, so each session gets a distinct known seed.
    struct CountingEntropy(u64);

    impl Entropy for CountingEntropy {
        fn entropy(&mut self) -> u64 {
            self.0 += 1;
            self.0
        }
    }

    fn scheduler(max_fps: f64) -> Scheduler {
        let settings = SchedulerSettings {
            max_fps,
            ..SchedulerSettings::default()
        };
        Scheduler::new(
            settings,
            SessionParams::default(),
            generate_band(&BandParams::default()),
            Box::new(FixedEntropy(42)),
        )
    }

    /// Drive `iterations` iterations with wall time exactly matching the fixed step.
    fn drive(
        s: &mut Scheduler,
        iterations: u32,
        input: &mut VecDeque<SimCommand>,
        renderer: &mut RecordingRenderer,
    ) -> u32 {
        let dt = 1.0 / s.settings().logic_rate;
        let start = s.session().clock().logic_count();
        let mut rendered = 0;
        for i in 1..=iterations {
            let now = (start + u64::from(i)) as f64 * dt;
            if s.iterate(now, input, renderer).rendered {
                rendered += 1;
            }
        }
        rendered
    }

    #[test]
    fn test_uncapped_renders_every_iteration() {
        for max_fps in [60.0, 144.0, 1000.0] {
            let mut s = scheduler(max_fps);
            s.start(0.0);
            let mut renderer = RecordingRenderer::default();
            let rendered = drive(&mut s, 300, &mut VecDeque::new(), &mut renderer);
            assert_eq!(rendered, 300, "max_fps {max_fps}");
            assert_eq!(s.session().clock().frame_count(), 300);
            assert_eq!(s.session().clock().logic_count(), 300);
        }
    }

    #[test]
    fn test_capped_render_count_tracks_cap() {
        let duration = 10.0;
        for max_fps in [1.0, 7.5, 24.0, 30.0, 45.0, 59.0] {
            let mut s = scheduler(max_fps);
            s.start(0.0);
            let mut renderer = RecordingRenderer::default();
            let rendered = drive(&mut s, 600, &mut VecDeque::new(), &mut renderer);
            let expected = duration * max_fps;
            assert!(
                (f64::from(rendered) - expected).abs() <= 1.0,
                "max_fps {max_fps}: rendered {rendered}, expected {expected}"
            );
            // Logic never skips, whatever the cap.
            assert_eq!(s.session().clock().logic_count(), 600);
        }
    }

    #[test]
    fn test_gate_reanchors_after_stall() {
        let mut gate = RenderGate::new(10.0, 60.0);
        assert!(gate.should_render(0.0));
        assert!(!gate.should_render(0.05));
        // A long stall renders once, then resumes the normal cadence.
        assert!(gate.should_render(5.0));
        assert!(!gate.should_render(5.05));
        assert!(gate.should_render(5.1));
    }

    #[test]
    fn test_gate_uncapped_at_logic_rate() {
        let mut gate = RenderGate::new(60.0, 60.0);
        assert!(!gate.is_capped());
        assert!((0..10).all(|i| gate.should_render(f64::from(i) * 0.001)));
    }

    #[test]
    fn test_next_wait_is_clamped() {
        let nominal = Duration::from_micros(16_666);
        assert_eq!(next_wait(nominal, Duration::ZERO), nominal);
        assert_eq!(
            next_wait(nominal, Duration::from_micros(6_666)),
            Duration::from_micros(10_000)
        );
        assert_eq!(next_wait(nominal, Duration::from_millis(40)), Duration::ZERO);
    }

    #[test]
    fn test_physics_independent_of_render_cap() {
        let mut a = scheduler(144.0);
        let mut b = scheduler(20.0);
        a.start(0.0);
        b.start(0.0);
        let (mut ra, mut rb) = (RecordingRenderer::default(), RecordingRenderer::default());
        let (mut ia, mut ib) = (VecDeque::new(), VecDeque::new());
        for _ in 0..20 {
            drive(&mut a, 30, &mut ia, &mut ra);
            drive(&mut b, 30, &mut ib, &mut rb);
            assert_eq!(
                a.session().hover().terrain_height.to_bits(),
                b.session().hover().terrain_height.to_bits()
            );
        }
        assert!(ra.frames.len() > rb.frames.len());
    }

    #[test]
    fn test_new_session_command() {
        let settings = SchedulerSettings::default();
        let mut s = Scheduler::new(
            settings,
            SessionParams::default(),
            generate_band(&BandParams::default()),
            Box::new(CountingEntropy(0)),
        );
        s.start(0.0);
        let mut renderer = RecordingRenderer::default();
        let mut input = VecDeque::new();
        drive(&mut s, 6000, &mut input, &mut renderer);
        assert_eq!(s.session().seed(), 1);
        let old_cosmos = s.session().cosmos().to_vec();

        input.push_back(SimCommand::NewSession);
        drive(&mut s, 1, &mut input, &mut renderer);

        assert_eq!(s.session().seed(), 2);
        assert!((s.session().clock().session_start() - 100.0).abs() < 1e-6);
        assert_eq!(s.session().cosmos().len(), COSMOS_SIZE);
        assert_ne!(s.session().cosmos(), &old_cosmos[..]);
        // Reset happens before the iteration's tick, so the frame shows one
        // tick away from rest.
        let (_, _, height) = *renderer.frames.last().unwrap();
        assert!((height - 14.3).abs() < 0.1, "height {height}");
        assert!((s.session().clock().session_elapsed() - 1.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_stats_report_cooldown() {
        let mut s = scheduler(30.0);
        s.start(0.0);
        let mut renderer = RecordingRenderer::default();
        let mut input = VecDeque::new();

        input.push_back(SimCommand::ReportStats);
        drive(&mut s, 60, &mut input, &mut renderer);
        assert!(s.last_report().is_none(), "reported inside the first 2 s");

        drive(&mut s, 120, &mut input, &mut renderer);
        input.push_back(SimCommand::ReportStats);
        drive(&mut s, 1, &mut input, &mut renderer);
        let report = s.last_report().expect("report after 3 s");
        assert!((report.lps - 60.0).abs() < 1.0, "lps {}", report.lps);
        assert!((report.fps - 30.0).abs() < 1.0, "fps {}", report.fps);

        input.push_back(SimCommand::ReportStats);
        drive(&mut s, 1, &mut input, &mut renderer);
        assert_eq!(s.last_report(), Some(report), "second report not suppressed");
    }

    #[test]
    fn test_status_refreshes_each_simulated_second() {
        let mut s = scheduler(144.0);
        s.start(0.0);
        let mut renderer = RecordingRenderer::default();
        drive(&mut s, 5 * 60, &mut VecDeque::new(), &mut renderer);
        assert_eq!(renderer.statuses.len(), 5, "{:?}", renderer.statuses);
        assert_eq!(renderer.statuses[0], "| 1 Sec |");
        assert_eq!(renderer.statuses[4], "| 5 Sec |");
    }

    #[test]
    fn test_quit_finishes_current_iteration() {
        let mut s = scheduler(144.0);
        assert_eq!(s.state(), SchedulerState::Idle);
        s.start(0.0);
        assert_eq!(s.state(), SchedulerState::Running);

        let mut renderer = RecordingRenderer::default();
        let mut input = VecDeque::from([SimCommand::Quit]);
        let iteration = s.iterate(1.0 / 60.0, &mut input, &mut renderer);
        assert!(iteration.rendered);
        assert_eq!(s.session().clock().logic_count(), 1);
        assert_eq!(s.state(), SchedulerState::Stopped);
    }

    #[test]
    fn test_duration_stops_loop() {
        let settings = SchedulerSettings {
            duration: Some(2.0),
            ..SchedulerSettings::default()
        };
        let mut s = Scheduler::new(
            settings,
            SessionParams::default(),
            generate_band(&BandParams::default()),
            Box::new(FixedEntropy(1)),
        );
        s.start(0.0);
        let mut renderer = RecordingRenderer::default();
        let mut input = VecDeque::new();
        let mut iterations = 0;
        while s.state() == SchedulerState::Running {
            iterations += 1;
            s.iterate(f64::from(iterations) / 60.0, &mut input, &mut renderer);
        }
        assert_eq!(iterations, 120);
    }

    #[test]
    fn test_session_params_from_config() {
        let mut config = Config::default();
        config.sim.logic_rate = 120.0;
        config.sim.sim_speed = 0.2;
        let params = session_params(&config);
        assert!((params.delta_time - 1.0 / 120.0).abs() < 1e-12);
        assert_eq!(params.hover.sim_speed, 0.2);
        assert_eq!(params.cosmos_size, 256);
    }

    #[test]
    fn test_run_with_duration_terminates() {
        let settings = SchedulerSettings {
            logic_rate: 240.0,
            duration: Some(0.25),
            ..SchedulerSettings::default()
        };
        let mut s = Scheduler::new(
            settings,
            SessionParams {
                delta_time: 1.0 / 240.0,
                ..SessionParams::default()
            },
            generate_band(&BandParams::default()),
            Box::new(FixedEntropy(5)),
        );
        let mut renderer = RecordingRenderer::default();
        s.run(&mut VecDeque::new(), &mut renderer);
        assert_eq!(s.state(), SchedulerState::Stopped);
        assert_eq!(s.session().clock().logic_count(), 60);
    }

    #[test]
    fn test_iterate_only_ticks_while_running() {
        let mut s = scheduler(144.0);
        let mut renderer = RecordingRenderer::default();
        let mut input = VecDeque::new();

        let idle = s.iterate(1.0 / 60.0, &mut input, &mut renderer);
        assert!(!idle.rendered);
        assert_eq!(s.session().clock().logic_count(), 0);

        s.start(0.0);
        input.push_back(SimCommand::Quit);
        s.iterate(1.0 / 60.0, &mut input, &mut renderer);
        assert_eq!(s.state(), SchedulerState::Stopped);

        let stopped = s.iterate(2.0 / 60.0, &mut input, &mut renderer);
        assert!(!stopped.rendered);
        assert_eq!(s.session().clock().logic_count(), 1);
        assert_eq!(renderer.frames.len(), 1);
    }

    #[test]
    fn test_step_follows_logic_rate() {
        let settings = SchedulerSettings {
            logic_rate: 120.0,
            ..SchedulerSettings::default()
        };
        let s = Scheduler::new(
            settings,
            SessionParams {
                delta_time: 1.0 / 30.0,
                ..SessionParams::default()
            },
            generate_band(&BandParams::default()),
            Box::new(FixedEntropy(8)),
        );
        assert!((s.session().clock().delta_time() - 1.0 / 120.0).abs() < 1e-15);
    }
}
