//! One simulation session: clock, starfield and hover state, owned in one
//! place and handed to the renderer only as a borrowed [`FrameSnapshot`].

use glam::Mat4;
use tracing::debug;

use crate::camera::OrbitCamera;
use crate::cosmos::{COSMOS_SIZE, StarfieldPoint, generate_cosmos};
use crate::hover::{HoverDynamics, HoverParams, HoverState};
use crate::random::RandomSource;
use crate::terrain::{HeightSample, TerrainMesh};

/// Fixed-step simulation clock.
///
/// Simulated time is the tick count times the fixed step, so it never depends
/// on how long a tick took in real time and never goes backwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SimClock {
    delta_time: f64,
    logic_count: u64,
    frame_count: u64,
    session_start: f64,
}

impl SimClock {
    /// Clock at time zero stepping by `delta_time` seconds.
    pub fn new(delta_time: f64) -> Self {
        Self {
            delta_time,
            logic_count: 0,
            frame_count: 0,
            session_start: 0.0,
        }
    }

    /// Fixed step in seconds.
    pub fn delta_time(&self) -> f64 {
        self.delta_time
    }

    /// Simulated seconds since process start.
    pub fn sim_time(&self) -> f64 {
        self.logic_count as f64 * self.delta_time
    }

    /// Logic ticks since process start.
    pub fn logic_count(&self) -> u64 {
        self.logic_count
    }

    /// Frames handed to the renderer since process start.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Simulated time the current session began at.
    pub fn session_start(&self) -> f64 {
        self.session_start
    }

    /// Simulated seconds since the current session began.
    pub fn session_elapsed(&self) -> f64 {
        self.sim_time() - self.session_start
    }

    /// Count one rendered frame.
    pub fn record_frame(&mut self) {
        self.frame_count += 1;
    }

    fn advance(&mut self) {
        self.logic_count += 1;
    }

    fn mark_session_start(&mut self) {
        self.session_start = self.sim_time();
    }
}

/// Construction parameters for a [`SimulationSession`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionParams {
    /// Fixed logic step in seconds.
    pub delta_time: f64,
    /// Starfield points per session.
    pub cosmos_size: usize,
    /// Hover tunables; the camera shares their `sim_speed`.
    pub hover: HoverParams,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            delta_time: 1.0 / 60.0,
            cosmos_size: COSMOS_SIZE,
            hover: HoverParams::default(),
        }
    }
}

/// What the renderer needs for one frame.
#[derive(Debug, Clone)]
pub struct FrameSnapshot<'a> {
    /// Simulated time the frame shows.
    pub sim_time: f64,
    /// Index of this frame since process start.
    pub frame: u64,
    /// World-to-view transform.
    pub view: Mat4,
    /// Vehicle model transform.
    pub vehicle: Mat4,
    /// Current ground height estimate.
    pub terrain_height: f32,
    /// Background points.
    pub cosmos: &'a [StarfieldPoint],
}

/// All mutable simulation state.
#[derive(Debug, Clone)]
pub struct SimulationSession {
    clock: SimClock,
    hover: HoverState,
    cosmos: Vec<StarfieldPoint>,
    rng: RandomSource,
    dynamics: HoverDynamics,
    camera: OrbitCamera,
    cosmos_size: usize,
}

impl SimulationSession {
    /// Create the process's first session from `seed`.
    pub fn new(params: SessionParams, seed: u64) -> Self {
        let dynamics = HoverDynamics::new(params.hover);
        let mut session = Self {
            clock: SimClock::new(params.delta_time),
            hover: dynamics.rest_state(),
            cosmos: Vec::new(),
            rng: RandomSource::new(seed),
            dynamics,
            camera: OrbitCamera::new(params.hover.sim_speed),
            cosmos_size: params.cosmos_size,
        };
        session.reset(seed);
        session
    }

    /// Start a new session: reseed, regenerate the whole starfield, put the
    /// hover height back at rest and restart the session timer. The clock
    /// itself keeps running.
    pub fn reset(&mut self, seed: u64) {
        self.rng.seed(seed);
        self.cosmos = generate_cosmos(&mut self.rng, self.cosmos_size);
        self.hover = self.dynamics.rest_state();
        self.clock.mark_session_start();
        debug!(
            seed,
            sim_time = self.clock.sim_time(),
            points = self.cosmos.len(),
            "session reset"
        );
    }

    /// Advance one logic tick.
    ///
    /// The ground is sampled at the placement for the time before the step.
    pub fn tick(&mut self, mesh: &TerrainMesh) -> HeightSample {
        let dt = self.clock.delta_time() as f32;
        let sample = self
            .dynamics
            .step(&mut self.hover, mesh, self.clock.sim_time(), dt);
        self.clock.advance();
        sample
    }

    /// Compute the camera and vehicle transforms for the current time.
    pub fn snapshot(&self) -> FrameSnapshot<'_> {
        let sim_time = self.clock.sim_time();
        FrameSnapshot {
            sim_time,
            frame: self.clock.frame_count(),
            view: self.camera.view_transform(sim_time, self.hover.terrain_height),
            vehicle: self.dynamics.vehicle_transform(&self.hover, sim_time),
            terrain_height: self.hover.terrain_height,
            cosmos: &self.cosmos,
        }
    }

    /// The clock.
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Mutable clock access, for frame accounting.
    pub fn clock_mut(&mut self) -> &mut SimClock {
        &mut self.clock
    }

    /// Current hover state.
    pub fn hover(&self) -> &HoverState {
        &self.hover
    }

    /// Current starfield.
    pub fn cosmos(&self) -> &[StarfieldPoint] {
        &self.cosmos
    }

    /// Seed of the current session.
    pub fn seed(&self) -> u64 {
        self.rng.current_seed()
    }

    /// The hover integrator.
    pub fn dynamics(&self) -> &HoverDynamics {
        &self.dynamics
    }

    /// The camera model.
    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }
}
