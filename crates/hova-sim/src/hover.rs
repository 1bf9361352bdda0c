//! Terrain-following hover dynamics.
//!
//! The controller only ever pushes up: when the averaged ground under the
//! vehicle is above the current height estimate, the estimate springs toward
//! it. A constant drag pulls it down every tick, which is how descents happen.
//!
//! The ground is sampled at the placement for the tick's start time, before the
//! clock advances, while the frame that follows draws the vehicle at the new
//! time. The height on screen is therefore one tick behind the position; at
//! the orbit speeds involved this is invisible and changing it alters how the
//! vehicle feels over bumps, so it is kept.

use glam::{Mat4, Vec3};
use tracing::trace;

use crate::terrain::{HeightSample, TerrainMesh, estimate_height};

/// Extra yaw of the vehicle ahead of the orbit angle, so it sits in front of the camera.
pub const LEAD_ANGLE: f32 = 0.017;

/// Amplitude of the side-to-side weave, in distance units.
pub const WEAVE_AMPLITUDE: f32 = 0.1;

/// Tunables for [`HoverDynamics`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverParams {
    /// Global time scale.
    pub sim_speed: f32,
    /// Gain of the upward spring.
    pub correction_gain: f32,
    /// Terrain sampling radius.
    pub sample_radius: f32,
    /// Height a session starts from.
    pub rest_height: f32,
    /// Orbit radius the uncorrected placement sits at.
    pub midpoint: f32,
    /// Vehicle body offset above the height estimate.
    pub vehicle_offset: f32,
}

impl Default for HoverParams {
    fn default() -> Self {
        Self {
            sim_speed: 0.1,
            correction_gain: 88.0,
            sample_radius: 0.63,
            rest_height: 14.3,
            midpoint: 14.3,
            vehicle_offset: 0.16,
        }
    }
}

/// Mutable per-session hover state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverState {
    /// Running estimate of the ground radius under the vehicle.
    pub terrain_height: f32,
}

/// Stateless integrator over [`HoverState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HoverDynamics {
    params: HoverParams,
}

impl HoverDynamics {
    /// Create dynamics with the given tunables.
    pub fn new(params: HoverParams) -> Self {
        Self { params }
    }

    /// The tunables in use.
    pub fn params(&self) -> &HoverParams {
        &self.params
    }

    /// State a fresh session starts in.
    pub fn rest_state(&self) -> HoverState {
        HoverState {
            terrain_height: self.params.rest_height,
        }
    }

    /// Vehicle placement at `sim_time` before height correction: on the orbit
    /// circle at the midpoint radius, weaving sideways, flipped to face the
    /// surface.
    pub fn placement(&self, sim_time: f64) -> Mat4 {
        let angle = orbit_angle(sim_time, self.params.sim_speed);
        Mat4::from_rotation_y(angle + LEAD_ANGLE)
            * Mat4::from_rotation_x(std::f32::consts::PI)
            * Mat4::from_translation(Vec3::new(
                angle.sin() * WEAVE_AMPLITUDE,
                0.0,
                self.params.midpoint,
            ))
    }

    /// Mesh-relative point the ground is sampled at for `sim_time`.
    pub fn sample_point(&self, sim_time: f64) -> Vec3 {
        self.placement(sim_time).w_axis.truncate()
    }

    /// Final vehicle transform: the placement lifted from the midpoint to the
    /// current height estimate plus the body offset.
    pub fn vehicle_transform(&self, state: &HoverState, sim_time: f64) -> Mat4 {
        self.placement(sim_time)
            * Mat4::from_translation(Vec3::Z * self.vehicle_lift(state))
    }

    /// Distance the vehicle is raised above the midpoint radius.
    pub fn vehicle_lift(&self, state: &HoverState) -> f32 {
        (state.terrain_height - self.params.midpoint) + self.params.vehicle_offset
    }

    /// Apply one tick given an already-taken ground sample.
    pub fn apply(&self, state: &mut HoverState, sample: HeightSample, dt: f32) {
        let p = &self.params;
        if let Some(ground) = sample.average()
            && ground > state.terrain_height
        {
            state.terrain_height +=
                p.sim_speed * p.correction_gain * (ground - state.terrain_height) * dt;
        }

        state.terrain_height -= p.sim_speed * dt;
    }

    /// Sample the mesh at the placement for `sim_time`, then integrate one tick.
    pub fn step(
        &self,
        state: &mut HoverState,
        mesh: &TerrainMesh,
        sim_time: f64,
        dt: f32,
    ) -> HeightSample {
        let sample = estimate_height(self.sample_point(sim_time), mesh, self.params.sample_radius);
        self.apply(state, sample, dt);
        trace!(
            samples = sample.count,
            terrain_height = state.terrain_height,
            "hover tick"
        );
        sample
    }
}

/// Orbit angle in radians at `sim_time`.
pub fn orbit_angle(sim_time: f64, sim_speed: f32) -> f32 {
    (sim_time * f64::from(sim_speed)) as f32
}
