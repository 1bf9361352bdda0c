//! Orbit camera: a view transform that is a pure function of simulated time
//! and the current hover height. There is no player control.

use glam::{Mat4, Vec3};

use crate::hover::orbit_angle;

/// Fixed yaw applied before everything else, so the camera looks along the orbit.
pub const YAW_OFFSET_DEG: f32 = 234.0;

/// Peak vertical bob of the camera.
pub const BOB_AMPLITUDE: f32 = 0.1;

/// Clearance kept between the height estimate and the camera.
pub const MARGIN: f32 = 0.2;

/// Camera that rides the orbit just behind the vehicle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    /// Global time scale, shared with the hover dynamics.
    pub sim_speed: f32,
    /// Initial yaw in radians.
    pub yaw_offset: f32,
    /// Peak bob amplitude.
    pub bob_amplitude: f32,
    /// Clearance above the height estimate.
    pub margin: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl OrbitCamera {
    /// Camera with the standard offsets at the given time scale.
    pub fn new(sim_speed: f32) -> Self {
        Self {
            sim_speed,
            yaw_offset: YAW_OFFSET_DEG.to_radians(),
            bob_amplitude: BOB_AMPLITUDE,
            margin: MARGIN,
        }
    }

    /// Distance from the planet center the camera sits at.
    pub fn altitude(&self, sim_time: f64, terrain_height: f32) -> f32 {
        let angle = orbit_angle(sim_time, self.sim_speed);
        terrain_height + self.bob_amplitude * angle.sin().abs() + self.margin
    }

    /// World-to-view transform at `sim_time`.
    pub fn view_transform(&self, sim_time: f64, terrain_height: f32) -> Mat4 {
        let angle = orbit_angle(sim_time, self.sim_speed);
        Mat4::from_rotation_y(self.yaw_offset)
            * Mat4::from_translation(Vec3::Z * self.altitude(sim_time, terrain_height))
            * Mat4::from_rotation_y(-angle)
    }

    /// Camera position in world space.
    pub fn eye(&self, sim_time: f64, terrain_height: f32) -> Vec3 {
        self.view_transform(sim_time, terrain_height)
            .inverse()
            .w_axis
            .truncate()
    }
}
