//! Procedural background starfield ("cosmos") regenerated at every session start.

use glam::Vec3;

use crate::random::RandomSource;

/// Number of starfield points in a session.
pub const COSMOS_SIZE: usize = 256;

/// Distance range of a point from the planet center.
pub const DISTANCE_RANGE: (f32, f32) = (32.0, 72.0);

/// Render scale range of a point.
pub const SCALE_RANGE: (f32, f32) = (0.1, 1.6);

/// A single background sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarfieldPoint {
    /// Position relative to the planet center.
    pub position: Vec3,
    /// RGB color, each channel in `[0, 1]`.
    pub color: [f32; 3],
    /// Uniform render scale.
    pub scale: f32,
}

/// Draw `count` independent starfield points from `rng`.
///
/// Each point consumes the stream in a fixed order (direction, color, distance,
/// scale), so identical seeds give identical fields.
pub fn generate_cosmos(rng: &mut RandomSource, count: usize) -> Vec<StarfieldPoint> {
    let mut points = Vec::with_capacity(count);

    for _ in 0..count {
        let direction = rng.unit_vector();
        let color = [rng.unit(), rng.unit(), rng.unit()];
        let distance = rng.range(DISTANCE_RANGE.0, DISTANCE_RANGE.1);
        let scale = rng.range(SCALE_RANGE.0, SCALE_RANGE.1);

        points.push(StarfieldPoint {
            position: direction * distance,
            color,
            scale,
        });
    }

    points
}
