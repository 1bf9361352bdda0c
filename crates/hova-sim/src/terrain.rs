//! Static terrain mesh and the local height estimate the hover controller
//! follows.
//!
//! The estimate is a linear scan over every vertex. The mesh is a few thousand
//! vertices and is sampled once per logic tick, so no spatial index is kept.

use glam::Vec3;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

/// Immutable vertex cloud of the ground surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerrainMesh {
    vertices: Vec<Vec3>,
}

impl TerrainMesh {
    /// Wrap a vertex list.
    pub fn new(vertices: Vec<Vec3>) -> Self {
        Self { vertices }
    }

    /// Build from a flat `[x0, y0, z0, x1, ...]` buffer. A trailing partial
    /// vertex is ignored.
    pub fn from_flat(flat: &[f32]) -> Self {
        Self::new(
            flat.chunks_exact(3)
                .map(|c| Vec3::new(c[0], c[1], c[2]))
                .collect(),
        )
    }

    /// All vertices.
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Vertex count.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// True when there are no vertices at all.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Smallest and largest vertex distance from the planet center.
    pub fn magnitude_bounds(&self) -> Option<(f32, f32)> {
        self.vertices.iter().map(|v| v.length()).fold(None, |acc, m| {
            Some(match acc {
                None => (m, m),
                Some((lo, hi)) => (lo.min(m), hi.max(m)),
            })
        })
    }
}

/// Result of one height query.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeightSample {
    /// Sum of matched vertex magnitudes.
    pub magnitude_sum: f64,
    /// How many vertices were within the radius.
    pub count: usize,
}

impl HeightSample {
    /// Mean magnitude of the matched vertices, or `None` when nothing matched.
    pub fn average(&self) -> Option<f32> {
        (self.count > 0).then(|| (self.magnitude_sum / self.count as f64) as f32)
    }
}

/// Average distance-from-origin of all vertices strictly closer than `radius`
/// to `query`.
///
/// Accumulates in `f64` so the result does not depend on vertex order.
pub fn estimate_height(query: Vec3, mesh: &TerrainMesh, radius: f32) -> HeightSample {
    let mut sample = HeightSample::default();
    for vertex in mesh.vertices() {
        if vertex.distance(query) < radius {
            sample.magnitude_sum += f64::from(vertex.length());
            sample.count += 1;
        }
    }
    sample
}

/// Parameters for the procedural planet band.
#[derive(Debug, Clone, PartialEq)]
pub struct BandParams {
    /// Noise seed.
    pub seed: u32,
    /// Undisplaced surface radius.
    pub radius: f32,
    /// Peak displacement away from `radius`.
    pub amplitude: f32,
    /// Half-width of the band, measured along the surface from the orbit plane.
    pub half_width: f32,
    /// Vertices around the orbit.
    pub longitude_segments: u32,
    /// Rows across the band.
    pub latitude_segments: u32,
    /// fBm octaves.
    pub octaves: usize,
    /// fBm base frequency on the unit sphere.
    pub frequency: f64,
}

impl Default for BandParams {
    fn default() -> Self {
        Self {
            seed: 0x6d61_7273,
            radius: 14.3,
            amplitude: 0.25,
            half_width: 1.2,
            longitude_segments: 512,
            latitude_segments: 9,
            octaves: 4,
            frequency: 6.0,
        }
    }
}

/// Generate a ring of displaced surface vertices around the equator (the XZ
/// plane), which is where the vehicle orbits.
///
/// Heights come from fBm Perlin noise sampled on the unit sphere, so the band
/// closes seamlessly and is identical for identical parameters.
pub fn generate_band(params: &BandParams) -> TerrainMesh {
    let fbm = Fbm::<Perlin>::new(params.seed)
        .set_octaves(params.octaves)
        .set_frequency(params.frequency);

    let rows = params.latitude_segments.max(1);
    let cols = params.longitude_segments.max(3);
    let max_lat = params.half_width / params.radius;

    let mut vertices = Vec::with_capacity((rows * cols) as usize);
    for row in 0..rows {
        let lat = if rows == 1 {
            0.0
        } else {
            -max_lat + 2.0 * max_lat * row as f32 / (rows - 1) as f32
        };
        for col in 0..cols {
            let lon = std::f32::consts::TAU * col as f32 / cols as f32;
            let dir = Vec3::new(lat.cos() * lon.cos(), lat.sin(), lat.cos() * lon.sin());
            let n = fbm.get([f64::from(dir.x), f64::from(dir.y), f64::from(dir.z)]) as f32;
            let height = params.radius + params.amplitude * n.clamp(-1.0, 1.0);
            vertices.push(dir * height);
        }
    }

    TerrainMesh::new(vertices)
}
