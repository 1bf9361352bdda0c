//! Terrain asset loading: either a RON vertex list on disk or the procedural
//! planet band. Either way the result is checked before the loop starts,
//! because a missing mesh is a startup failure.

use std::path::{Path, PathBuf};

use glam::Vec3;
use hova_config::TerrainConfig;
use hova_sim::{BandParams, TerrainMesh, generate_band};
use tracing::info;

/// Errors raised while setting up the terrain mesh.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// The mesh file could not be read.
    #[error("failed to read mesh {path}: {source}")]
    Read {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The mesh file is not a RON list of `(x, y, z)` tuples.
    #[error("failed to parse mesh {path}: {source}")]
    Parse {
        /// File that was being parsed.
        path: PathBuf,
        /// Underlying RON error.
        #[source]
        source: ron::error::SpannedError,
    },

    /// The mesh loaded but has nothing to sample.
    #[error("terrain mesh has no vertices")]
    Empty,
}

/// Procedural band parameters from the terrain config.
pub fn band_params(config: &TerrainConfig) -> BandParams {
    BandParams {
        seed: config.seed,
        radius: config.radius,
        amplitude: config.amplitude,
        half_width: config.band_half_width,
        longitude_segments: config.longitude_segments,
        latitude_segments: config.latitude_segments,
        octaves: config.octaves,
        frequency: config.frequency,
    }
}

/// Load the terrain mesh named by the config, or generate the band if no file is set.
pub fn load_terrain(config: &TerrainConfig) -> Result<TerrainMesh, AssetError> {
    let mesh = match &config.mesh_path {
        Some(path) => load_mesh_file(path)?,
        None => generate_band(&band_params(config)),
    };

    if mesh.is_empty() {
        return Err(AssetError::Empty);
    }

    if let Some((lo, hi)) = mesh.magnitude_bounds() {
        info!(
            vertices = mesh.len(),
            "Terrain ready, surface radius {lo:.3}..{hi:.3}"
        );
    }
    Ok(mesh)
}

/// Read a RON list of `(x, y, z)` vertex tuples.
pub fn load_mesh_file(path: &Path) -> Result<TerrainMesh, AssetError> {
    let contents = std::fs::read_to_string(path).map_err(|source| AssetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let vertices: Vec<(f32, f32, f32)> =
        ron::from_str(&contents).map_err(|source| AssetError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(TerrainMesh::new(
        vertices
            .into_iter()
            .map(|(x, y, z)| Vec3::new(x, y, z))
            .collect(),
    ))
}
