//! Configuration structs with sensible defaults and read-only RON loading.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name looked up inside the config directory.
pub const CONFIG_FILE: &str = "config.ron";

/// Slowest accepted logic rate. One tick at this rate still fits a `Duration`.
pub const MIN_LOGIC_RATE: f64 = 1e-3;

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Simulation constants.
    pub sim: SimConfig,
    /// Render cadence settings.
    pub render: RenderConfig,
    /// Terrain asset settings.
    pub terrain: TerrainConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Fixed-timestep simulation constants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    /// Logic ticks per second. `delta_time` is `1 / logic_rate`.
    pub logic_rate: f64,
    /// Global time scale applied to orbit angle, thrust and drag.
    pub sim_speed: f32,
    /// Gain of the upward spring toward sampled terrain height.
    pub correction_gain: f32,
    /// Radius within which terrain vertices contribute to a height sample.
    pub sample_radius: f32,
    /// Terrain height a new session starts from.
    pub rest_height: f32,
    /// Orbit radius at which the vehicle placement is centered before height correction.
    pub midpoint: f32,
    /// Vertical offset of the vehicle body above the estimated terrain height.
    pub vehicle_offset: f32,
    /// Number of starfield points generated per session.
    pub cosmos_size: usize,
}

/// Render cadence configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// MSAA sample count requested from the renderer.
    pub msaa_samples: u32,
    /// Render rate cap in frames per second.
    pub max_fps: f64,
    /// Simulated seconds between refreshes of the elapsed-session status line.
    pub status_interval: f64,
}

/// Terrain mesh source and procedural generation parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// RON vertex list to load instead of generating terrain.
    pub mesh_path: Option<PathBuf>,
    /// Noise seed for procedural terrain.
    pub seed: u32,
    /// Base radius of the planet surface.
    pub radius: f32,
    /// Peak displacement of the surface away from `radius`.
    pub amplitude: f32,
    /// Half-width of the generated band either side of the orbit plane.
    pub band_half_width: f32,
    /// Vertices around the orbit.
    pub longitude_segments: u32,
    /// Vertex rows across the band.
    pub latitude_segments: u32,
    /// fBm octave count.
    pub octaves: usize,
    /// fBm base frequency, in cycles per unit of the unit sphere.
    pub frequency: f64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Minimum wall-clock seconds between two rate reports.
    pub stats_cooldown: f64,
    /// Write a JSON log file in debug builds.
    pub log_to_file: bool,
}

// --- Default implementations ---

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            logic_rate: 60.0,
            sim_speed: 0.1,
            correction_gain: 88.0,
            sample_radius: 0.63,
            rest_height: 14.3,
            midpoint: 14.3,
            vehicle_offset: 0.16,
            cosmos_size: 256,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            msaa_samples: 16,
            max_fps: 144.0,
            status_interval: 1.0,
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            mesh_path: None,
            seed: 0x6d61_7273,
            radius: 14.3,
            amplitude: 0.25,
            band_half_width: 1.2,
            longitude_segments: 512,
            latitude_segments: 9,
            octaves: 4,
            frequency: 6.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            stats_cooldown: 2.0,
            log_to_file: true,
        }
    }
}

// --- Load / Validate ---

impl Config {
    /// Load `config.ron` from the given directory, or fall back to defaults if it does not exist.
    ///
    /// Nothing is ever written back; the simulation keeps no state on disk.
    pub fn load_or_default(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config = Self::from_ron(&contents)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            log::debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            Ok(Config::default())
        }
    }

    /// Parse a config from RON text. Missing sections take their defaults.
    pub fn from_ron(contents: &str) -> Result<Self, ConfigError> {
        ron::from_str(contents).map_err(ConfigError::ParseError)
    }

    /// Platform config directory for this application, if the OS exposes one.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|base| base.join("hova"))
    }

    /// Fixed logic timestep in seconds.
    pub fn delta_time(&self) -> f64 {
        1.0 / self.sim.logic_rate
    }

    /// Reject values that would stall or invert the simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sim.logic_rate.is_finite() && self.sim.logic_rate >= MIN_LOGIC_RATE) {
            return Err(ConfigError::Invalid {
                field: "sim.logic_rate",
                reason: "must be finite and at least 0.001",
            });
        }
        if !(self.render.max_fps.is_finite() && self.render.max_fps > 0.0) {
            return Err(ConfigError::Invalid {
                field: "render.max_fps",
                reason: "must be finite and positive",
            });
        }
        if !(self.sim.sample_radius >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "sim.sample_radius",
                reason: "must not be negative",
            });
        }
        if !(self.render.status_interval.is_finite() && self.render.status_interval > 0.0) {
            return Err(ConfigError::Invalid {
                field: "render.status_interval",
                reason: "must be finite and positive",
            });
        }
        if self.terrain.longitude_segments < 3 || self.terrain.latitude_segments == 0 {
            return Err(ConfigError::Invalid {
                field: "terrain.longitude_segments",
                reason: "needs at least 3 segments and 1 row",
            });
        }
        Ok(())
    }
}
