//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Hova command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "hova", about = "Hover vehicle simulation over a small planet")]
pub struct CliArgs {
    /// MSAA sample count.
    pub msaa: Option<u32>,

    /// Maximum render rate in frames per second.
    pub max_fps: Option<f64>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Fixed session seed; skips the OS entropy read.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop after this many simulated seconds.
    #[arg(long)]
    pub duration: Option<f64>,

    /// RON vertex list to use as the terrain mesh.
    #[arg(long)]
    pub mesh: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(msaa) = args.msaa {
            self.render.msaa_samples = msaa;
        }
        if let Some(fps) = args.max_fps {
            self.render.max_fps = fps;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(ref mesh) = args.mesh {
            self.terrain.mesh_path = Some(mesh.clone());
        }
    }
}
