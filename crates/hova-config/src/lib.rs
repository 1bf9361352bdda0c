//! Configuration system for the hova simulation.
//!
//! Settings are read from an optional RON file and overridden by command-line
//! arguments parsed with clap. Unknown fields are ignored and missing ones take
//! their defaults, so old and new config files both load.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE, Config, DebugConfig, MIN_LOGIC_RATE, RenderConfig, SimConfig, TerrainConfig,
};
pub use error::ConfigError;
