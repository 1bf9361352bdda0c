//! Hova application layer.
//!
//! Owns the fixed-timestep scheduler plus the seams it talks through: terrain
//! loading, stdin commands, a headless renderer and rate diagnostics.

pub mod assets;
pub mod input;
pub mod render;
pub mod scheduler;
pub mod stats;

pub use assets::{AssetError, load_terrain};
pub use input::{ChannelInput, InputSource, SimCommand, spawn_stdin_input};
pub use render::{HeadlessRenderer, Renderer};
pub use scheduler::{
    Iteration, RenderGate, Scheduler, SchedulerSettings, SchedulerState, next_wait,
    session_params,
};
pub use stats::{RateReport, RateWindow, status_line, time_taken};
