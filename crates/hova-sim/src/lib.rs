//! Simulation core for a hover vehicle orbiting low over a small planet.
//!
//! Everything here is deterministic given a seed and a terrain mesh: the
//! starfield drawn at session start, the hover height integrated each fixed
//! tick, and the orbit camera derived from simulated time.

pub mod camera;
pub mod cosmos;
pub mod elapsed;
pub mod hover;
pub mod random;
pub mod session;
pub mod terrain;

pub use camera::OrbitCamera;
pub use cosmos::{COSMOS_SIZE, StarfieldPoint, generate_cosmos};
pub use elapsed::{ElapsedStyle, format_elapsed};
pub use hover::{HoverDynamics, HoverParams, HoverState};
pub use random::{Entropy, FixedEntropy, OsEntropy, RandomSource, seed_or_time, time_seed};
pub use session::{FrameSnapshot, SessionParams, SimClock, SimulationSession};
pub use terrain::{BandParams, HeightSample, TerrainMesh, estimate_height, generate_band};
