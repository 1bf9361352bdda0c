//! Seedable random source for session initialization, plus the one-shot OS
//! entropy read used to pick a session seed.
//!
//! Sampling is repeatable for a given seed. Nothing here is meant to be
//! cryptographically strong; the OS source only chooses which stream a
//! session gets.

use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec3;
use rand::rngs::OsRng;
use rand::{Rng, SeedableRng, TryRngCore};
use rand_chacha::ChaCha8Rng;
use tracing::warn;

/// Fast seeded generator for uniform scalars and directions.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: ChaCha8Rng,
    seed: u64,
}

impl RandomSource {
    /// Create a source positioned at the start of `seed`'s stream.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Restart the stream from `seed`.
    pub fn seed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.seed = seed;
    }

    /// The seed the current stream started from.
    pub fn current_seed(&self) -> u64 {
        self.seed
    }

    /// Uniform float in `[0, 1)`.
    pub fn unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    /// Uniform float in `[min, max)`.
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.unit() * (max - min)
    }

    /// Direction uniformly distributed over the unit sphere.
    pub fn unit_vector(&mut self) -> Vec3 {
        let theta = self.unit() * std::f32::consts::TAU;
        // Uniform in cos(phi) so the poles are not over-sampled.
        let phi = (1.0 - 2.0 * self.unit()).acos();
        Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos())
    }
}

/// Where session seeds come from.
///
/// The binary reads the OS; tests and `--seed` runs inject a fixed value.
pub trait Entropy {
    /// Produce a fresh seed. Called once per session.
    fn entropy(&mut self) -> u64;
}

/// Reads the operating system's random device on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl Entropy for OsEntropy {
    fn entropy(&mut self) -> u64 {
        seed_or_time(OsRng.try_next_u64())
    }
}

/// The seed from an entropy read, or [`time_seed`] if the read failed.
pub fn seed_or_time<E: std::fmt::Display>(read: Result<u64, E>) -> u64 {
    match read {
        Ok(seed) => seed,
        Err(e) => {
            let seed = time_seed();
            warn!("OS entropy unavailable ({e}), using time-derived seed {seed}");
            seed
        }
    }
}

/// Always returns the same seed.
#[derive(Debug, Clone, Copy)]
pub struct FixedEntropy(pub u64);

impl Entropy for FixedEntropy {
    fn entropy(&mut self) -> u64 {
        self.0
    }
}

/// Seed derived from the system clock, in microseconds since the Unix epoch.
pub fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or_default()
}
