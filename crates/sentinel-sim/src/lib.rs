//! Simulation engine for SENTINEL.
//!
//! Owns the hecs entity world, advances rigid-body physics with a bounded
//! sub-step, and maintains per-sensor incremental detection state.
//! Completely headless (no rendering dependency), enabling deterministic
//! testing.

pub mod clock;
pub mod engine;
pub mod rigid_body;
pub mod systems;
pub mod world_setup;

pub use clock::SimulationClock;
pub use engine::{PlatformSpec, SimConfig, Simulation};
pub use sentinel_core as core;
