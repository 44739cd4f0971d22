//! Systems that run against the simulation world each tick.
//!
//! Detection mutates only its own sensor state; snapshot is read-only.

pub mod detection;
pub mod snapshot;
