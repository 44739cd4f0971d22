//! Simulation snapshot — the complete readable state after a tick.
//!
//! The external recorder serializes these as JSON at its own cadence;
//! no wire or on-disk format is defined here. Entity references are
//! exported as their stable 64-bit id so a snapshot never dangles.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::components::SensorKind;
use crate::types::SimTime;

/// Complete readable state of the simulation after a tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    pub time: SimTime,
    pub platforms: Vec<PlatformView>,
    pub sensors: Vec<SensorView>,
}

/// One platform's live pose and motion state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformView {
    /// Stable entity id (generational bits).
    pub id: u64,
    pub position: Vec3,
    /// Euler degrees, Z·Y·X convention.
    pub rotation: Vec3,
    pub scale: Vec3,
    /// m/s.
    pub linear_velocity: Vec3,
    /// rad/s.
    pub angular_velocity: Vec3,
}

/// One sensor's current target list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorView {
    /// Stable id of the owning entity.
    pub owner: u64,
    pub kind: SensorKind,
    pub targets: Vec<TargetView>,
}

/// One tracked target, in sensor-relative terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetView {
    /// Stable id of the detected entity.
    pub entity: u64,
    /// Signed horizontal bearing from the sensor's forward axis (degrees).
    pub bearing_deg: f32,
    /// Distance from the sensor (meters).
    pub range: f32,
}
