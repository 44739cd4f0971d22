//! Configuration commands applied at the next frame boundary.
//!
//! Commands are queued by the embedding host and processed at the start
//! of the next frame, so a change is always effective on the next
//! step/scan and never observed mid-tick.

use glam::Vec3;
use hecs::Entity;

use crate::components::AxisFlags;

/// All runtime configuration actions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimCommand {
    // --- World ---
    /// Replace the world gravity vector fed to the physics step.
    SetGravity { gravity: Vec3 },

    // --- Per-entity rigid body flags ---
    /// Toggle gravity for one entity's body.
    SetGravityEnabled { entity: Entity, enabled: bool },
    /// Switch an entity's body between dynamic and kinematic drive.
    SetKinematic { entity: Entity, kinematic: bool },
    /// Replace the per-axis freeze flags.
    SetFreezeAxes {
        entity: Entity,
        position: AxisFlags,
        rotation: AxisFlags,
    },

    // --- Per-sensor envelope ---
    /// Set a sensor's radar detection range (meters).
    SetSensorRange { entity: Entity, range: f32 },
    /// Set a sensor's EW receiver range (meters).
    SetSensorEwRange { entity: Entity, ew_range: f32 },
    /// Set a sensor's radar half-angle (degrees).
    SetSensorFieldOfView {
        entity: Entity,
        half_angle_deg: f32,
    },
}
