//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods beyond small
//! geometry helpers. Simulation logic lives in systems, not components.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Marks an entity as a platform — a controllable physical object, as
/// opposed to abstract container/marker entities.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Platform;

/// Capability marker: entities carrying this are candidates for sensor
/// detection. Queried by presence; abstract entities simply omit it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Detectable;

/// Live motion state, written back from the physics engine every step.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Kinematics {
    /// Linear velocity in world space (m/s).
    pub linear_velocity: Vec3,
    /// Angular velocity in world space (rad/s).
    pub angular_velocity: Vec3,
}

/// Per-axis freeze flags. A frozen axis contributes nothing to motion:
/// the corresponding position or rotation component never changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisFlags {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl AxisFlags {
    pub const NONE: Self = Self {
        x: false,
        y: false,
        z: false,
    };

    pub fn any(&self) -> bool {
        self.x || self.y || self.z
    }
}

/// Authored rigid-body configuration.
///
/// `mass <= 0` models a static body (zero inertia, immovable).
/// `kinematic` bodies are driven externally by their velocities and are
/// exempt from forces and auto-deactivation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RigidBodyConfig {
    pub mass: f32,
    pub gravity_enabled: bool,
    pub kinematic: bool,
    /// Initial linear velocity (m/s).
    pub linear_velocity: Vec3,
    /// Initial angular velocity (rad/s).
    pub angular_velocity: Vec3,
    pub freeze_position: AxisFlags,
    pub freeze_rotation: AxisFlags,
}

impl Default for RigidBodyConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            gravity_enabled: true,
            kinematic: false,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            freeze_position: AxisFlags::NONE,
            freeze_rotation: AxisFlags::NONE,
        }
    }
}

/// Authored collision shape, in unscaled local dimensions.
/// The entity transform's scale is applied at body creation and again
/// whenever the transform is edited outside the physics step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ColliderShape {
    Box { width: f32, length: f32, height: f32 },
    Sphere { radius: f32 },
}

impl ColliderShape {
    /// Apply a transform scale to the authored dimensions.
    /// A non-uniform scale on a sphere takes the largest axis.
    pub fn scaled(&self, scale: Vec3) -> ColliderShape {
        match *self {
            ColliderShape::Box {
                width,
                length,
                height,
            } => ColliderShape::Box {
                width: width * scale.x,
                length: length * scale.y,
                height: height * scale.z,
            },
            ColliderShape::Sphere { radius } => ColliderShape::Sphere {
                radius: radius * scale.max_element(),
            },
        }
    }
}

/// Sensor variant: directional radar or passive EW receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorKind {
    /// Range plus two angular gates about the sensor's forward axis.
    Radar,
    /// Range-only passive receiver, no angular gate.
    EwReceiver,
}

/// Authored sensor envelope, attached to the owning platform entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SensorConfig {
    pub kind: SensorKind,
    /// Radar detection range (meters).
    pub range: f32,
    /// EW receiver detection range (meters).
    pub ew_range: f32,
    /// Half-angle of the radar envelope, degrees.
    pub max_detection_angle_deg: f32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            kind: SensorKind::Radar,
            range: DEFAULT_SENSOR_RANGE,
            ew_range: DEFAULT_EW_RANGE,
            max_detection_angle_deg: DEFAULT_DETECTION_HALF_ANGLE_DEG,
        }
    }
}
