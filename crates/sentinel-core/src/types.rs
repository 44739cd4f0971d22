//! Fundamental geometric and simulation types.

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Authored pose of an entity in world space (meters, Z = up).
///
/// `rotation` holds Euler angles in degrees, applied intrinsically in
/// Z·Y·X order: yaw about Z, then pitch about Y, then roll about X.
/// This matches how scenario files author orientation; the physics step
/// decomposes engine quaternions back into the same convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in degrees: x = roll, y = pitch, z = yaw.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Orientation as a quaternion (Z·Y·X intrinsic, degrees → radians).
    pub fn quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::ZYX,
            self.rotation.z.to_radians(),
            self.rotation.y.to_radians(),
            self.rotation.x.to_radians(),
        )
    }

    /// Overwrite the Euler rotation from a quaternion, decomposed in the
    /// same Z·Y·X order the authoring side uses.
    pub fn set_rotation_quat(&mut self, quat: Quat) {
        let (yaw, pitch, roll) = quat.to_euler(EulerRot::ZYX);
        self.rotation = Vec3::new(roll.to_degrees(), pitch.to_degrees(), yaw.to_degrees());
    }

    /// Full affine matrix (scale, then rotate, then translate).
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }

    /// Map a world-space point into this transform's local frame.
    /// This is the sensor-frame transform used by detection scans.
    pub fn world_to_local(&self, world_point: Vec3) -> Vec3 {
        self.matrix().inverse().transform_point3(world_point)
    }
}

/// Signed horizontal bearing of a local-frame point, in degrees.
/// Zero along local +Z, positive toward local +X.
pub fn bearing_deg(local: Vec3) -> f32 {
    local.x.atan2(local.z).to_degrees()
}

/// Signed elevation of a local-frame point, in degrees.
/// Zero along local +Z, positive toward local +Y.
pub fn elevation_deg(local: Vec3) -> f32 {
    local.y.atan2(local.z).to_degrees()
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each frame).
    pub tick: u64,
    /// Elapsed simulated time in seconds (speed-scaled deltas).
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one frame of `dt` simulated seconds.
    pub fn advance(&mut self, dt: f32) {
        self.tick += 1;
        self.elapsed_secs += f64::from(dt);
    }
}
