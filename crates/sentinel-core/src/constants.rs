//! Simulation constants and tuning parameters.

use glam::Vec3;

// --- Time stepping ---

/// Default frame rate of the periodic driver (Hz).
pub const DEFAULT_FRAME_RATE: u32 = 60;

/// Largest time slice the physics engine is advanced by in one call.
/// Frame deltas above this are split into equal sub-steps, regardless of
/// the caller's speed multiplier.
pub const MAX_SUBSTEP_SECS: f32 = 1.0 / 60.0;

/// Default speed multiplier (1.0 = real time).
pub const DEFAULT_TIME_SCALE: f32 = 1.0;

// --- World ---

/// Default gravity vector (m/s², Z = up).
pub const DEFAULT_GRAVITY: Vec3 = Vec3::new(0.0, 0.0, -9.81);

// --- Sensors ---

/// Default radar detection range (meters).
pub const DEFAULT_SENSOR_RANGE: f32 = 40_000.0;

/// Default EW receiver range (meters). Passive receivers hear emitters
/// well beyond radar detection range.
pub const DEFAULT_EW_RANGE: f32 = 80_000.0;

/// Default radar envelope half-angle (degrees).
pub const DEFAULT_DETECTION_HALF_ANGLE_DEG: f32 = 60.0;
