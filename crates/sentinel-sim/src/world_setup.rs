//! Canned scenario builders shared by tests and demos.

use glam::Vec3;
use hecs::Entity;

use sentinel_core::components::{AxisFlags, ColliderShape, RigidBodyConfig, SensorConfig};
use sentinel_core::types::Transform;

use crate::engine::{PlatformSpec, Simulation};

/// A static sensor platform: immovable box body carrying the given sensor.
pub fn spawn_watchtower(sim: &mut Simulation, position: Vec3, sensor: SensorConfig) -> Entity {
    sim.spawn_platform(PlatformSpec {
        transform: Transform::from_position(position),
        rigid_body: Some(RigidBodyConfig {
            mass: 0.0,
            gravity_enabled: false,
            ..RigidBodyConfig::default()
        }),
        collider: Some(ColliderShape::Box {
            width: 4.0,
            length: 4.0,
            height: 12.0,
        }),
        sensor: Some(sensor),
    })
}

/// A detectable contact flying a straight kinematic track.
pub fn spawn_contact(sim: &mut Simulation, position: Vec3, velocity: Vec3) -> Entity {
    sim.spawn_platform(PlatformSpec {
        transform: Transform::from_position(position),
        rigid_body: Some(RigidBodyConfig {
            kinematic: true,
            gravity_enabled: false,
            linear_velocity: velocity,
            ..RigidBodyConfig::default()
        }),
        collider: Some(ColliderShape::Sphere { radius: 2.0 }),
        sensor: None,
    })
}

/// A unit-mass sphere released at altitude under gravity.
pub fn spawn_drop_probe(sim: &mut Simulation, height: f32) -> Entity {
    sim.spawn_platform(PlatformSpec {
        transform: Transform::from_position(Vec3::new(0.0, 0.0, height)),
        rigid_body: Some(RigidBodyConfig::default()),
        collider: Some(ColliderShape::Sphere { radius: 0.5 }),
        sensor: None,
    })
}

/// A gravity-exempt dynamic probe with frozen axes and an initial push,
/// for verifying that frozen coordinates never move.
pub fn spawn_frozen_probe(
    sim: &mut Simulation,
    freeze_position: AxisFlags,
    velocity: Vec3,
) -> Entity {
    sim.spawn_platform(PlatformSpec {
        transform: Transform::default(),
        rigid_body: Some(RigidBodyConfig {
            gravity_enabled: false,
            linear_velocity: velocity,
            freeze_position,
            ..RigidBodyConfig::default()
        }),
        collider: Some(ColliderShape::Sphere { radius: 0.5 }),
        sensor: None,
    })
}
