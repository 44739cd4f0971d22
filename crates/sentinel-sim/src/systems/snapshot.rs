//! Snapshot system: queries the world and builds a `SimulationSnapshot`.
//!
//! Read-only — it never modifies the world or any sensor state. Entity
//! ids are exported as their stable 64-bit form so the external recorder
//! can serialize snapshots without holding live handles.

use hecs::World;

use sentinel_core::components::{Kinematics, Platform, SensorConfig};
use sentinel_core::state::{PlatformView, SensorView, SimulationSnapshot, TargetView};
use sentinel_core::types::{SimTime, Transform};

use crate::systems::detection::SensorDetectionEngine;

/// Build the complete readable state after a tick.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    sensors: &SensorDetectionEngine,
) -> SimulationSnapshot {
    SimulationSnapshot {
        time: *time,
        platforms: build_platforms(world),
        sensors: build_sensors(world, sensors),
    }
}

/// Live pose and motion of every platform.
fn build_platforms(world: &World) -> Vec<PlatformView> {
    let mut platforms: Vec<PlatformView> = world
        .query::<(&Platform, &Transform, &Kinematics)>()
        .iter()
        .map(|(entity, (_, transform, kinematics))| PlatformView {
            id: entity.to_bits().get(),
            position: transform.position,
            rotation: transform.rotation,
            scale: transform.scale,
            linear_velocity: kinematics.linear_velocity,
            angular_velocity: kinematics.angular_velocity,
        })
        .collect();

    platforms.sort_by_key(|p| p.id);
    platforms
}

/// Current target list of every sensor-equipped entity.
fn build_sensors(world: &World, sensors: &SensorDetectionEngine) -> Vec<SensorView> {
    let mut views: Vec<SensorView> = world
        .query::<&SensorConfig>()
        .iter()
        .map(|(entity, config)| SensorView {
            owner: entity.to_bits().get(),
            kind: config.kind,
            targets: sensors
                .targets(entity)
                .iter()
                .map(|target| TargetView {
                    entity: target.entity.to_bits().get(),
                    bearing_deg: target.bearing_deg,
                    range: target.range,
                })
                .collect(),
        })
        .collect();

    views.sort_by_key(|s| s.owner);
    views
}
