//! Sensor detection system.
//!
//! Each tick, every sensor-equipped entity scans the world for detectable
//! entities inside its envelope and maintains a detection set plus an
//! ordered target list. Updates are incremental: a target already held is
//! updated in place rather than removed and re-appended, so consumers
//! animating detections see continuity instead of flicker.
//!
//! Invariant: an entity is in a sensor's detection set iff it appears
//! exactly once in that sensor's target list.

use std::collections::{HashMap, HashSet};

use glam::Vec3;
use hecs::{Entity, World};

use sentinel_core::components::{Detectable, SensorConfig, SensorKind};
use sentinel_core::types::{bearing_deg, elevation_deg, Transform};

/// One tracked target, in sensor-relative terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub entity: Entity,
    /// Signed horizontal bearing from the sensor's forward axis (degrees).
    pub bearing_deg: f32,
    /// Distance from the sensor (meters).
    pub range: f32,
}

/// Incremental detection state for one sensor.
#[derive(Debug, Default)]
pub struct SensorState {
    detected: HashSet<Entity>,
    targets: Vec<Target>,
}

impl SensorState {
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn is_detected(&self, entity: Entity) -> bool {
        self.detected.contains(&entity)
    }
}

/// Owns the per-sensor detection state, keyed by the owning entity's
/// stable id.
#[derive(Debug, Default)]
pub struct SensorDetectionEngine {
    sensors: HashMap<Entity, SensorState>,
}

impl SensorDetectionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one scan for every sensor-equipped entity.
    pub fn run(&mut self, world: &World) {
        // Copy the sensor poses out first so the candidate query below
        // never overlaps a live borrow of the same components.
        let scans: Vec<(Entity, Transform, SensorConfig)> = {
            let mut query = world.query::<(&Transform, &SensorConfig)>();
            query
                .iter()
                .map(|(entity, (transform, config))| (entity, *transform, *config))
                .collect()
        };

        for (owner, transform, config) in scans {
            let state = self.sensors.entry(owner).or_default();
            scan(owner, &transform, &config, world, state);
        }
    }

    /// Current target list for a sensor owner (empty if it has none).
    pub fn targets(&self, owner: Entity) -> &[Target] {
        self.sensors
            .get(&owner)
            .map(SensorState::targets)
            .unwrap_or(&[])
    }

    /// Whether `entity` is currently in `owner`'s detection set.
    pub fn is_detected(&self, owner: Entity, entity: Entity) -> bool {
        self.sensors
            .get(&owner)
            .is_some_and(|state| state.is_detected(entity))
    }

    /// Evict a despawned entity: drop its own sensor state and remove it
    /// from every other sensor's set and list. Keeps the set/list
    /// invariant across entity removal.
    pub fn forget(&mut self, entity: Entity) {
        self.sensors.remove(&entity);
        for state in self.sensors.values_mut() {
            if state.detected.remove(&entity) {
                state.targets.retain(|target| target.entity != entity);
            }
        }
    }
}

/// One incremental scan of `world` for a single sensor.
///
/// Non-detectable entities and the sensor's own owner are filtered out
/// before any geometry is evaluated.
pub(crate) fn scan(
    owner: Entity,
    source: &Transform,
    config: &SensorConfig,
    world: &World,
    state: &mut SensorState,
) {
    let mut query = world.query::<(&Transform, &Detectable)>();
    for (entity, (transform, _)) in query.iter() {
        if entity == owner {
            continue;
        }

        let local = source.world_to_local(transform.position);
        let range = local.length();
        let inside = match config.kind {
            SensorKind::Radar => radar_envelope(local, range, config),
            SensorKind::EwReceiver => range < config.ew_range,
        };

        if inside {
            if state.detected.insert(entity) {
                state.targets.push(Target {
                    entity,
                    bearing_deg: bearing_deg(local),
                    range,
                });
            } else if let Some(target) =
                state.targets.iter_mut().find(|target| target.entity == entity)
            {
                // Already held: update in place, list position unchanged.
                target.bearing_deg = bearing_deg(local);
                target.range = range;
            }
        } else if state.detected.remove(&entity) {
            state.targets.retain(|target| target.entity != entity);
        }
    }
}

/// Standard radar envelope: range gate plus two independent linear angle
/// gates about the forward axis — an approximation of a cone, kept as-is
/// because changing it silently alters detection outcomes.
fn radar_envelope(local: Vec3, range: f32, config: &SensorConfig) -> bool {
    range < config.range
        && bearing_deg(local).abs() < config.max_detection_angle_deg
        && elevation_deg(local).abs() < config.max_detection_angle_deg
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_core::components::Platform;

    const RANGE: f32 = 1000.0;
    const HALF_ANGLE: f32 = 30.0;

    fn radar_config() -> SensorConfig {
        SensorConfig {
            kind: SensorKind::Radar,
            range: RANGE,
            ew_range: RANGE * 2.0,
            max_detection_angle_deg: HALF_ANGLE,
        }
    }

    fn ew_config() -> SensorConfig {
        SensorConfig {
            kind: SensorKind::EwReceiver,
            ..radar_config()
        }
    }

    fn spawn_contact(world: &mut World, position: Vec3) -> Entity {
        world.spawn((Platform, Detectable, Transform::from_position(position)))
    }

    fn assert_invariant(state: &SensorState) {
        assert_eq!(
            state.detected.len(),
            state.targets.len(),
            "set and list must stay the same size"
        );
        for target in &state.targets {
            assert!(
                state.detected.contains(&target.entity),
                "listed target missing from the detection set"
            );
            assert_eq!(
                state
                    .targets
                    .iter()
                    .filter(|t| t.entity == target.entity)
                    .count(),
                1,
                "target appears more than once in the list"
            );
        }
    }

    #[test]
    fn test_detects_target_ahead_within_range() {
        let mut world = World::new();
        let owner = world.spawn((Transform::default(),));
        let contact = spawn_contact(&mut world, Vec3::new(0.0, 0.0, RANGE / 2.0));

        let mut state = SensorState::default();
        scan(owner, &Transform::default(), &radar_config(), &world, &mut state);

        assert!(state.is_detected(contact));
        assert_eq!(state.targets().len(), 1);
        assert!((state.targets()[0].range - RANGE / 2.0).abs() < 1e-3);
        assert!(state.targets()[0].bearing_deg.abs() < 1e-3);
        assert_invariant(&state);
    }

    #[test]
    fn test_out_of_range_not_detected() {
        let mut world = World::new();
        let owner = world.spawn((Transform::default(),));
        spawn_contact(&mut world, Vec3::new(0.0, 0.0, RANGE * 1.5));

        let mut state = SensorState::default();
        scan(owner, &Transform::default(), &radar_config(), &world, &mut state);

        assert!(state.targets().is_empty());
    }

    #[test]
    fn test_off_axis_misses_radar_but_ew_hears_it() {
        let mut world = World::new();
        let owner = world.spawn((Transform::default(),));
        // Bearing 45° > 30° half-angle, well inside half range.
        let offset = RANGE / 4.0;
        let contact = spawn_contact(&mut world, Vec3::new(offset, 0.0, offset));

        let mut radar_state = SensorState::default();
        scan(
            owner,
            &Transform::default(),
            &radar_config(),
            &world,
            &mut radar_state,
        );
        assert!(
            !radar_state.is_detected(contact),
            "bearing past the half-angle must fail the radar gate"
        );

        let mut ew_state = SensorState::default();
        scan(owner, &Transform::default(), &ew_config(), &world, &mut ew_state);
        assert!(
            ew_state.is_detected(contact),
            "the EW variant has no angular gate"
        );
    }

    #[test]
    fn test_elevation_gate_is_independent() {
        let mut world = World::new();
        let owner = world.spawn((Transform::default(),));
        // Zero bearing, elevation 45° > 30°.
        let offset = RANGE / 4.0;
        spawn_contact(&mut world, Vec3::new(0.0, offset, offset));

        let mut state = SensorState::default();
        scan(owner, &Transform::default(), &radar_config(), &world, &mut state);
        assert!(state.targets().is_empty(), "elevation gate must reject");
    }

    #[test]
    fn test_rescan_without_movement_is_stable() {
        let mut world = World::new();
        let owner = world.spawn((Transform::default(),));
        let a = spawn_contact(&mut world, Vec3::new(0.0, 0.0, 100.0));
        let b = spawn_contact(&mut world, Vec3::new(50.0, 0.0, 200.0));

        let mut state = SensorState::default();
        scan(owner, &Transform::default(), &radar_config(), &world, &mut state);
        let first: Vec<Target> = state.targets().to_vec();
        assert_eq!(first.len(), 2);

        scan(owner, &Transform::default(), &radar_config(), &world, &mut state);
        assert_eq!(
            state.targets(),
            first.as_slice(),
            "a second scan with no movement must not reorder or duplicate"
        );
        let _ = (a, b);
        assert_invariant(&state);
    }

    #[test]
    fn test_moving_target_updated_in_place() {
        let mut world = World::new();
        let owner = world.spawn((Transform::default(),));
        let a = spawn_contact(&mut world, Vec3::new(0.0, 0.0, 100.0));
        let b = spawn_contact(&mut world, Vec3::new(0.0, 0.0, 200.0));

        let mut state = SensorState::default();
        scan(owner, &Transform::default(), &radar_config(), &world, &mut state);
        let index_a = state
            .targets()
            .iter()
            .position(|t| t.entity == a)
            .expect("a detected");

        // Move A within the envelope.
        world.get::<&mut Transform>(a).unwrap().position = Vec3::new(30.0, 0.0, 150.0);
        scan(owner, &Transform::default(), &radar_config(), &world, &mut state);

        let target_a = state.targets()[index_a];
        assert_eq!(
            target_a.entity, a,
            "in-envelope movement must keep the same list position"
        );
        assert!((target_a.range - Vec3::new(30.0, 0.0, 150.0).length()).abs() < 1e-3);
        assert!(target_a.bearing_deg > 0.0, "bearing must track the move");
        assert!(state.is_detected(b));
        assert_invariant(&state);
    }

    #[test]
    fn test_departing_target_removed_order_preserved() {
        let mut world = World::new();
        let owner = world.spawn((Transform::default(),));
        let a = spawn_contact(&mut world, Vec3::new(0.0, 0.0, 100.0));
        let b = spawn_contact(&mut world, Vec3::new(0.0, 0.0, 200.0));
        let c = spawn_contact(&mut world, Vec3::new(0.0, 0.0, 300.0));

        let mut state = SensorState::default();
        scan(owner, &Transform::default(), &radar_config(), &world, &mut state);
        let order: Vec<Entity> = state.targets().iter().map(|t| t.entity).collect();
        assert_eq!(order.len(), 3);

        // B leaves the envelope; A and C keep their relative order.
        world.get::<&mut Transform>(b).unwrap().position = Vec3::new(0.0, 0.0, RANGE * 2.0);
        scan(owner, &Transform::default(), &radar_config(), &world, &mut state);

        let survivors: Vec<Entity> = state.targets().iter().map(|t| t.entity).collect();
        let expected: Vec<Entity> = order.into_iter().filter(|e| *e != b).collect();
        assert_eq!(survivors, expected);
        assert!(!state.is_detected(b));
        let _ = (a, c);
        assert_invariant(&state);
    }

    #[test]
    fn test_owner_and_non_detectable_filtered() {
        let mut world = World::new();
        // Owner is itself detectable and sits at the origin of its own frame.
        let owner = world.spawn((Platform, Detectable, Transform::default()));
        // Abstract entity: transform but no Detectable capability.
        world.spawn((Transform::from_position(Vec3::new(0.0, 0.0, 100.0)),));

        let mut state = SensorState::default();
        scan(owner, &Transform::default(), &radar_config(), &world, &mut state);
        assert!(
            state.targets().is_empty(),
            "owner and non-detectable entities never reach the envelope test"
        );
    }

    #[test]
    fn test_forget_clears_all_sensor_state() {
        let mut world = World::new();
        let owner = world.spawn((Transform::default(), radar_config()));
        let contact = spawn_contact(&mut world, Vec3::new(0.0, 0.0, 100.0));

        let mut engine = SensorDetectionEngine::new();
        engine.run(&world);
        assert!(engine.is_detected(owner, contact));

        engine.forget(contact);
        assert!(!engine.is_detected(owner, contact));
        assert!(engine.targets(owner).is_empty());

        engine.forget(owner);
        assert!(engine.targets(owner).is_empty());
    }

    #[test]
    fn test_sensor_frame_follows_owner_pose() {
        let mut world = World::new();
        let owner = world.spawn((Transform::default(),));
        let contact = spawn_contact(&mut world, Vec3::new(100.0, 0.0, 0.0));

        // Pitch the sensor 90° about Y so its forward axis (+Z) points at
        // the contact on world +X.
        let mut source = Transform::default();
        source.rotation = Vec3::new(0.0, 90.0, 0.0);

        let mut state = SensorState::default();
        scan(owner, &source, &radar_config(), &world, &mut state);
        assert!(
            state.is_detected(contact),
            "rotating the sensor frame must rotate the envelope with it"
        );
        assert!(state.targets()[0].bearing_deg.abs() < 1.0);
    }
}
