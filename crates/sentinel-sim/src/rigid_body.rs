//! Rigid-body registry — the seam between the entity world and rapier.
//!
//! Owns exactly one physics body per physics-enabled entity, keyed by the
//! entity's stable id. All rapier types stay inside this module so the
//! physics engine remains swappable. Authored configuration flows in
//! through `add`/`sync_from_authoring`; authoritative engine state flows
//! back into `Transform`/`Kinematics` after every step.

use std::collections::HashMap;

use glam::{Quat, Vec3};
use hecs::{Entity, World};
use rapier3d::na::{Quaternion, UnitQuaternion};
use rapier3d::prelude::*;
use thiserror::Error;

use sentinel_core::components::{ColliderShape, Kinematics, RigidBodyConfig};
use sentinel_core::constants::MAX_SUBSTEP_SECS;
use sentinel_core::types::Transform;

/// Errors surfaced by registry mutation. The engine absorbs these with a
/// log entry and skips the entity; nothing propagates past the tick.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("entity {0:?} already has a registered physics body")]
    AlreadyRegistered(Entity),
    #[error("entity {0:?} has no transform")]
    MissingTransform(Entity),
    #[error("entity {0:?} has no rigid body configuration")]
    MissingRigidBody(Entity),
    #[error("entity {0:?} has no collider shape")]
    MissingCollider(Entity),
}

/// Engine-owned handles for one entity's body.
struct PhysicsBody {
    body: RigidBodyHandle,
    collider: ColliderHandle,
}

/// Owns the rapier world and the entity → body map.
pub struct RigidBodyRegistry {
    pipeline: PhysicsPipeline,
    integration: IntegrationParameters,
    islands: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    handles: HashMap<Entity, PhysicsBody>,
}

impl Default for RigidBodyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RigidBodyRegistry {
    pub fn new() -> Self {
        Self {
            pipeline: PhysicsPipeline::new(),
            integration: IntegrationParameters::default(),
            islands: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            handles: HashMap::new(),
        }
    }

    /// Number of registered bodies.
    pub fn body_count(&self) -> usize {
        self.handles.len()
    }

    /// Whether an entity currently has a body.
    pub fn contains(&self, entity: Entity) -> bool {
        self.handles.contains_key(&entity)
    }

    /// Create a body for an entity from its authored components.
    ///
    /// The collision shape is scaled by the transform's scale. Body type:
    /// `kinematic` → velocity-based kinematic (never auto-sleeps),
    /// `mass <= 0` → fixed (zero inertia), otherwise dynamic.
    pub fn add(&mut self, world: &World, entity: Entity) -> Result<(), RegistryError> {
        if self.handles.contains_key(&entity) {
            return Err(RegistryError::AlreadyRegistered(entity));
        }
        let transform = *world
            .get::<&Transform>(entity)
            .map_err(|_| RegistryError::MissingTransform(entity))?;
        let config = *world
            .get::<&RigidBodyConfig>(entity)
            .map_err(|_| RegistryError::MissingRigidBody(entity))?;
        let shape = *world
            .get::<&ColliderShape>(entity)
            .map_err(|_| RegistryError::MissingCollider(entity))?;

        let builder = RigidBodyBuilder::new(body_type_for(&config))
            .position(isometry_of(&transform))
            .linvel(to_na(config.linear_velocity))
            .angvel(to_na(config.angular_velocity))
            .gravity_scale(gravity_scale_for(&config))
            .locked_axes(locked_axes_for(&config))
            .can_sleep(!config.kinematic)
            .user_data(u128::from(entity.to_bits().get()));
        let body = self.bodies.insert(builder);
        let collider = self.colliders.insert_with_parent(
            ColliderBuilder::new(shared_shape(shape.scaled(transform.scale)))
                .mass(config.mass.max(0.0)),
            body,
            &mut self.bodies,
        );
        self.handles.insert(entity, PhysicsBody { body, collider });
        Ok(())
    }

    /// Destroy an entity's body. Unknown id is a logged no-op.
    ///
    /// The map entry is dropped before the engine-side removal, so no
    /// handle is reachable once the body is gone; rapier releases the
    /// attached collider and motion state in the same call.
    pub fn remove(&mut self, entity: Entity) {
        let Some(handles) = self.handles.remove(&entity) else {
            log::warn!("remove: entity {entity:?} has no physics body");
            return;
        };
        self.bodies.remove(
            handles.body,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Push an authored transform edit into the engine.
    ///
    /// Both authoring and simulation write the same transform; once
    /// running, the engine is authoritative, so an outside edit must be
    /// pushed here before the next step. Rescales the collision shape and
    /// reads the body's velocities back into the entity. Unknown id is a
    /// logged no-op.
    pub fn sync_from_authoring(&mut self, world: &mut World, entity: Entity) {
        let Some(handles) = self.handles.get(&entity) else {
            log::warn!("sync_from_authoring: entity {entity:?} has no physics body");
            return;
        };
        let Ok(transform) = world.get::<&Transform>(entity).map(|t| *t) else {
            log::warn!("sync_from_authoring: entity {entity:?} lost its transform");
            return;
        };

        let Some(body) = self.bodies.get_mut(handles.body) else {
            return;
        };
        body.set_position(isometry_of(&transform), true);

        if let Some(collider) = self.colliders.get_mut(handles.collider) {
            if let Ok(shape) = world.get::<&ColliderShape>(entity) {
                collider.set_shape(shared_shape(shape.scaled(transform.scale)));
            }
        }

        let linear = from_na(body.linvel());
        let angular = from_na(body.angvel());
        if let Ok(mut kinematics) = world.get::<&mut Kinematics>(entity) {
            kinematics.linear_velocity = linear;
            kinematics.angular_velocity = angular;
        }
    }

    /// Advance the physics world by `dt` seconds under `gravity`, then
    /// copy authoritative state back into every registered entity.
    ///
    /// `dt` is split into sub-steps no larger than `MAX_SUBSTEP_SECS`
    /// regardless of the caller's speed multiplier. After stepping, each
    /// entity's live gravity/freeze/kinematic flags are re-applied (they
    /// may have changed since the body was built).
    pub fn step(&mut self, world: &mut World, dt: f32, gravity: Vec3) {
        let gravity = to_na(gravity);
        for_each_substep(dt, MAX_SUBSTEP_SECS, |sub_dt| {
            self.integration.dt = sub_dt;
            self.pipeline.step(
                &gravity,
                &self.integration,
                &mut self.islands,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd_solver,
                None,
                &(),
                &(),
            );
        });

        for (&entity, handles) in &self.handles {
            let Some(body) = self.bodies.get_mut(handles.body) else {
                continue;
            };

            let pose = *body.position();
            if let Ok(mut transform) = world.get::<&mut Transform>(entity) {
                transform.position = Vec3::new(
                    pose.translation.x,
                    pose.translation.y,
                    pose.translation.z,
                );
                let rot = pose.rotation;
                transform.set_rotation_quat(Quat::from_xyzw(rot.i, rot.j, rot.k, rot.w));
            }
            if let Ok(mut kinematics) = world.get::<&mut Kinematics>(entity) {
                kinematics.linear_velocity = from_na(body.linvel());
                kinematics.angular_velocity = from_na(body.angvel());
            }

            if let Ok(config) = world.get::<&RigidBodyConfig>(entity) {
                let scale = gravity_scale_for(&config);
                if body.gravity_scale() != scale {
                    body.set_gravity_scale(scale, true);
                }
                let axes = locked_axes_for(&config);
                if body.locked_axes() != axes {
                    body.set_locked_axes(axes, true);
                }
                let wanted = body_type_for(&config);
                if body.body_type() != wanted {
                    body.set_body_type(wanted, true);
                    body.wake_up(true);
                }
                if config.kinematic && body.is_sleeping() {
                    body.wake_up(true);
                }
            }
        }
    }
}

/// Split `dt` into equal sub-steps no larger than `max_substep` and run
/// `step` once per sub-step. Non-positive deltas run nothing.
pub(crate) fn for_each_substep(dt: f32, max_substep: f32, mut step: impl FnMut(f32)) {
    if dt <= 0.0 {
        return;
    }
    let count = (dt / max_substep).ceil().max(1.0) as u32;
    let sub_dt = dt / count as f32;
    for _ in 0..count {
        step(sub_dt);
    }
}

fn body_type_for(config: &RigidBodyConfig) -> RigidBodyType {
    if config.kinematic {
        RigidBodyType::KinematicVelocityBased
    } else if config.mass <= 0.0 {
        RigidBodyType::Fixed
    } else {
        RigidBodyType::Dynamic
    }
}

fn gravity_scale_for(config: &RigidBodyConfig) -> Real {
    if config.gravity_enabled {
        1.0
    } else {
        0.0
    }
}

fn locked_axes_for(config: &RigidBodyConfig) -> LockedAxes {
    let mut axes = LockedAxes::empty();
    if config.freeze_position.x {
        axes |= LockedAxes::TRANSLATION_LOCKED_X;
    }
    if config.freeze_position.y {
        axes |= LockedAxes::TRANSLATION_LOCKED_Y;
    }
    if config.freeze_position.z {
        axes |= LockedAxes::TRANSLATION_LOCKED_Z;
    }
    if config.freeze_rotation.x {
        axes |= LockedAxes::ROTATION_LOCKED_X;
    }
    if config.freeze_rotation.y {
        axes |= LockedAxes::ROTATION_LOCKED_Y;
    }
    if config.freeze_rotation.z {
        axes |= LockedAxes::ROTATION_LOCKED_Z;
    }
    axes
}

fn shared_shape(shape: ColliderShape) -> SharedShape {
    match shape {
        ColliderShape::Box {
            width,
            length,
            height,
        } => SharedShape::cuboid(width / 2.0, length / 2.0, height / 2.0),
        ColliderShape::Sphere { radius } => SharedShape::ball(radius),
    }
}

fn isometry_of(transform: &Transform) -> Isometry<Real> {
    let q = transform.quat();
    Isometry::from_parts(
        to_na(transform.position).into(),
        UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z)),
    )
}

fn to_na(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

fn from_na(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_core::components::AxisFlags;

    #[test]
    fn test_substeps_never_exceed_max() {
        let mut recorded = Vec::new();
        for_each_substep(5.0, MAX_SUBSTEP_SECS, |dt| recorded.push(dt));

        assert_eq!(recorded.len(), 300, "5 s at 1/60 s max = 300 sub-steps");
        for dt in &recorded {
            assert!(
                *dt <= MAX_SUBSTEP_SECS + 1e-6,
                "sub-step {dt} exceeds the 1/60 s bound"
            );
        }
        let total: f32 = recorded.iter().sum();
        assert!((total - 5.0).abs() < 1e-3, "sub-steps must sum to dt");
    }

    #[test]
    fn test_substeps_small_delta_is_single_step() {
        let mut recorded = Vec::new();
        for_each_substep(0.01, MAX_SUBSTEP_SECS, |dt| recorded.push(dt));
        assert_eq!(recorded, vec![0.01]);
    }

    #[test]
    fn test_substeps_non_positive_delta_runs_nothing() {
        let mut count = 0;
        for_each_substep(0.0, MAX_SUBSTEP_SECS, |_| count += 1);
        for_each_substep(-1.0, MAX_SUBSTEP_SECS, |_| count += 1);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_body_type_mapping() {
        let mut config = RigidBodyConfig::default();
        assert_eq!(body_type_for(&config), RigidBodyType::Dynamic);

        config.mass = 0.0;
        assert_eq!(body_type_for(&config), RigidBodyType::Fixed);

        config.kinematic = true;
        assert_eq!(
            body_type_for(&config),
            RigidBodyType::KinematicVelocityBased,
            "kinematic wins over the static-mass rule"
        );
    }

    #[test]
    fn test_locked_axes_mapping() {
        let config = RigidBodyConfig {
            freeze_position: AxisFlags {
                x: true,
                y: false,
                z: true,
            },
            freeze_rotation: AxisFlags {
                x: false,
                y: true,
                z: false,
            },
            ..RigidBodyConfig::default()
        };
        let axes = locked_axes_for(&config);
        assert!(axes.contains(LockedAxes::TRANSLATION_LOCKED_X));
        assert!(!axes.contains(LockedAxes::TRANSLATION_LOCKED_Y));
        assert!(axes.contains(LockedAxes::TRANSLATION_LOCKED_Z));
        assert!(axes.contains(LockedAxes::ROTATION_LOCKED_Y));
        assert!(!axes.contains(LockedAxes::ROTATION_LOCKED_X));
    }
}
