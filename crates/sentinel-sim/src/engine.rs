//! Simulation context — the core of the runtime.
//!
//! `Simulation` owns the hecs entity world, the rigid-body registry, and
//! the sensor detection engine. It is an explicit context object: several
//! independent simulations can coexist, and tests construct one directly.
//! Scene edits and configuration commands are queued and drained exactly
//! once per frame, in order, before the physics step.

use std::collections::VecDeque;

use glam::Vec3;
use hecs::{Entity, World};

use sentinel_core::commands::SimCommand;
use sentinel_core::components::{
    ColliderShape, Detectable, Kinematics, Platform, RigidBodyConfig, SensorConfig,
};
use sentinel_core::constants::{DEFAULT_FRAME_RATE, DEFAULT_GRAVITY, DEFAULT_TIME_SCALE};
use sentinel_core::events::{SceneEvent, TickEvent};
use sentinel_core::state::SimulationSnapshot;
use sentinel_core::types::{SimTime, Transform};

use crate::rigid_body::{RegistryError, RigidBodyRegistry};
use crate::systems::detection::{SensorDetectionEngine, Target};
use crate::systems::snapshot;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    /// Periodic driver rate (Hz).
    pub frame_rate: u32,
    /// Initial speed multiplier (1.0 = real time).
    pub time_scale: f32,
    /// World gravity vector (m/s²).
    pub gravity: Vec3,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
            time_scale: DEFAULT_TIME_SCALE,
            gravity: DEFAULT_GRAVITY,
        }
    }
}

/// Authored description of a platform to spawn.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformSpec {
    pub transform: Transform,
    pub rigid_body: Option<RigidBodyConfig>,
    pub collider: Option<ColliderShape>,
    pub sensor: Option<SensorConfig>,
}

/// The simulation context. Owns the entity world and all runtime state.
pub struct Simulation {
    world: World,
    registry: RigidBodyRegistry,
    sensors: SensorDetectionEngine,
    time: SimTime,
    gravity: Vec3,
    commands: VecDeque<SimCommand>,
    scene_events: VecDeque<SceneEvent>,
    tick_events: Vec<TickEvent>,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            registry: RigidBodyRegistry::new(),
            sensors: SensorDetectionEngine::new(),
            time: SimTime::default(),
            gravity: config.gravity,
            commands: VecDeque::new(),
            scene_events: VecDeque::new(),
            tick_events: Vec::new(),
        }
    }

    // --- Entity graph surface ---

    /// Spawn a platform. Its physics body is created at the start of the
    /// next frame; a spec without rigid-body configuration yields a
    /// visual-only entity that still participates in detection.
    pub fn spawn_platform(&mut self, spec: PlatformSpec) -> Entity {
        let kinematics = spec
            .rigid_body
            .map(|body| Kinematics {
                linear_velocity: body.linear_velocity,
                angular_velocity: body.angular_velocity,
            })
            .unwrap_or_default();
        let entity = self
            .world
            .spawn((Platform, Detectable, spec.transform, kinematics));
        if let Some(body) = spec.rigid_body {
            let _ = self.world.insert_one(entity, body);
        }
        if let Some(collider) = spec.collider {
            let _ = self.world.insert_one(entity, collider);
        }
        if let Some(sensor) = spec.sensor {
            let _ = self.world.insert_one(entity, sensor);
        }
        self.scene_events.push_back(SceneEvent::Added(entity));
        entity
    }

    /// Spawn an abstract marker entity: positioned, but neither physical
    /// nor detectable.
    pub fn spawn_marker(&mut self, transform: Transform) -> Entity {
        self.world.spawn((transform,))
    }

    /// Remove an entity. Its body and detection state are released at the
    /// start of the next frame, in queue order.
    pub fn despawn(&mut self, entity: Entity) {
        self.scene_events.push_back(SceneEvent::Removed(entity));
    }

    /// Edit an entity's transform outside the physics step (user or
    /// script authoring). The physics body is resynchronized before the
    /// next step so the engine stays authoritative.
    pub fn update_transform(&mut self, entity: Entity, transform: Transform) {
        match self.world.get::<&mut Transform>(entity) {
            Ok(mut current) => {
                *current = transform;
                self.scene_events.push_back(SceneEvent::Updated(entity));
            }
            Err(_) => log::warn!("update_transform: unknown entity {entity:?}"),
        }
    }

    // --- Configuration surface ---

    /// Queue a configuration command for the next frame boundary.
    pub fn queue_command(&mut self, command: SimCommand) {
        self.commands.push_back(command);
    }

    // --- Frame ---

    /// Advance the simulation by one frame of `dt` (already speed-scaled)
    /// seconds: apply commands, drain scene edits into the physics layer,
    /// step physics, scan sensors, and queue the render-ready event.
    pub fn step_frame(&mut self, dt: f32) {
        self.process_commands();
        self.drain_scene_events();
        self.registry.step(&mut self.world, dt, self.gravity);
        self.sensors.run(&self.world);
        self.time.advance(dt);
        self.tick_events.push(TickEvent::RenderReady { dt });
    }

    /// Take the pending outbound events. The host calls this after a
    /// frame returns — never from inside the tick call stack — which is
    /// what makes the render hand-off asynchronous while preserving the
    /// step-before-notify ordering.
    pub fn drain_events(&mut self) -> Vec<TickEvent> {
        std::mem::take(&mut self.tick_events)
    }

    // --- Read access ---

    /// Read-only access to the entity world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Whether an entity currently has a physics body.
    pub fn has_body(&self, entity: Entity) -> bool {
        self.registry.contains(entity)
    }

    /// Current target list of a sensor-equipped entity.
    pub fn targets(&self, owner: Entity) -> &[Target] {
        self.sensors.targets(owner)
    }

    /// Whether `entity` is currently detected by `owner`'s sensor.
    pub fn is_detected(&self, owner: Entity, entity: Entity) -> bool {
        self.sensors.is_detected(owner, entity)
    }

    /// Build the complete readable state for rendering/recording
    /// collaborators.
    pub fn snapshot(&self) -> SimulationSnapshot {
        snapshot::build_snapshot(&self.world, &self.time, &self.sensors)
    }

    // --- Internals ---

    fn process_commands(&mut self) {
        while let Some(command) = self.commands.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: SimCommand) {
        match command {
            SimCommand::SetGravity { gravity } => {
                self.gravity = gravity;
            }
            SimCommand::SetGravityEnabled { entity, enabled } => {
                match self.world.get::<&mut RigidBodyConfig>(entity) {
                    Ok(mut config) => config.gravity_enabled = enabled,
                    Err(_) => log::warn!("SetGravityEnabled: {entity:?} has no rigid body config"),
                }
            }
            SimCommand::SetKinematic { entity, kinematic } => {
                match self.world.get::<&mut RigidBodyConfig>(entity) {
                    Ok(mut config) => config.kinematic = kinematic,
                    Err(_) => log::warn!("SetKinematic: {entity:?} has no rigid body config"),
                }
            }
            SimCommand::SetFreezeAxes {
                entity,
                position,
                rotation,
            } => match self.world.get::<&mut RigidBodyConfig>(entity) {
                Ok(mut config) => {
                    config.freeze_position = position;
                    config.freeze_rotation = rotation;
                }
                Err(_) => log::warn!("SetFreezeAxes: {entity:?} has no rigid body config"),
            },
            SimCommand::SetSensorRange { entity, range } => {
                match self.world.get::<&mut SensorConfig>(entity) {
                    Ok(mut config) => config.range = range,
                    Err(_) => log::warn!("SetSensorRange: {entity:?} has no sensor"),
                }
            }
            SimCommand::SetSensorEwRange { entity, ew_range } => {
                match self.world.get::<&mut SensorConfig>(entity) {
                    Ok(mut config) => config.ew_range = ew_range,
                    Err(_) => log::warn!("SetSensorEwRange: {entity:?} has no sensor"),
                }
            }
            SimCommand::SetSensorFieldOfView {
                entity,
                half_angle_deg,
            } => match self.world.get::<&mut SensorConfig>(entity) {
                Ok(mut config) => config.max_detection_angle_deg = half_angle_deg,
                Err(_) => log::warn!("SetSensorFieldOfView: {entity:?} has no sensor"),
            },
        }
    }

    /// Apply queued scene edits to the physics layer, in order. One bad
    /// entity is logged and skipped; it never halts the frame.
    fn drain_scene_events(&mut self) {
        while let Some(event) = self.scene_events.pop_front() {
            match event {
                SceneEvent::Added(entity) => match self.registry.add(&self.world, entity) {
                    Ok(()) => {}
                    Err(
                        err @ (RegistryError::MissingRigidBody(_)
                        | RegistryError::MissingCollider(_)),
                    ) => {
                        // Visual-only entity; it simply has no body.
                        log::debug!("skipping physics body: {err}");
                    }
                    Err(err) => log::warn!("skipping physics body: {err}"),
                },
                SceneEvent::Removed(entity) => {
                    if self.registry.contains(entity) {
                        self.registry.remove(entity);
                    }
                    self.sensors.forget(entity);
                    let _ = self.world.despawn(entity);
                }
                SceneEvent::Updated(entity) => {
                    if self.registry.contains(entity) {
                        self.registry.sync_from_authoring(&mut self.world, entity);
                    }
                }
            }
        }
    }
}
