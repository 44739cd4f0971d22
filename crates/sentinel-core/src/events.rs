//! Events crossing the simulation boundary.
//!
//! `SceneEvent`s record entity-graph edits; they are queued and drained
//! exactly once per frame, in order, before the physics step. `TickEvent`s
//! are the outbound queue: the host drains them after a frame returns, so
//! render work never runs inside the tick call stack.

use hecs::Entity;

/// An edit to the entity graph, pending application to the physics layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    /// Entity spawned; a physics body is created if it is configured for one.
    Added(Entity),
    /// Entity despawned; its body and all detection state are released.
    Removed(Entity),
    /// Transform edited outside the physics step (user or script); the
    /// body must be resynchronized before the next step.
    Updated(Entity),
}

/// Outbound notifications produced by a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickEvent {
    /// Physics and detection for a tick are complete; transforms and
    /// target lists are safe to read. `dt` is the speed-scaled delta the
    /// tick advanced by.
    RenderReady { dt: f32 },
}
