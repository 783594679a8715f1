//! Capability traits for the primitives the host process provides.
//!
//! The plugin never talks to the game engine directly. Entity spawning,
//! raycasting, repeating timers and durable storage all go through these
//! traits so the lifecycle core can be driven by in-memory fakes in tests.

use serde::{de::DeserializeOwned, Serialize};

use crate::scheduler::GestureTick;

/// Opaque reference to a spawned NPC entity in the host world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NpcHandle(pub u64);

/// Opaque reference to a repeating timer owned by the host scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Stable identifier of a connected player.
pub type PlayerId = u64;

/// Entity layers a raycast can be filtered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerMask {
    /// Player-shaped entities only (NPCs spawned from the player prefab
    /// live on this layer). Trigger volumes are always ignored.
    Player,
}

/// A gesture the host knows how to play, with its one-shot playback duration.
#[derive(Debug, Clone)]
pub struct GestureDef {
    pub name: String,
    pub duration_secs: f32,
}

/// Eye position and view direction of a player, for line-of-sight queries.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: [f32; 3],
    /// Normalized view direction.
    pub direction: [f32; 3],
}

impl Ray {
    /// Point at `distance` along the ray.
    pub fn point_at(&self, distance: f32) -> [f32; 3] {
        [
            self.origin[0] + self.direction[0] * distance,
            self.origin[1] + self.direction[1] * distance,
            self.origin[2] + self.direction[2] * distance,
        ]
    }

    /// Yaw (degrees) an entity at a point along this ray needs to face back
    /// toward the ray origin.
    pub fn facing_back_yaw(&self) -> f32 {
        let yaw = (-self.direction[0]).atan2(-self.direction[2]).to_degrees();
        if yaw < 0.0 {
            yaw + 360.0
        } else {
            yaw
        }
    }
}

/// Entity, player and permission primitives of the host world.
pub trait HostWorld {
    /// Creates and spawns an entity from `prefab` at `position`. Returns
    /// `None` if the host refused to spawn (bad prefab, world not ready).
    fn create_entity(&mut self, prefab: &str, position: [f32; 3]) -> Option<NpcHandle>;

    /// Destroys the entity. Must be safe to call on an already-destroyed
    /// handle.
    fn kill_entity(&mut self, handle: NpcHandle);

    fn is_destroyed(&self, handle: NpcHandle) -> bool;

    /// Overrides the entity's facing angle (degrees around the vertical axis).
    fn set_facing(&mut self, handle: NpcHandle, yaw: f32);

    /// Triggers a one-shot gesture on the entity. Returns `false` if the
    /// entity or gesture is unknown to the host.
    fn play_gesture(&mut self, handle: NpcHandle, gesture: &str) -> bool;

    /// Casts a ray and returns the first entity hit on `mask`, ignoring
    /// trigger volumes, within `max_distance`.
    fn raycast(
        &self,
        origin: [f32; 3],
        direction: [f32; 3],
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<NpcHandle>;

    /// Eye position and view direction of a connected player, or `None` if
    /// the player is not in the world.
    fn player_eyes(&self, player: PlayerId) -> Option<Ray>;

    /// The host's gesture catalog.
    fn gestures(&self) -> &[GestureDef];

    fn has_permission(&self, player: PlayerId, permission: &str) -> bool;
}

/// Repeating-timer scheduling. Callbacks are data, not closures: when a timer
/// fires, the host hands the `GestureTick` back to the plugin, which performs
/// a liveness check before re-triggering anything.
pub trait HostTimers {
    fn schedule_repeating(&mut self, interval_secs: f32, tick: GestureTick) -> TimerId;

    /// Cancels a timer. Must be idempotent; cancelling an already-fired or
    /// unknown timer is a no-op.
    fn cancel_timer(&mut self, timer: TimerId);
}

/// Durable key/value object storage provided by the host.
pub trait HostData {
    /// Reads and deserializes the object stored under `key`, or `None` if the
    /// key is absent or the stored payload does not deserialize.
    fn read_object<T: DeserializeOwned>(&self, key: &str) -> Option<T>;

    /// Serializes `value` and writes it under `key`, replacing any previous
    /// object.
    fn write_object<T: Serialize>(&mut self, key: &str, value: &T);
}

/// Everything the plugin needs from its host, as one bound.
pub trait Host: HostWorld + HostTimers + HostData {}

impl<H: HostWorld + HostTimers + HostData> Host for H {}
