//! The plugin object: owns the registry, scheduler and collaborator handles,
//! and exposes the lifecycle hooks the host calls into.

use log::info;

use crate::config::PluginConfig;
use crate::error::DanceError;
use crate::gear::GearProvider;
use crate::gestures;
use crate::host::{Host, NpcHandle, PlayerId};
use crate::lookup;
use crate::registry::Registry;
use crate::scheduler::{GestureScheduler, GestureTick};

/// How the gear part of an `add`/`setgear` request went. Gear is best-effort:
/// a missing collaborator never blocks the NPC itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GearOutcome {
    /// No gear requested.
    None,
    /// Gear set equipped.
    Applied(String),
    /// Collaborator unloaded or equip rejected; NPC spawned without gear.
    NotApplied(String),
}

/// Result of a successful `add`.
#[derive(Debug)]
pub struct SpawnedNpc {
    pub handle: NpcHandle,
    /// Gesture the NPC is looping, if any gesture is configured.
    pub gesture: Option<String>,
    pub gear: GearOutcome,
}

pub struct DancingNpcs<H: Host, G: GearProvider> {
    host: H,
    gear: G,
    config: PluginConfig,
    registry: Registry,
    scheduler: GestureScheduler,
}

impl<H: Host, G: GearProvider> DancingNpcs<H, G> {
    /// Builds the plugin and loads (or seeds) its config from host storage.
    pub fn new(mut host: H, gear: G) -> Self {
        let config = PluginConfig::load(&mut host);
        Self {
            host,
            gear,
            config,
            registry: Registry::new(),
            scheduler: GestureScheduler::new(),
        }
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn scheduler(&self) -> &GestureScheduler {
        &self.scheduler
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn gear(&self) -> &G {
        &self.gear
    }

    /// Host hook: server finished loading. Respawns every persisted NPC.
    pub fn on_server_initialized(&mut self) {
        self.registry.rehydrate(
            &mut self.host,
            &mut self.scheduler,
            &mut self.gear,
            &self.config,
        );
    }

    /// Host hook: plugin is being unloaded or the server is shutting down.
    /// Live entities are destroyed but durable records are kept, so the next
    /// start rehydrates them.
    pub fn on_shutdown(&mut self) {
        let handles = self.registry.live_handles();
        for handle in handles {
            let _ = self
                .registry
                .remove_npc(&mut self.host, &mut self.scheduler, handle, false);
        }
        info!("Dancing NPCs unloaded, records kept for next start");
    }

    /// Host hook: an entity died. If it was one of ours, the record is gone
    /// for good (host-initiated kills are terminal).
    pub fn on_entity_killed(&mut self, handle: NpcHandle) {
        if self.registry.is_tracked(handle) {
            let _ = self
                .registry
                .remove_npc(&mut self.host, &mut self.scheduler, handle, true);
        }
    }

    /// Host hook: a repeating gesture timer came due.
    pub fn on_gesture_tick(&mut self, tick: &GestureTick) {
        self.scheduler.on_tick(&mut self.host, tick);
    }

    /// Spawns a new NPC in front of `player`, looping `gesture_input` (or a
    /// random configured gesture) and wearing `gear_input` if given. All
    /// validation happens before the entity is created.
    pub fn add_npc(
        &mut self,
        player: PlayerId,
        gesture_input: Option<&str>,
        gear_input: Option<&str>,
    ) -> Result<SpawnedNpc, DanceError> {
        let ray = self.host.player_eyes(player).ok_or(DanceError::NoTarget)?;

        let gesture = match gesture_input {
            Some(input) => Some(
                gestures::resolve(&self.host, &self.config, input)
                    .ok_or_else(|| DanceError::GestureNotFound(input.to_string()))?,
            ),
            None => gestures::random_gesture(&self.config),
        };

        // A named gear set the loaded collaborator does not know is an input
        // error and aborts before anything is spawned. An unloaded
        // collaborator degrades to "no gear" instead.
        if let Some(name) = gear_input {
            if self.gear.is_loaded() && !self.gear.gear_set_exists(name) {
                return Err(DanceError::GearSetNotFound(name.to_string()));
            }
        }

        let position = ray.point_at(self.config.spawn_distance);
        let yaw = ray.facing_back_yaw();
        let handle =
            self.registry
                .create_npc(&mut self.host, &self.config, player, position, yaw)?;

        if let Some(gesture) = &gesture {
            self.start_gesture(handle, gesture)?;
        }

        let gear = match gear_input {
            None => GearOutcome::None,
            Some(name) => self.equip(handle, name),
        };

        Ok(SpawnedNpc {
            handle,
            gesture,
            gear,
        })
    }

    /// Switches the gesture of the owned NPC `player` is looking at.
    /// Returns the resolved catalog gesture name.
    pub fn set_dance(&mut self, player: PlayerId, input: &str) -> Result<String, DanceError> {
        let handle = self.find_owned_in_sight(player).ok_or(DanceError::NoTarget)?;
        let gesture = gestures::resolve(&self.host, &self.config, input)
            .ok_or_else(|| DanceError::GestureNotFound(input.to_string()))?;
        self.start_gesture(handle, &gesture)?;
        Ok(gesture)
    }

    /// Swaps the gear set of the owned NPC `player` is looking at.
    pub fn set_gear(&mut self, player: PlayerId, name: &str) -> Result<(), DanceError> {
        let handle = self.find_owned_in_sight(player).ok_or(DanceError::NoTarget)?;
        if self.gear.is_loaded() && !self.gear.gear_set_exists(name) {
            return Err(DanceError::GearSetNotFound(name.to_string()));
        }
        match self.equip(handle, name) {
            GearOutcome::Applied(_) => Ok(()),
            _ => Err(DanceError::GearUnavailable),
        }
    }

    /// Removes the owned NPC `player` is looking at, purging its record.
    pub fn remove_in_sight(&mut self, player: PlayerId) -> Result<(), DanceError> {
        let handle = self.find_owned_in_sight(player).ok_or(DanceError::NoTarget)?;
        self.registry
            .remove_npc(&mut self.host, &mut self.scheduler, handle, true)
    }

    /// Removes every NPC `player` owns, including records whose respawn
    /// failed and that have no live entity. Returns how many were removed.
    pub fn clear_owned(&mut self, player: PlayerId) -> usize {
        let handles = self.registry.live_owned_by(player);
        let mut removed = 0;
        for handle in handles {
            if self
                .registry
                .remove_npc(&mut self.host, &mut self.scheduler, handle, true)
                .is_ok()
            {
                removed += 1;
            }
        }
        removed + self.registry.purge_stale_records(&mut self.host, player)
    }

    /// The owned NPC `player` is currently looking at, if any.
    pub fn find_owned_in_sight(&self, player: PlayerId) -> Option<NpcHandle> {
        lookup::find_owned_in_sight(
            &self.host,
            &self.registry,
            player,
            self.config.lookup_distance,
        )
    }

    /// Records the gesture and (re)starts its loop, interval taken from the
    /// catalog duration.
    fn start_gesture(&mut self, handle: NpcHandle, gesture: &str) -> Result<(), DanceError> {
        self.registry.update_record(&mut self.host, handle, |r| {
            r.gesture = Some(gesture.to_string());
        })?;
        let interval = gestures::loop_interval(&self.host, &self.config, gesture);
        self.scheduler
            .start_loop(&mut self.host, handle, gesture, interval);
        Ok(())
    }

    /// Best-effort equip; the record only remembers gear that actually went on.
    fn equip(&mut self, handle: NpcHandle, name: &str) -> GearOutcome {
        if self
            .gear
            .equip_gear_set(handle, name, self.config.clear_inventory_before_equip)
        {
            let _ = self.registry.update_record(&mut self.host, handle, |r| {
                r.gear_set = Some(name.to_string());
            });
            GearOutcome::Applied(name.to_string())
        } else {
            GearOutcome::NotApplied(name.to_string())
        }
    }
}
