//! Registry of spawned NPCs: the single source of truth for which NPCs
//! exist, who owns them, and their last-known state.
//!
//! Two views of the same records: `live` maps a spawned entity handle to its
//! owner, `by_owner` holds the durable per-owner lists. `by_owner` is written
//! through to host storage after every mutation; `live` is rebuilt from
//! storage on startup by [`Registry::rehydrate`].

use std::collections::HashMap;

use log::{debug, info, warn};

use crate::config::PluginConfig;
use crate::error::DanceError;
use crate::gear::GearProvider;
use crate::gestures;
use crate::host::{Host, HostData, NpcHandle};
use crate::npc::{NpcRecord, StoredNpcs, DATA_KEY};
use crate::scheduler::GestureScheduler;

#[derive(Debug, Default)]
pub struct Registry {
    /// Live entity handle -> owner id. Cleared on shutdown.
    live: HashMap<NpcHandle, u64>,
    /// Owner id -> ordered list of records. Durable source of truth.
    by_owner: HashMap<u64, Vec<NpcRecord>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            live: HashMap::new(),
            by_owner: HashMap::new(),
        }
    }

    /// Spawns a new NPC entity for `owner_id` and registers its record.
    /// Validation (capacity) happens before any mutation; a failed host spawn
    /// leaves no record behind.
    pub fn create_npc<H: Host>(
        &mut self,
        host: &mut H,
        config: &PluginConfig,
        owner_id: u64,
        position: [f32; 3],
        yaw: f32,
    ) -> Result<NpcHandle, DanceError> {
        if self.count_by_owner(owner_id) >= config.max_npcs_per_owner {
            return Err(DanceError::AtCapacity(config.max_npcs_per_owner));
        }

        let handle = host
            .create_entity(&config.npc_prefab, position)
            .ok_or(DanceError::SpawnFailed)?;
        host.set_facing(handle, yaw);

        let mut record = NpcRecord::new(owner_id, position, yaw);
        record.handle = Some(handle);
        self.by_owner.entry(owner_id).or_default().push(record);
        self.live.insert(handle, owner_id);
        self.persist(host);

        debug!("Created NPC {:?} for owner {}", handle, owner_id);
        Ok(handle)
    }

    /// Applies a field-level change to the record for `handle` and persists.
    pub fn update_record<H: HostData>(
        &mut self,
        host: &mut H,
        handle: NpcHandle,
        mutate: impl FnOnce(&mut NpcRecord),
    ) -> Result<(), DanceError> {
        let record = self
            .record_mut(handle)
            .ok_or(DanceError::UnknownHandle)?;
        mutate(record);
        self.persist(host);
        Ok(())
    }

    /// Removes an NPC: cancels its gesture loop, forgets the live handle and
    /// destroys the host entity. With `purge` the durable record is deleted
    /// too; without it (process shutdown) the record stays for rehydration.
    pub fn remove_npc<H: Host>(
        &mut self,
        host: &mut H,
        scheduler: &mut GestureScheduler,
        handle: NpcHandle,
        purge: bool,
    ) -> Result<(), DanceError> {
        let owner_id = *self.live.get(&handle).ok_or(DanceError::UnknownHandle)?;

        scheduler.cancel_loop(host, handle);
        self.live.remove(&handle);

        if purge {
            if let Some(records) = self.by_owner.get_mut(&owner_id) {
                records.retain(|r| r.handle != Some(handle));
                if records.is_empty() {
                    self.by_owner.remove(&owner_id);
                }
            }
            self.persist(host);
        }

        if !host.is_destroyed(handle) {
            host.kill_entity(handle);
        }
        debug!(
            "Removed NPC {:?} of owner {} (purge: {})",
            handle, owner_id, purge
        );
        Ok(())
    }

    /// All live handles owned by `owner_id`.
    pub fn live_owned_by(&self, owner_id: u64) -> Vec<NpcHandle> {
        self.live
            .iter()
            .filter(|(_, owner)| **owner == owner_id)
            .map(|(handle, _)| *handle)
            .collect()
    }

    /// Number of NPCs tracked for `owner_id`, spawned or awaiting respawn.
    pub fn count_by_owner(&self, owner_id: u64) -> usize {
        self.by_owner.get(&owner_id).map_or(0, Vec::len)
    }

    pub fn is_tracked(&self, handle: NpcHandle) -> bool {
        self.live.contains_key(&handle)
    }

    pub fn owner_of(&self, handle: NpcHandle) -> Option<u64> {
        self.live.get(&handle).copied()
    }

    pub fn record(&self, handle: NpcHandle) -> Option<&NpcRecord> {
        let owner_id = self.live.get(&handle)?;
        self.by_owner
            .get(owner_id)?
            .iter()
            .find(|r| r.handle == Some(handle))
    }

    fn record_mut(&mut self, handle: NpcHandle) -> Option<&mut NpcRecord> {
        let owner_id = self.live.get(&handle)?;
        self.by_owner
            .get_mut(owner_id)?
            .iter_mut()
            .find(|r| r.handle == Some(handle))
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Every currently live handle, regardless of owner.
    pub fn live_handles(&self) -> Vec<NpcHandle> {
        self.live.keys().copied().collect()
    }

    /// Drops records of `owner_id` that have no live entity (rehydration
    /// leftovers whose spawn failed) and persists. Returns how many were
    /// dropped.
    pub fn purge_stale_records<H: HostData>(&mut self, host: &mut H, owner_id: u64) -> usize {
        let live = &self.live;
        let Some(records) = self.by_owner.get_mut(&owner_id) else {
            return 0;
        };
        let before = records.len();
        records.retain(|r| r.handle.is_some_and(|h| live.contains_key(&h)));
        let dropped = before - records.len();
        if records.is_empty() {
            self.by_owner.remove(&owner_id);
        }
        if dropped > 0 {
            self.persist(host);
        }
        dropped
    }

    /// Rebuilds the live world from storage after a restart: respawns every
    /// persisted record at its saved position, reapplies gear and restarts
    /// gesture loops. A record whose entity fails to spawn is skipped with a
    /// diagnostic; the rest still rehydrate.
    pub fn rehydrate<H: Host, G: GearProvider>(
        &mut self,
        host: &mut H,
        scheduler: &mut GestureScheduler,
        gear: &mut G,
        config: &PluginConfig,
    ) {
        let stored: StoredNpcs = host.read_object(DATA_KEY).unwrap_or_default();
        let mut spawned = 0usize;
        let mut skipped = 0usize;

        for (owner_id, records) in stored {
            let mut owned = Vec::with_capacity(records.len());
            for mut record in records {
                record.owner_id = owner_id;
                match host.create_entity(&config.npc_prefab, record.position) {
                    Some(handle) => {
                        host.set_facing(handle, record.yaw);
                        record.handle = Some(handle);
                        self.live.insert(handle, owner_id);

                        if let Some(gear_set) = &record.gear_set {
                            if !gear.equip_gear_set(
                                handle,
                                gear_set,
                                config.clear_inventory_before_equip,
                            ) {
                                warn!(
                                    "Gear set `{}` not reapplied to {:?} (collaborator absent?)",
                                    gear_set, handle
                                );
                            }
                        }
                        if let Some(gesture) = &record.gesture {
                            let interval = gestures::loop_interval(host, config, gesture);
                            scheduler.start_loop(host, handle, gesture, interval);
                        }
                        spawned += 1;
                    }
                    None => {
                        warn!(
                            "Could not respawn NPC for owner {} at {:?}, keeping record",
                            owner_id, record.position
                        );
                        record.handle = None;
                        skipped += 1;
                    }
                }
                owned.push(record);
            }
            if !owned.is_empty() {
                self.by_owner.insert(owner_id, owned);
            }
        }

        if spawned > 0 || skipped > 0 {
            info!("Rehydrated {} NPCs ({} skipped)", spawned, skipped);
        }
    }

    /// Writes the full per-owner layout through to host storage.
    fn persist<H: HostData>(&self, host: &mut H) {
        host.write_object(DATA_KEY, &self.by_owner);
    }
}
