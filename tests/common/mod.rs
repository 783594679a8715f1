//! In-memory host and gear collaborator used by the integration tests.
//!
//! `FakeHost` implements the full host boundary: entities live in a map,
//! repeating timers are recorded instead of fired (tests replay due ticks
//! through the plugin), storage is a JSON object store, and the raycast walks
//! the entity map geometrically.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use serde::{de::DeserializeOwned, Serialize};

use dancing_npcs::{
    GestureDef, GestureTick, HostData, HostTimers, HostWorld, LayerMask, NpcHandle, PlayerId,
    Ray, TimerId,
};
use dancing_npcs::gear::GearProvider;

/// Radius used by the fake raycast to decide whether a ray passes through an
/// entity.
const HIT_RADIUS: f32 = 0.5;

pub fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Writes a customized config into the host's storage so the plugin picks it
/// up on construction.
pub fn seed_config(host: &FakeHost, mutate: impl FnOnce(&mut dancing_npcs::PluginConfig)) {
    let mut config = dancing_npcs::PluginConfig::default();
    mutate(&mut config);
    host.state.borrow_mut().storage.insert(
        dancing_npcs::config::CONFIG_KEY.to_string(),
        serde_json::to_value(&config).unwrap(),
    );
}

#[derive(Debug)]
pub struct FakeEntity {
    pub prefab: String,
    pub position: [f32; 3],
    pub yaw: f32,
    pub destroyed: bool,
    pub gestures_played: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PendingTimer {
    pub interval_secs: f32,
    pub tick: GestureTick,
}

#[derive(Default)]
pub struct FakeState {
    next_handle: u64,
    next_timer: u64,
    pub entities: HashMap<NpcHandle, FakeEntity>,
    pub timers: HashMap<TimerId, PendingTimer>,
    pub storage: HashMap<String, serde_json::Value>,
    pub player_eyes: HashMap<PlayerId, Ray>,
    pub permissions: HashSet<(PlayerId, String)>,
    /// When set, only this many more spawns succeed; further `create_entity`
    /// calls return `None`.
    pub spawn_budget: Option<usize>,
}

impl FakeState {
    /// Gestures played so far on an entity, in order.
    pub fn played(&self, handle: NpcHandle) -> Vec<String> {
        self.entities
            .get(&handle)
            .map(|e| e.gestures_played.clone())
            .unwrap_or_default()
    }

    /// Every currently armed gesture tick, one per live timer.
    pub fn due_ticks(&self) -> Vec<GestureTick> {
        self.timers.values().map(|t| t.tick.clone()).collect()
    }

    pub fn live_entity_count(&self) -> usize {
        self.entities.values().filter(|e| !e.destroyed).count()
    }
}

/// Host fake sharing its state behind `Rc` so tests keep a window into it
/// after the plugin takes ownership of the host.
#[derive(Clone)]
pub struct FakeHost {
    pub catalog: Vec<GestureDef>,
    pub state: Rc<RefCell<FakeState>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            catalog: vec![
                GestureDef {
                    name: "wave".to_string(),
                    duration_secs: 2.0,
                },
                GestureDef {
                    name: "victory".to_string(),
                    duration_secs: 3.0,
                },
                GestureDef {
                    name: "shrug".to_string(),
                    duration_secs: 1.5,
                },
                GestureDef {
                    name: "clap".to_string(),
                    duration_secs: 2.5,
                },
            ],
            state: Rc::new(RefCell::new(FakeState::default())),
        }
    }

    /// A fresh host sharing nothing but the durable storage with this one,
    /// simulating a process restart.
    pub fn restarted(&self) -> Self {
        let mut state = FakeState::default();
        state.storage = self.state.borrow().storage.clone();
        state.player_eyes = self.state.borrow().player_eyes.clone();
        state.permissions = self.state.borrow().permissions.clone();
        Self {
            catalog: self.catalog.clone(),
            state: Rc::new(RefCell::new(state)),
        }
    }

    pub fn grant(&self, player: PlayerId, permission: &str) {
        self.state
            .borrow_mut()
            .permissions
            .insert((player, permission.to_string()));
    }

    /// Puts the player's eyes 2m away from `target`, looking straight at it.
    pub fn look_at(&self, player: PlayerId, target: NpcHandle) {
        let position = self.state.borrow().entities[&target].position;
        let origin = [position[0], position[1], position[2] - 2.0];
        self.look_from(player, origin, [0.0, 0.0, 1.0]);
    }

    pub fn look_from(&self, player: PlayerId, origin: [f32; 3], direction: [f32; 3]) {
        self.state
            .borrow_mut()
            .player_eyes
            .insert(player, Ray { origin, direction });
    }

    /// Points the player's eyes somewhere with nothing in front of them.
    pub fn look_at_nothing(&self, player: PlayerId) {
        self.look_from(player, [1000.0, 0.0, 1000.0], [0.0, -1.0, 0.0]);
    }
}

impl HostWorld for FakeHost {
    fn create_entity(&mut self, prefab: &str, position: [f32; 3]) -> Option<NpcHandle> {
        let mut state = self.state.borrow_mut();
        match state.spawn_budget {
            Some(0) => return None,
            Some(ref mut budget) => *budget -= 1,
            None => {}
        }
        state.next_handle += 1;
        let handle = NpcHandle(state.next_handle);
        state.entities.insert(
            handle,
            FakeEntity {
                prefab: prefab.to_string(),
                position,
                yaw: 0.0,
                destroyed: false,
                gestures_played: Vec::new(),
            },
        );
        Some(handle)
    }

    fn kill_entity(&mut self, handle: NpcHandle) {
        if let Some(entity) = self.state.borrow_mut().entities.get_mut(&handle) {
            entity.destroyed = true;
        }
    }

    fn is_destroyed(&self, handle: NpcHandle) -> bool {
        self.state
            .borrow()
            .entities
            .get(&handle)
            .map_or(true, |e| e.destroyed)
    }

    fn set_facing(&mut self, handle: NpcHandle, yaw: f32) {
        if let Some(entity) = self.state.borrow_mut().entities.get_mut(&handle) {
            entity.yaw = yaw;
        }
    }

    fn play_gesture(&mut self, handle: NpcHandle, gesture: &str) -> bool {
        let mut state = self.state.borrow_mut();
        match state.entities.get_mut(&handle) {
            Some(entity) if !entity.destroyed => {
                entity.gestures_played.push(gesture.to_string());
                true
            }
            _ => false,
        }
    }

    fn raycast(
        &self,
        origin: [f32; 3],
        direction: [f32; 3],
        max_distance: f32,
        _mask: LayerMask,
    ) -> Option<NpcHandle> {
        // All fake entities are player-layer; nearest hit along the ray wins.
        let state = self.state.borrow();
        let mut best: Option<(f32, NpcHandle)> = None;
        for (handle, entity) in &state.entities {
            if entity.destroyed {
                continue;
            }
            let to_entity = [
                entity.position[0] - origin[0],
                entity.position[1] - origin[1],
                entity.position[2] - origin[2],
            ];
            let along = to_entity[0] * direction[0]
                + to_entity[1] * direction[1]
                + to_entity[2] * direction[2];
            if along <= 0.0 || along > max_distance {
                continue;
            }
            let closest = [
                origin[0] + direction[0] * along,
                origin[1] + direction[1] * along,
                origin[2] + direction[2] * along,
            ];
            let off = [
                entity.position[0] - closest[0],
                entity.position[1] - closest[1],
                entity.position[2] - closest[2],
            ];
            let dist_sq = off[0] * off[0] + off[1] * off[1] + off[2] * off[2];
            if dist_sq <= HIT_RADIUS * HIT_RADIUS
                && best.map_or(true, |(t, _)| along < t)
            {
                best = Some((along, *handle));
            }
        }
        best.map(|(_, handle)| handle)
    }

    fn player_eyes(&self, player: PlayerId) -> Option<Ray> {
        self.state.borrow().player_eyes.get(&player).copied()
    }

    fn gestures(&self) -> &[GestureDef] {
        &self.catalog
    }

    fn has_permission(&self, player: PlayerId, permission: &str) -> bool {
        self.state
            .borrow()
            .permissions
            .contains(&(player, permission.to_string()))
    }
}

impl HostTimers for FakeHost {
    fn schedule_repeating(&mut self, interval_secs: f32, tick: GestureTick) -> TimerId {
        let mut state = self.state.borrow_mut();
        state.next_timer += 1;
        let id = TimerId(state.next_timer);
        state.timers.insert(
            id,
            PendingTimer {
                interval_secs,
                tick,
            },
        );
        id
    }

    fn cancel_timer(&mut self, timer: TimerId) {
        self.state.borrow_mut().timers.remove(&timer);
    }
}

impl HostData for FakeHost {
    fn read_object<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let state = self.state.borrow();
        let value = state.storage.get(key)?;
        serde_json::from_value(value.clone()).ok()
    }

    fn write_object<T: Serialize>(&mut self, key: &str, value: &T) {
        let json = serde_json::to_value(value).expect("serializable object");
        self.state.borrow_mut().storage.insert(key.to_string(), json);
    }
}

#[derive(Default)]
pub struct GearState {
    pub loaded: bool,
    pub sets: HashSet<String>,
    pub equips: Vec<(NpcHandle, String, bool)>,
}

/// Gear collaborator fake; starts unloaded, like a server without GearCore.
#[derive(Clone, Default)]
pub struct FakeGear {
    pub state: Rc<RefCell<GearState>>,
}

impl FakeGear {
    pub fn unloaded() -> Self {
        Self::default()
    }

    pub fn with_sets(sets: &[&str]) -> Self {
        let gear = Self::default();
        {
            let mut state = gear.state.borrow_mut();
            state.loaded = true;
            state.sets = sets.iter().map(|s| s.to_string()).collect();
        }
        gear
    }
}

impl GearProvider for FakeGear {
    fn is_loaded(&self) -> bool {
        self.state.borrow().loaded
    }

    fn gear_set_exists(&self, name: &str) -> bool {
        let state = self.state.borrow();
        state.loaded && state.sets.contains(name)
    }

    fn equip_gear_set(&mut self, npc: NpcHandle, name: &str, clear_first: bool) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.loaded || !state.sets.contains(name) {
            return false;
        }
        state.equips.push((npc, name.to_string(), clear_first));
        true
    }
}
