//! Plugin configuration, persisted through the host's object storage.
//!
//! Every field carries a serde default so config objects written by older
//! plugin versions (missing newer fields) load without migration code.

use log::info;
use serde::{Deserialize, Serialize};

use crate::host::HostData;

/// Storage key for the config object.
pub const CONFIG_KEY: &str = "dancing_npcs.config";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Chat command name (the `dance` in `/dance add`).
    pub command: String,
    /// Maximum simultaneous NPCs per owner.
    pub max_npcs_per_owner: usize,
    /// Host prefab the NPCs are spawned from.
    pub npc_prefab: String,
    /// How far in front of the invoker's eyes a new NPC appears.
    pub spawn_distance: f32,
    /// Maximum range of the "NPC you are looking at" query.
    pub lookup_distance: f32,
    /// Loop interval used when the host catalog has no duration for a gesture.
    pub default_gesture_interval_secs: f32,
    /// Whether the gear collaborator empties the NPC's inventory before
    /// equipping a set.
    pub clear_inventory_before_equip: bool,
    /// Gestures offered by this plugin; also the list `1`-based indexes
    /// resolve against.
    pub gestures: Vec<String>,
    /// Gear sets offered by this plugin.
    pub gear_sets: Vec<String>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            command: "dance".to_string(),
            max_npcs_per_owner: 3,
            npc_prefab: "assets/prefabs/player/player.prefab".to_string(),
            spawn_distance: 2.0,
            lookup_distance: 5.0,
            default_gesture_interval_secs: 4.0,
            clear_inventory_before_equip: true,
            gestures: vec![
                "wave".to_string(),
                "victory".to_string(),
                "shrug".to_string(),
                "clap".to_string(),
            ],
            gear_sets: Vec::new(),
        }
    }
}

impl PluginConfig {
    /// Loads the config from host storage, seeding and persisting the
    /// defaults when no object exists yet.
    pub fn load<H: HostData>(host: &mut H) -> Self {
        match host.read_object::<PluginConfig>(CONFIG_KEY) {
            Some(config) => config,
            None => {
                info!("No config found under `{}`, writing defaults", CONFIG_KEY);
                let config = PluginConfig::default();
                host.write_object(CONFIG_KEY, &config);
                config
            }
        }
    }
}
