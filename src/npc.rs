//! Durable NPC state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::host::NpcHandle;

/// Storage key for the persisted NPC lists.
pub const DATA_KEY: &str = "dancing_npcs.data";

/// One spawned (or spawnable) NPC, as persisted per owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpcRecord {
    /// Controlling player; never 0 for a persisted record.
    pub owner_id: u64,
    /// Last known world position.
    pub position: [f32; 3],
    /// Last known facing angle in degrees.
    pub yaw: f32,
    /// Currently looping gesture, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gesture: Option<String>,
    /// Currently equipped gear set, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gear_set: Option<String>,
    /// Live entity handle; absent between restarts and for records whose
    /// rehydration spawn failed.
    #[serde(skip)]
    pub handle: Option<NpcHandle>,
}

impl NpcRecord {
    pub fn new(owner_id: u64, position: [f32; 3], yaw: f32) -> Self {
        Self {
            owner_id,
            position,
            yaw,
            gesture: None,
            gear_set: None,
            handle: None,
        }
    }
}

/// Persisted layout: owner id -> ordered list of that owner's NPCs.
pub type StoredNpcs = HashMap<u64, Vec<NpcRecord>>;
