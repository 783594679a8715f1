//! Boundary to the optional GearCore sibling plugin.
//!
//! GearCore equips predefined item bundles ("gear sets") onto entities. It may
//! be absent or unloaded at any time; the plugin treats that as a normal,
//! non-fatal condition and simply spawns NPCs without gear.

use crate::host::NpcHandle;

/// Narrow capability interface over the GearCore plugin.
pub trait GearProvider {
    /// Whether the collaborator plugin is currently loaded.
    fn is_loaded(&self) -> bool;

    /// Whether a gear set with this name is defined.
    fn gear_set_exists(&self, name: &str) -> bool;

    /// Equips the named gear set onto the entity. Returns `false` if the set
    /// is unknown, the entity is gone, or the collaborator is unloaded.
    fn equip_gear_set(&mut self, npc: NpcHandle, name: &str, clear_inventory_first: bool) -> bool;
}

/// Null object used when GearCore is not loaded: reports nothing as existing
/// and equips nothing.
#[derive(Debug, Default)]
pub struct NoGearCore;

impl GearProvider for NoGearCore {
    fn is_loaded(&self) -> bool {
        false
    }

    fn gear_set_exists(&self, _name: &str) -> bool {
        false
    }

    fn equip_gear_set(&mut self, _npc: NpcHandle, _name: &str, _clear: bool) -> bool {
        false
    }
}
