//! Resolving "the NPC this player is looking at".
//!
//! A short-range raycast on the player layer finds a candidate entity; only
//! handles the registry tracks count as dancing NPCs, which is what separates
//! them from any other player-shaped entity in view.

use crate::host::{HostWorld, LayerMask, NpcHandle, PlayerId};
use crate::registry::Registry;

/// First tracked NPC along the player's view ray, within `max_distance`.
pub fn resolve_line_of_sight<H: HostWorld>(
    host: &H,
    registry: &Registry,
    player: PlayerId,
    max_distance: f32,
) -> Option<NpcHandle> {
    let ray = host.player_eyes(player)?;
    let hit = host.raycast(ray.origin, ray.direction, max_distance, LayerMask::Player)?;
    registry.is_tracked(hit).then_some(hit)
}

/// Like [`resolve_line_of_sight`], but only returns the handle when the
/// looked-at NPC belongs to `player`. An NPC owned by someone else resolves
/// to `None`, indistinguishable from no NPC at all.
pub fn find_owned_in_sight<H: HostWorld>(
    host: &H,
    registry: &Registry,
    player: PlayerId,
    max_distance: f32,
) -> Option<NpcHandle> {
    let handle = resolve_line_of_sight(host, registry, player, max_distance)?;
    (registry.owner_of(handle) == Some(player)).then_some(handle)
}
