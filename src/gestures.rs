//! Gesture resolution against the host catalog and the configured list.

use rand::seq::SliceRandom;

use crate::config::PluginConfig;
use crate::host::HostWorld;

/// Resolves player input to a catalog gesture name.
///
/// Input is either a gesture name, matched case-insensitively against the
/// host catalog, or a 1-based index into the configured gesture list. The
/// returned name is the catalog's spelling, not the player's.
pub fn resolve<H: HostWorld>(host: &H, config: &PluginConfig, input: &str) -> Option<String> {
    if let Ok(index) = input.parse::<usize>() {
        let name = config.gestures.get(index.checked_sub(1)?)?;
        return catalog_lookup(host, name);
    }
    catalog_lookup(host, input)
}

/// Case-insensitive lookup in the host gesture catalog.
fn catalog_lookup<H: HostWorld>(host: &H, name: &str) -> Option<String> {
    host.gestures()
        .iter()
        .find(|g| g.name.eq_ignore_ascii_case(name))
        .map(|g| g.name.clone())
}

/// Playback duration of a catalog gesture, used as the loop interval.
/// Falls back to the configured default if the catalog has no entry.
pub fn loop_interval<H: HostWorld>(host: &H, config: &PluginConfig, gesture: &str) -> f32 {
    host.gestures()
        .iter()
        .find(|g| g.name.eq_ignore_ascii_case(gesture))
        .map(|g| g.duration_secs)
        .unwrap_or(config.default_gesture_interval_secs)
}

/// Uniform-random pick from the configured gesture list; `None` when empty.
pub fn random_gesture(config: &PluginConfig) -> Option<String> {
    config.gestures.choose(&mut rand::thread_rng()).cloned()
}

/// Uniform-random pick from the configured gear-set list; `None` when empty.
pub fn random_gear_set(config: &PluginConfig) -> Option<String> {
    config.gear_sets.choose(&mut rand::thread_rng()).cloned()
}
