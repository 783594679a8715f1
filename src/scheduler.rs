//! Gesture loop scheduling.
//!
//! The host's gesture trigger is a one-shot, so keeping an NPC dancing means
//! re-triggering it on a repeating timer. The scheduler guarantees at most one
//! active timer per handle: starting a new loop always cancels the old one
//! first.

use std::collections::HashMap;

use log::debug;

use crate::host::{HostTimers, HostWorld, NpcHandle, TimerId};

/// Task handed to the host timer system; when due, the host passes it back to
/// the plugin, which re-triggers the gesture after a liveness check. Plain
/// data, so a destroyed entity can never be reached through a stale callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GestureTick {
    pub npc: NpcHandle,
    pub gesture: String,
}

/// One repeating timer per looping NPC.
#[derive(Debug, Default)]
pub struct GestureScheduler {
    timers: HashMap<NpcHandle, TimerId>,
}

impl GestureScheduler {
    pub fn new() -> Self {
        Self {
            timers: HashMap::new(),
        }
    }

    /// Triggers `gesture` on the NPC immediately, then arms a repeating timer
    /// at `interval_secs`. Any previous loop for the same handle is cancelled
    /// before the new timer is armed.
    pub fn start_loop<H: HostWorld + HostTimers>(
        &mut self,
        host: &mut H,
        npc: NpcHandle,
        gesture: &str,
        interval_secs: f32,
    ) {
        self.cancel_loop(host, npc);

        host.play_gesture(npc, gesture);
        let timer = host.schedule_repeating(
            interval_secs,
            GestureTick {
                npc,
                gesture: gesture.to_string(),
            },
        );
        debug!(
            "Gesture loop `{}` on {:?} every {:.1}s",
            gesture, npc, interval_secs
        );
        self.timers.insert(npc, timer);
    }

    /// Cancels the loop for `npc` if one is running; no-op otherwise.
    pub fn cancel_loop<H: HostTimers>(&mut self, host: &mut H, npc: NpcHandle) {
        if let Some(timer) = self.timers.remove(&npc) {
            host.cancel_timer(timer);
        }
    }

    /// Cancels every loop. Used on plugin shutdown.
    pub fn cancel_all<H: HostTimers>(&mut self, host: &mut H) {
        for (_, timer) in self.timers.drain() {
            host.cancel_timer(timer);
        }
    }

    pub fn has_loop(&self, npc: NpcHandle) -> bool {
        self.timers.contains_key(&npc)
    }

    pub fn active_loops(&self) -> usize {
        self.timers.len()
    }

    /// Handles a due tick from the host. The entity may have been destroyed
    /// between ticks (cancellation can race the last scheduled fire), in
    /// which case the tick is skipped silently.
    pub fn on_tick<H: HostWorld>(&self, host: &mut H, tick: &GestureTick) {
        if !self.timers.contains_key(&tick.npc) || host.is_destroyed(tick.npc) {
            debug!("Skipping gesture tick for stale {:?}", tick.npc);
            return;
        }
        host.play_gesture(tick.npc, &tick.gesture);
    }
}
