//! Dancing NPCs server plugin.
//!
//! Lets players spawn NPCs that loop dance gestures, optionally dressed in
//! gear sets equipped by the optional GearCore collaborator plugin. NPCs are
//! owner-scoped, capped per owner and persisted across server restarts
//! through the host's durable object storage.
//!
//! The crate is host-agnostic: all engine primitives (entities, raycasts,
//! repeating timers, storage) come in through the traits in [`host`], so the
//! whole lifecycle can run against in-memory fakes.

pub mod commands;
pub mod config;
pub mod error;
pub mod gear;
pub mod gestures;
pub mod host;
pub mod lookup;
pub mod npc;
pub mod plugin;
pub mod registry;
pub mod scheduler;

pub use config::PluginConfig;
pub use error::DanceError;
pub use gear::{GearProvider, NoGearCore};
pub use host::{GestureDef, Host, HostData, HostTimers, HostWorld, LayerMask, NpcHandle, PlayerId, Ray, TimerId};
pub use npc::NpcRecord;
pub use plugin::{DancingNpcs, GearOutcome, SpawnedNpc};
pub use registry::Registry;
pub use scheduler::{GestureScheduler, GestureTick};
