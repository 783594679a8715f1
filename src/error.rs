//! Error taxonomy for owner-facing operations.
//!
//! Nothing here is fatal to the host process: every variant maps to a chat
//! message or a silently-degraded feature (missing gear).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DanceError {
    /// Referenced gesture does not resolve, by name or by index.
    #[error("unknown gesture `{0}`")]
    GestureNotFound(String),

    /// Referenced gear set is not defined by the gear collaborator.
    #[error("unknown gear set `{0}`")]
    GearSetNotFound(String),

    /// The invoker is not looking at one of their own NPCs.
    #[error("no owned NPC in sight")]
    NoTarget,

    /// Owner already has the configured maximum number of NPCs.
    #[error("NPC limit of {0} reached")]
    AtCapacity(usize),

    /// The host refused to create the entity.
    #[error("the host could not spawn the NPC")]
    SpawnFailed,

    /// Handle is not tracked by the registry.
    #[error("NPC is no longer tracked")]
    UnknownHandle,

    /// Gear collaborator is unloaded or rejected the equip; the NPC itself is
    /// unaffected.
    #[error("gear could not be applied")]
    GearUnavailable,
}
