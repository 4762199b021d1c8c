//! Core error types.

use crate::hooks::HookEvent;
use thiserror::Error;

/// Errors raised by the soft-delete engine.
///
/// Expected domain outcomes (hook vetoes, already-in-target-state) do not
/// surface as errors from the public lifecycle API; see
/// [`crate::lifecycle::Outcome`]. `HookVeto` exists so a veto can abort
/// the enclosing store transaction before being translated back into a
/// status value.
#[derive(Debug, Error)]
pub enum Error {
    /// Entity type has no paranoid column configuration.
    #[error("no paranoid configuration for entity type `{0}`")]
    MissingConfig(String),

    /// Entity type is not registered in the catalog.
    #[error("unknown entity type `{0}`")]
    UnknownEntity(String),

    /// Rejected at registration time.
    #[error("invalid configuration for `{entity}`: {reason}")]
    InvalidConfig {
        /// Entity type name.
        entity: String,
        /// Why registration was rejected.
        reason: String,
    },

    /// A record lacks a field an operation needs (key or discriminator).
    #[error("missing field `{field}` on `{entity}` record")]
    MissingField {
        /// Entity type name.
        entity: String,
        /// Field name.
        field: String,
    },

    /// Mutation attempted on a record after permanent deletion.
    #[error("record is frozen after permanent deletion")]
    FrozenRecord,

    /// Polymorphic discriminator named a type outside the registered set.
    #[error("discriminator `{field}` on `{entity}` names unregistered type `{target}`")]
    UnknownDiscriminator {
        /// Source entity type name.
        entity: String,
        /// Discriminator field name.
        field: String,
        /// The unresolvable target name.
        target: String,
    },

    /// A lifecycle hook rejected the operation.
    #[error("{event} hook rejected the operation: {reason}")]
    HookVeto {
        /// The lifecycle event whose hook vetoed.
        event: HookEvent,
        /// Reason reported by the hook.
        reason: String,
    },

    /// Persistence layer failure.
    #[error("store error: {0}")]
    Store(String),
}
