//! Paranoid Core - soft-delete lifecycle engine.
//!
//! This crate implements "paranoid" (soft-delete) semantics for persisted
//! records: logical deletion via a marker column, reversible recovery,
//! cascading destroy/recover across dependent relationships, and default
//! query scopes that hide deleted rows.
//!
//! The persistence layer itself is an external collaborator supplied
//! through the [`store::Store`] traits; an in-memory reference backend is
//! provided for tests and embedding.

pub mod catalog;
mod cascade;
mod counter;
pub mod error;
pub mod hooks;
pub mod lifecycle;
pub mod predicate;
pub mod query;
pub mod record;
pub mod scope;
pub mod store;
pub mod time;

pub use catalog::{
    BelongsToDef, CascadePolicy, Catalog, ColumnType, DependencyDef, DependentTarget, EntityDef,
    ParanoidConfig,
};
pub use error::Error;
pub use hooks::{HookEvent, HookRegistry};
pub use lifecycle::{Lifecycle, Outcome, RecoverOptions};
pub use record::ParanoidRecord;
pub use scope::{
    delete_all_hard, delete_all_soft, deleted_filter, visible_filter, ScopedQuery, Visibility,
};
pub use store::{MemoryStore, Row, Store, StoreTransaction};

/// Re-export predicate IR types.
pub use paranoid_expr as expr;
