//! Entity catalog for the soft-delete engine.
//!
//! The catalog stores per-type deletion-column configuration and the
//! relationship metadata the cascade engine and counter-cache updater
//! consume. It is populated once at setup and read-only afterwards.

#[allow(clippy::module_inception)]
mod catalog;
mod config;
mod entity;
mod relation;

pub use catalog::Catalog;
pub use config::{ColumnType, ParanoidConfig};
pub use entity::EntityDef;
pub use relation::{BelongsToDef, CascadePolicy, DependencyDef, DependentTarget};
