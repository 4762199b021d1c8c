//! Entity definitions.

use super::config::ParanoidConfig;
use serde::{Deserialize, Serialize};

/// An entity type definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDef {
    /// Entity type name (unique within the catalog).
    pub name: String,
    /// Primary key field names; more than one for composite keys.
    pub primary_key: Vec<String>,
    /// Soft-delete configuration, when the type is paranoid.
    pub paranoid: Option<ParanoidConfig>,
}

impl EntityDef {
    /// Create a new entity definition with a single-column key.
    pub fn new(name: impl Into<String>, identity_field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: vec![identity_field.into()],
            paranoid: None,
        }
    }

    /// Append a key field, forming a composite primary key.
    pub fn with_key_field(mut self, field: impl Into<String>) -> Self {
        self.primary_key.push(field.into());
        self
    }

    /// Attach soft-delete configuration.
    pub fn with_paranoid(mut self, config: ParanoidConfig) -> Self {
        self.paranoid = Some(config);
        self
    }

    /// Check if this entity is soft-delete aware.
    pub fn is_paranoid(&self) -> bool {
        self.paranoid.is_some()
    }
}
