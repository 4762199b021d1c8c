//! Catalog registry for entity and relationship metadata.

use std::collections::HashMap;

use super::{BelongsToDef, ColumnType, DependencyDef, DependentTarget, EntityDef, ParanoidConfig};
use crate::error::Error;
use crate::record::ParanoidRecord;

/// The registry of entity definitions and their relationships.
///
/// Populated once at setup via the `register_*` methods and treated as
/// immutable afterwards; lookups take `&self` and are safe for concurrent
/// readers without locking.
#[derive(Debug, Default)]
pub struct Catalog {
    entities: HashMap<String, EntityDef>,
    dependencies: HashMap<String, Vec<DependencyDef>>,
    belongs_to: HashMap<String, Vec<BelongsToDef>>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity definition.
    ///
    /// Rejects empty primary keys and configurations whose options do not
    /// match the column type, so misconfiguration surfaces at setup time
    /// rather than silently defaulting.
    pub fn register_entity(&mut self, entity: EntityDef) -> Result<(), Error> {
        if entity.primary_key.is_empty() {
            return Err(Error::InvalidConfig {
                entity: entity.name.clone(),
                reason: "primary key must have at least one field".into(),
            });
        }

        if let Some(config) = &entity.paranoid {
            if config.column.is_empty() {
                return Err(Error::InvalidConfig {
                    entity: entity.name.clone(),
                    reason: "paranoid column name must not be empty".into(),
                });
            }
            if config.deleted_value.is_some() && config.column_type != ColumnType::String {
                return Err(Error::InvalidConfig {
                    entity: entity.name.clone(),
                    reason: "deleted_value is only valid for string columns".into(),
                });
            }
            if !config.allow_nulls && config.column_type != ColumnType::Boolean {
                return Err(Error::InvalidConfig {
                    entity: entity.name.clone(),
                    reason: "allow_nulls = false is only valid for boolean columns".into(),
                });
            }
        }

        self.entities.insert(entity.name.clone(), entity);
        Ok(())
    }

    /// Register a dependent relationship.
    ///
    /// The owner (and a fixed target) must already be registered.
    pub fn register_dependency(&mut self, dep: DependencyDef) -> Result<(), Error> {
        if !self.entities.contains_key(&dep.owner) {
            return Err(Error::UnknownEntity(dep.owner));
        }
        if let DependentTarget::Fixed(target) = &dep.target {
            if !self.entities.contains_key(target) {
                return Err(Error::UnknownEntity(target.clone()));
            }
        }
        self.dependencies
            .entry(dep.owner.clone())
            .or_default()
            .push(dep);
        Ok(())
    }

    /// Register a belongs-to association.
    pub fn register_belongs_to(&mut self, assoc: BelongsToDef) -> Result<(), Error> {
        if !self.entities.contains_key(&assoc.owner) {
            return Err(Error::UnknownEntity(assoc.owner));
        }
        if !self.entities.contains_key(&assoc.target) {
            return Err(Error::UnknownEntity(assoc.target));
        }
        self.belongs_to
            .entry(assoc.owner.clone())
            .or_default()
            .push(assoc);
        Ok(())
    }

    /// Get an entity definition by name.
    pub fn get_entity(&self, name: &str) -> Option<&EntityDef> {
        self.entities.get(name)
    }

    /// Get an entity definition, failing for unregistered names.
    pub fn entity(&self, name: &str) -> Result<&EntityDef, Error> {
        self.entities
            .get(name)
            .ok_or_else(|| Error::UnknownEntity(name.to_string()))
    }

    /// Resolve the paranoid configuration for an entity type.
    ///
    /// A registered entity without a configuration is a fatal
    /// [`Error::MissingConfig`], never a silent default.
    pub fn config_for(&self, name: &str) -> Result<&ParanoidConfig, Error> {
        self.entity(name)?
            .paranoid
            .as_ref()
            .ok_or_else(|| Error::MissingConfig(name.to_string()))
    }

    /// Check whether an entity type is soft-delete aware.
    pub fn is_paranoid(&self, name: &str) -> bool {
        self.entities
            .get(name)
            .is_some_and(|e| e.paranoid.is_some())
    }

    /// Dependent relationships declared on an entity type.
    pub fn dependents_of(&self, name: &str) -> &[DependencyDef] {
        self.dependencies
            .get(name)
            .map(|deps| deps.as_slice())
            .unwrap_or(&[])
    }

    /// Belongs-to associations declared on an entity type.
    pub fn belongs_to_of(&self, name: &str) -> &[BelongsToDef] {
        self.belongs_to
            .get(name)
            .map(|assocs| assocs.as_slice())
            .unwrap_or(&[])
    }

    /// Resolve the effective target type of a dependency.
    ///
    /// Polymorphic targets read the discriminator field on the source
    /// record and must name a registered entity type.
    pub fn resolve_target(
        &self,
        dep: &DependencyDef,
        record: &ParanoidRecord,
    ) -> Result<String, Error> {
        match &dep.target {
            DependentTarget::Fixed(target) => {
                self.entity(target)?;
                Ok(target.clone())
            }
            DependentTarget::Polymorphic {
                discriminator_field,
            } => {
                let value = record.field(discriminator_field).ok_or_else(|| {
                    Error::MissingField {
                        entity: record.entity().to_string(),
                        field: discriminator_field.clone(),
                    }
                })?;
                let target = value.as_str().ok_or_else(|| Error::UnknownDiscriminator {
                    entity: record.entity().to_string(),
                    field: discriminator_field.clone(),
                    target: format!("{value:?}"),
                })?;
                if !self.entities.contains_key(target) {
                    return Err(Error::UnknownDiscriminator {
                        entity: record.entity().to_string(),
                        field: discriminator_field.clone(),
                        target: target.to_string(),
                    });
                }
                Ok(target.to_string())
            }
        }
    }
}
