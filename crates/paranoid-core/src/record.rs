//! Record type for lifecycle operations.

use paranoid_expr::{FilterExpr, Value};

use crate::catalog::{EntityDef, ParanoidConfig};
use crate::error::Error;

/// An in-memory instance of a modeled entity type.
///
/// Records are owned by their persistence layer; the engine holds one
/// only for the duration of an operation. A record starts out either
/// new (never saved) or persisted (loaded from a row), and is frozen
/// once hard-destroyed.
#[derive(Debug, Clone, PartialEq)]
pub struct ParanoidRecord {
    entity: String,
    fields: Vec<(String, Value)>,
    new_record: bool,
    destroyed: bool,
    destroyed_by: Option<String>,
}

impl ParanoidRecord {
    /// Create a new, never-persisted record.
    pub fn new(entity: impl Into<String>, fields: Vec<(String, Value)>) -> Self {
        Self {
            entity: entity.into(),
            fields,
            new_record: true,
            destroyed: false,
            destroyed_by: None,
        }
    }

    /// Wrap a row loaded from the persistence layer.
    pub fn from_row(entity: impl Into<String>, fields: Vec<(String, Value)>) -> Self {
        Self {
            entity: entity.into(),
            fields,
            new_record: false,
            destroyed: false,
            destroyed_by: None,
        }
    }

    /// Mark which foreign key's association triggered this record's
    /// destruction, so its counter cache is not decremented twice.
    pub fn with_destroyed_by(mut self, foreign_key: impl Into<String>) -> Self {
        self.destroyed_by = Some(foreign_key.into());
        self
    }

    /// Entity type name.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// All fields as name/value pairs.
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    /// Get a field value by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Set a field value.
    ///
    /// Fails with [`Error::FrozenRecord`] once the record has been
    /// hard-destroyed.
    pub fn set_field(&mut self, name: &str, value: Value) -> Result<(), Error> {
        if self.destroyed {
            return Err(Error::FrozenRecord);
        }
        match self.fields.iter_mut().find(|(field, _)| field == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name.to_string(), value)),
        }
        Ok(())
    }

    /// The current value of the deletion column (null when absent).
    pub fn paranoid_value(&self, config: &ParanoidConfig) -> Value {
        self.field(&config.column).cloned().unwrap_or(Value::Null)
    }

    /// Whether this record was never saved.
    pub fn is_new(&self) -> bool {
        self.new_record
    }

    /// Whether this record has been hard-destroyed.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// True unless the record is new or has been hard-destroyed.
    pub fn is_persisted(&self) -> bool {
        !(self.new_record || self.destroyed)
    }

    /// The foreign key whose association triggered this destroy, if any.
    pub fn destroyed_by(&self) -> Option<&str> {
        self.destroyed_by.as_deref()
    }

    /// Freeze the record after permanent deletion.
    pub(crate) fn freeze(&mut self) {
        self.destroyed = true;
    }

    /// Equality predicates selecting this record's row by primary key.
    ///
    /// One predicate per key field, so composite keys work unchanged.
    pub fn pk_filters(&self, entity: &EntityDef) -> Result<Vec<FilterExpr>, Error> {
        entity
            .primary_key
            .iter()
            .map(|field| {
                let value = self.field(field).cloned().ok_or_else(|| Error::MissingField {
                    entity: self.entity.clone(),
                    field: field.clone(),
                })?;
                Ok(FilterExpr::Eq {
                    field: field.clone(),
                    value,
                })
            })
            .collect()
    }
}
