//! Per-entity-type deletion column configuration.

use paranoid_expr::Value;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Sentinel written by string-typed columns when none is configured.
const DEFAULT_STRING_SENTINEL: &str = "deleted";

/// Default bound for time-windowed dependent recovery.
const DEFAULT_RECOVERY_WINDOW: Duration = Duration::from_secs(2 * 60);

/// Type of the deletion-state column, determining predicate semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    /// Timestamp column: a set timestamp marks deleted, null marks active.
    Time,
    /// Boolean column.
    Boolean,
    /// String column with an optional sentinel value.
    String,
}

/// Deletion-column configuration for one entity type.
///
/// Exactly one column and type per entity type; the deletion predicate
/// and the default query scope both derive from this single source of
/// truth, so they cannot disagree on what counts as "deleted".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParanoidConfig {
    /// Name of the field carrying deletion state.
    pub column: String,
    /// Column type.
    pub column_type: ColumnType,
    /// Sentinel meaning "deleted", for string columns only.
    pub deleted_value: Option<String>,
    /// Whether a boolean column may hold null.
    pub allow_nulls: bool,
    /// Whether recovery cascades to dependents by default.
    pub recursive: bool,
    /// Default bound for time-windowed dependent recovery.
    pub recovery_window: Duration,
}

impl ParanoidConfig {
    /// Create a time-typed configuration (the common case).
    pub fn time(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            column_type: ColumnType::Time,
            deleted_value: None,
            allow_nulls: true,
            recursive: true,
            recovery_window: DEFAULT_RECOVERY_WINDOW,
        }
    }

    /// Create a boolean-typed configuration (nulls allowed by default).
    pub fn boolean(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            column_type: ColumnType::Boolean,
            deleted_value: None,
            allow_nulls: true,
            recursive: true,
            recovery_window: DEFAULT_RECOVERY_WINDOW,
        }
    }

    /// Create a string-typed configuration with the default sentinel.
    pub fn string(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            column_type: ColumnType::String,
            deleted_value: Some(DEFAULT_STRING_SENTINEL.to_string()),
            allow_nulls: true,
            recursive: true,
            recovery_window: DEFAULT_RECOVERY_WINDOW,
        }
    }

    /// Override the string sentinel.
    pub fn with_deleted_value(mut self, value: impl Into<String>) -> Self {
        self.deleted_value = Some(value.into());
        self
    }

    /// Clear the string sentinel, so any non-null value means deleted.
    pub fn without_deleted_value(mut self) -> Self {
        self.deleted_value = None;
        self
    }

    /// Disallow nulls in a boolean column.
    pub fn without_nulls(mut self) -> Self {
        self.allow_nulls = false;
        self
    }

    /// Set whether recovery cascades to dependents by default.
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Set the default recovery window.
    pub fn with_recovery_window(mut self, window: Duration) -> Self {
        self.recovery_window = window;
        self
    }

    /// String column with a configured sentinel.
    pub fn string_with_sentinel(&self) -> bool {
        self.column_type == ColumnType::String && self.deleted_value.is_some()
    }

    /// Boolean column that cannot hold null.
    pub fn boolean_not_nullable(&self) -> bool {
        self.column_type == ColumnType::Boolean && !self.allow_nulls
    }

    /// The configured sentinel, when the sentinel case applies.
    pub fn sentinel(&self) -> Option<&str> {
        if self.string_with_sentinel() {
            self.deleted_value.as_deref()
        } else {
            None
        }
    }

    /// The deletion marker written on soft destroy.
    pub fn delete_now_value(&self, now_micros: i64) -> Value {
        match self.column_type {
            ColumnType::Time => Value::Timestamp(now_micros),
            ColumnType::Boolean => Value::Bool(true),
            ColumnType::String => Value::String(
                self.deleted_value
                    .clone()
                    .unwrap_or_else(|| DEFAULT_STRING_SENTINEL.to_string()),
            ),
        }
    }

    /// The value written back on recovery.
    ///
    /// Non-nullable boolean columns get `false` (the data-model "active"
    /// value); every other configuration clears the column to null.
    pub fn active_value(&self) -> Value {
        if self.boolean_not_nullable() {
            Value::Bool(false)
        } else {
            Value::Null
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_defaults() {
        let config = ParanoidConfig::time("deleted_at");
        assert_eq!(config.column, "deleted_at");
        assert_eq!(config.column_type, ColumnType::Time);
        assert!(config.recursive);
        assert_eq!(config.recovery_window, Duration::from_secs(120));
        assert!(!config.string_with_sentinel());
        assert!(!config.boolean_not_nullable());
    }

    #[test]
    fn test_string_sentinel_default() {
        let config = ParanoidConfig::string("status");
        assert_eq!(config.sentinel(), Some("deleted"));

        let config = config.with_deleted_value("gone");
        assert_eq!(config.sentinel(), Some("gone"));

        let config = config.without_deleted_value();
        assert_eq!(config.sentinel(), None);
    }

    #[test]
    fn test_boolean_nullability() {
        let config = ParanoidConfig::boolean("removed");
        assert!(!config.boolean_not_nullable());
        let config = config.without_nulls();
        assert!(config.boolean_not_nullable());
    }

    #[test]
    fn test_delete_now_value() {
        assert_eq!(
            ParanoidConfig::time("deleted_at").delete_now_value(42),
            Value::Timestamp(42)
        );
        assert_eq!(
            ParanoidConfig::boolean("removed").delete_now_value(42),
            Value::Bool(true)
        );
        assert_eq!(
            ParanoidConfig::string("status").delete_now_value(42),
            Value::String("deleted".into())
        );
        // Cleared sentinel still writes a non-null marker.
        assert_eq!(
            ParanoidConfig::string("status")
                .without_deleted_value()
                .delete_now_value(42),
            Value::String("deleted".into())
        );
    }

    #[test]
    fn test_active_value() {
        assert_eq!(ParanoidConfig::time("deleted_at").active_value(), Value::Null);
        assert_eq!(ParanoidConfig::boolean("removed").active_value(), Value::Null);
        assert_eq!(
            ParanoidConfig::boolean("removed").without_nulls().active_value(),
            Value::Bool(false)
        );
    }
}
