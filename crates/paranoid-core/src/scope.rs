//! Default query scopes for soft-deleted rows.
//!
//! The visible/deleted filters are constructed case-by-case from the
//! same configuration rules as [`crate::predicate`], so a row is
//! returned by the default scope exactly when the predicate says it is
//! not deleted. Scopes are plain values: lifting the filter builds a
//! new [`ScopedQuery`] rather than mutating one in place.

use paranoid_expr::{FilterExpr, SimpleFilter, Value};
use tracing::debug;

use crate::catalog::{Catalog, ParanoidConfig};
use crate::error::Error;
use crate::store::{Row, Store};
use crate::time;

/// The implicit filter hiding deleted rows, per column configuration.
///
/// Built by the matching predicate case, not blind negation: the
/// sentinel case is `IS NULL OR != sentinel`, which a negated equality
/// would get wrong under SQL three-valued logic. The boolean case also
/// keeps the null check, so a row missing the column altogether still
/// classifies as visible, like the predicate does.
pub fn visible_filter(config: &ParanoidConfig) -> FilterExpr {
    let column = config.column.as_str();
    if let Some(sentinel) = config.sentinel() {
        FilterExpr::or(vec![
            SimpleFilter::is_null(column),
            SimpleFilter::ne(column, sentinel),
        ])
    } else if config.boolean_not_nullable() {
        FilterExpr::or(vec![
            SimpleFilter::is_null(column),
            SimpleFilter::ne(column, false),
        ])
    } else {
        FilterExpr::is_null(column)
    }
}

/// The inverse filter selecting only deleted rows.
pub fn deleted_filter(config: &ParanoidConfig) -> FilterExpr {
    let column = config.column.as_str();
    if let Some(sentinel) = config.sentinel() {
        FilterExpr::eq(column, sentinel)
    } else if config.boolean_not_nullable() {
        FilterExpr::eq(column, false)
    } else {
        FilterExpr::is_not_null(column)
    }
}

/// Which rows a query sees with respect to deletion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// The default scope: deleted rows are hidden.
    ActiveOnly,
    /// Filter lifted: both active and deleted rows.
    WithDeleted,
    /// Only deleted rows.
    OnlyDeleted,
}

/// A query against one entity type with an explicit visibility.
#[derive(Debug, Clone)]
pub struct ScopedQuery {
    entity: String,
    conditions: Vec<FilterExpr>,
    visibility: Visibility,
}

impl ScopedQuery {
    /// Create a default-scope query (deleted rows hidden).
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            conditions: Vec::new(),
            visibility: Visibility::ActiveOnly,
        }
    }

    /// Add a caller condition (conjunction).
    pub fn filtered(mut self, condition: FilterExpr) -> Self {
        self.conditions.push(condition);
        self
    }

    /// A copy of this query with the deletion filter lifted.
    pub fn with_deleted(&self) -> Self {
        Self {
            visibility: Visibility::WithDeleted,
            ..self.clone()
        }
    }

    /// A copy of this query restricted to deleted rows.
    pub fn only_deleted(&self) -> Self {
        Self {
            visibility: Visibility::OnlyDeleted,
            ..self.clone()
        }
    }

    /// The entity type queried.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// The visibility of this query.
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// The full conjunction handed to the store.
    pub fn filters(&self, catalog: &Catalog) -> Result<Vec<FilterExpr>, Error> {
        let mut filters = Vec::with_capacity(self.conditions.len() + 1);
        match self.visibility {
            Visibility::ActiveOnly => filters.push(visible_filter(catalog.config_for(&self.entity)?)),
            Visibility::OnlyDeleted => filters.push(deleted_filter(catalog.config_for(&self.entity)?)),
            Visibility::WithDeleted => {
                // Still a configuration lookup: lifting the filter on a
                // non-paranoid type is a setup error, not a plain query.
                catalog.config_for(&self.entity)?;
            }
        }
        filters.extend(self.conditions.iter().cloned());
        Ok(filters)
    }

    /// Run this query against a store.
    pub fn fetch(&self, catalog: &Catalog, store: &dyn Store) -> Result<Vec<Row>, Error> {
        store.select(&self.entity, &self.filters(catalog)?)
    }
}

/// Apply the deletion marker to all matching active rows in bulk.
///
/// No per-record hooks and no cascades run; returns the affected count.
pub fn delete_all_soft(
    store: &dyn Store,
    catalog: &Catalog,
    entity: &str,
    conditions: &[FilterExpr],
) -> Result<u64, Error> {
    let config = catalog.config_for(entity)?;
    let marker = config.delete_now_value(time::now_micros());

    let mut filters = vec![visible_filter(config)];
    filters.extend_from_slice(conditions);
    let assignments = [(config.column.clone(), marker)];

    let mut affected = 0;
    store.with_transaction(&mut |tx| {
        affected = tx.update_where(entity, &filters, &assignments)?;
        Ok(())
    })?;
    debug!(entity, rows = affected, "bulk soft delete");
    Ok(affected)
}

/// Permanently remove all matching rows, deleted or not.
///
/// The deletion filter is lifted first, so already-deleted rows are
/// removed along with active ones.
pub fn delete_all_hard(
    store: &dyn Store,
    catalog: &Catalog,
    entity: &str,
    conditions: &[FilterExpr],
) -> Result<u64, Error> {
    catalog.config_for(entity)?;

    let mut affected = 0;
    store.with_transaction(&mut |tx| {
        affected = tx.delete_where(entity, conditions)?;
        Ok(())
    })?;
    debug!(entity, rows = affected, "bulk hard delete");
    Ok(affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EntityDef, ParanoidConfig};
    use crate::predicate;
    use crate::query::FilterEvaluator;
    use crate::store::MemoryStore;

    fn catalog_with(config: ParanoidConfig) -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .register_entity(EntityDef::new("Post", "id").with_paranoid(config))
            .unwrap();
        catalog
    }

    fn configs() -> Vec<ParanoidConfig> {
        vec![
            ParanoidConfig::time("deleted_at"),
            ParanoidConfig::boolean("removed"),
            ParanoidConfig::boolean("removed").without_nulls(),
            ParanoidConfig::string("status"),
            ParanoidConfig::string("status").with_deleted_value("gone"),
            ParanoidConfig::string("status").without_deleted_value(),
        ]
    }

    fn candidate_values(config: &ParanoidConfig) -> Vec<Value> {
        let mut values = vec![Value::Null];
        match config.column_type {
            crate::catalog::ColumnType::Time => values.push(Value::Timestamp(123)),
            crate::catalog::ColumnType::Boolean => {
                values.push(Value::Bool(true));
                values.push(Value::Bool(false));
            }
            crate::catalog::ColumnType::String => {
                values.push(Value::String("deleted".into()));
                values.push(Value::String("gone".into()));
                values.push(Value::String("anything".into()));
            }
        }
        values
    }

    #[test]
    fn test_filters_complement_predicate() {
        // A row is visible under the default scope iff the predicate says
        // it is not deleted, for every configuration and value.
        for config in configs() {
            let visible = visible_filter(&config);
            let deleted = deleted_filter(&config);
            for value in candidate_values(&config) {
                let row = vec![(config.column.clone(), value.clone())];
                let is_deleted = predicate::is_deleted(&config, &value);

                assert_eq!(
                    FilterEvaluator::evaluate(&visible, &row),
                    !is_deleted,
                    "visible filter disagrees with predicate for {config:?} / {value:?}"
                );
                assert_eq!(
                    FilterEvaluator::evaluate(&deleted, &row),
                    is_deleted,
                    "deleted filter disagrees with predicate for {config:?} / {value:?}"
                );
            }
        }
    }

    #[test]
    fn test_rows_missing_the_column_are_visible() {
        // A row without the deletion column reads as null, which every
        // configuration classifies as not deleted; the filters must agree
        // so the scope partition holds for such rows too.
        let bare_row = vec![("id".to_string(), Value::Int64(1))];
        for config in configs() {
            assert!(
                FilterEvaluator::evaluate(&visible_filter(&config), &bare_row),
                "row without the column is hidden for {config:?}"
            );
            assert!(
                !FilterEvaluator::evaluate(&deleted_filter(&config), &bare_row),
                "row without the column counts as deleted for {config:?}"
            );
        }
    }

    #[test]
    fn test_scoped_query_partitions_rows() {
        let catalog = catalog_with(ParanoidConfig::time("deleted_at"));
        let store = MemoryStore::new();
        store.insert(
            "Post",
            vec![
                ("id".to_string(), Value::Int64(1)),
                ("deleted_at".to_string(), Value::Null),
            ],
        );
        store.insert(
            "Post",
            vec![
                ("id".to_string(), Value::Int64(2)),
                ("deleted_at".to_string(), Value::Timestamp(99)),
            ],
        );

        let base = ScopedQuery::new("Post");
        let active = base.fetch(&catalog, &store).unwrap();
        let all = base.with_deleted().fetch(&catalog, &store).unwrap();
        let deleted = base.only_deleted().fetch(&catalog, &store).unwrap();

        assert_eq!(active.len(), 1);
        assert_eq!(deleted.len(), 1);
        // with_deleted is exactly the disjoint union of the other two.
        assert_eq!(all.len(), active.len() + deleted.len());
    }

    #[test]
    fn test_scoped_query_keeps_conditions_across_visibility() {
        let catalog = catalog_with(ParanoidConfig::time("deleted_at"));
        let query = ScopedQuery::new("Post").filtered(FilterExpr::eq("id", Value::Int64(2)));

        let filters = query.only_deleted().filters(&catalog).unwrap();
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0], FilterExpr::is_not_null("deleted_at"));

        let filters = query.with_deleted().filters(&catalog).unwrap();
        assert_eq!(filters.len(), 1);
    }

    #[test]
    fn test_delete_all_soft_marks_only_active_rows() {
        let catalog = catalog_with(ParanoidConfig::boolean("removed"));
        let store = MemoryStore::new();
        store.insert(
            "Post",
            vec![
                ("id".to_string(), Value::Int64(1)),
                ("removed".to_string(), Value::Null),
            ],
        );
        store.insert(
            "Post",
            vec![
                ("id".to_string(), Value::Int64(2)),
                ("removed".to_string(), Value::Bool(true)),
            ],
        );

        let affected = delete_all_soft(&store, &catalog, "Post", &[]).unwrap();
        assert_eq!(affected, 1);

        let deleted = ScopedQuery::new("Post")
            .only_deleted()
            .fetch(&catalog, &store)
            .unwrap();
        assert_eq!(deleted.len(), 2);
    }

    #[test]
    fn test_delete_all_hard_ignores_visibility() {
        let catalog = catalog_with(ParanoidConfig::time("deleted_at"));
        let store = MemoryStore::new();
        store.insert(
            "Post",
            vec![
                ("id".to_string(), Value::Int64(1)),
                ("deleted_at".to_string(), Value::Timestamp(5)),
            ],
        );
        store.insert(
            "Post",
            vec![
                ("id".to_string(), Value::Int64(2)),
                ("deleted_at".to_string(), Value::Null),
            ],
        );

        let affected = delete_all_hard(&store, &catalog, "Post", &[]).unwrap();
        assert_eq!(affected, 2);
        assert!(store.is_empty("Post"));
    }
}
