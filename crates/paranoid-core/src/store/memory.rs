//! In-memory reference store.

use std::collections::HashMap;

use parking_lot::RwLock;
use paranoid_expr::{FilterExpr, Value};
use tracing::warn;

use super::{Row, Store, StoreTransaction};
use crate::error::Error;
use crate::query::FilterEvaluator;

/// An in-memory table store.
///
/// Transactions take the write lock for their whole duration and roll
/// back by restoring a snapshot, which gives serialized transactions.
/// That is enough for the reference backend; production stores bring
/// their own concurrency control.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Vec<Row>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row directly (test/seed helper, no lifecycle involved).
    pub fn insert(&self, entity: impl Into<String>, row: Row) {
        self.tables.write().entry(entity.into()).or_default().push(row);
    }

    /// Number of rows in a table.
    pub fn len(&self, entity: &str) -> usize {
        self.tables.read().get(entity).map(|rows| rows.len()).unwrap_or(0)
    }

    /// Whether a table has no rows.
    pub fn is_empty(&self, entity: &str) -> bool {
        self.len(entity) == 0
    }
}

fn row_matches(filters: &[FilterExpr], row: &[(String, Value)]) -> bool {
    filters.iter().all(|filter| FilterEvaluator::evaluate(filter, row))
}

fn select_rows(
    tables: &HashMap<String, Vec<Row>>,
    entity: &str,
    filters: &[FilterExpr],
) -> Vec<Row> {
    tables
        .get(entity)
        .map(|rows| {
            rows.iter()
                .filter(|row| row_matches(filters, row))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

impl Store for MemoryStore {
    fn select(&self, entity: &str, filters: &[FilterExpr]) -> Result<Vec<Row>, Error> {
        Ok(select_rows(&self.tables.read(), entity, filters))
    }

    fn with_transaction(
        &self,
        body: &mut dyn FnMut(&mut dyn StoreTransaction) -> Result<(), Error>,
    ) -> Result<(), Error> {
        let mut guard = self.tables.write();
        let snapshot = guard.clone();

        let result = {
            let mut tx = MemoryTransaction {
                tables: &mut guard,
            };
            body(&mut tx)
        };

        match result {
            Ok(()) => Ok(()),
            Err(e) => {
                *guard = snapshot;
                warn!(error = %e, "transaction rolled back");
                Err(e)
            }
        }
    }
}

struct MemoryTransaction<'a> {
    tables: &'a mut HashMap<String, Vec<Row>>,
}

impl StoreTransaction for MemoryTransaction<'_> {
    fn select(&mut self, entity: &str, filters: &[FilterExpr]) -> Result<Vec<Row>, Error> {
        Ok(select_rows(self.tables, entity, filters))
    }

    fn update_where(
        &mut self,
        entity: &str,
        filters: &[FilterExpr],
        assignments: &[(String, Value)],
    ) -> Result<u64, Error> {
        let mut affected = 0;
        if let Some(rows) = self.tables.get_mut(entity) {
            for row in rows.iter_mut() {
                if !row_matches(filters, row) {
                    continue;
                }
                for (column, value) in assignments {
                    match row.iter_mut().find(|(name, _)| name == column) {
                        Some(slot) => slot.1 = value.clone(),
                        None => row.push((column.clone(), value.clone())),
                    }
                }
                affected += 1;
            }
        }
        Ok(affected)
    }

    fn adjust_counter(
        &mut self,
        entity: &str,
        filters: &[FilterExpr],
        column: &str,
        delta: i64,
    ) -> Result<u64, Error> {
        let mut affected = 0;
        if let Some(rows) = self.tables.get_mut(entity) {
            for row in rows.iter_mut() {
                if !row_matches(filters, row) {
                    continue;
                }
                let Some(slot) = row.iter_mut().find(|(name, _)| name == column) else {
                    continue;
                };
                match slot.1 {
                    Value::Int32(i) => {
                        let next = i64::from(i).saturating_add(delta);
                        let next = next.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
                        slot.1 = Value::Int32(next);
                    }
                    Value::Int64(i) => slot.1 = Value::Int64(i.saturating_add(delta)),
                    // Non-integer counter columns are left untouched.
                    _ => continue,
                }
                affected += 1;
            }
        }
        Ok(affected)
    }

    fn delete_where(&mut self, entity: &str, filters: &[FilterExpr]) -> Result<u64, Error> {
        let mut removed = 0;
        if let Some(rows) = self.tables.get_mut(entity) {
            let before = rows.len();
            rows.retain(|row| !row_matches(filters, row));
            removed = (before - rows.len()) as u64;
        }
        Ok(removed)
    }
}
