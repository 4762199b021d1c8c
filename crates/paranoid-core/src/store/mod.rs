//! Persistence layer interface.
//!
//! The engine never talks to storage directly; it composes predicates
//! and hands them to these traits. Every top-level lifecycle operation
//! runs inside one [`Store::with_transaction`] call, so the root
//! mutation and all cascaded mutations commit or roll back together.

mod memory;

pub use memory::MemoryStore;

use paranoid_expr::{FilterExpr, Value};

use crate::error::Error;

/// A row of field values as returned by the persistence layer.
pub type Row = Vec<(String, Value)>;

/// Operations available inside a transaction.
///
/// All predicates are conjunctions: a row matches when every filter in
/// the slice matches.
pub trait StoreTransaction {
    /// Select rows matching all filters.
    fn select(&mut self, entity: &str, filters: &[FilterExpr]) -> Result<Vec<Row>, Error>;

    /// Assign field values on all matching rows, returning the affected count.
    fn update_where(
        &mut self,
        entity: &str,
        filters: &[FilterExpr],
        assignments: &[(String, Value)],
    ) -> Result<u64, Error>;

    /// Add `delta` to an integer column on all matching rows, returning
    /// the affected count.
    fn adjust_counter(
        &mut self,
        entity: &str,
        filters: &[FilterExpr],
        column: &str,
        delta: i64,
    ) -> Result<u64, Error>;

    /// Permanently remove all matching rows, returning the removed count.
    fn delete_where(&mut self, entity: &str, filters: &[FilterExpr]) -> Result<u64, Error>;
}

/// A persistence backend.
pub trait Store: Send + Sync {
    /// Select rows matching all filters, outside any transaction.
    fn select(&self, entity: &str, filters: &[FilterExpr]) -> Result<Vec<Row>, Error>;

    /// Run `body` inside an atomic transaction.
    ///
    /// Commits when `body` returns `Ok`; any `Err` rolls back every
    /// write made through the transaction and is returned unchanged.
    fn with_transaction(
        &self,
        body: &mut dyn FnMut(&mut dyn StoreTransaction) -> Result<(), Error>,
    ) -> Result<(), Error>;
}
