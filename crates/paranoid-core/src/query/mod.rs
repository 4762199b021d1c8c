//! Row-level predicate evaluation.
//!
//! Used by the in-memory store to apply [`paranoid_expr::FilterExpr`]
//! predicates; a SQL-backed store would compile the same predicates to
//! WHERE clauses instead.

mod filter;

pub use filter::FilterEvaluator;
