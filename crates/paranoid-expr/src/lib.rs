//! Predicate IR for the paranoid soft-delete engine.
//!
//! This crate defines the in-process value and predicate types the core
//! composes and hands to a persistence backend.
//!
//! # Modules
//!
//! - [`value`] - Runtime value types for record fields and predicates
//! - [`filter`] - Composable filter expressions (equality, null checks,
//!   range bounds, flat AND/OR)

pub mod filter;
pub mod value;

pub use filter::{FilterExpr, SimpleFilter};
pub use value::Value;
