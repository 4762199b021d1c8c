//! Deletion predicate engine.
//!
//! Pure classification of a deletion-column value against a
//! configuration. The default query scope in [`crate::scope`] is built
//! case-by-case from the same rules, keeping visibility and deletion
//! state in lockstep.

use paranoid_expr::Value;

use crate::catalog::ParanoidConfig;

/// Decide whether a deletion-column value counts as "deleted".
///
/// - String column with a sentinel: deleted iff the value equals the
///   sentinel (null or any other value is active).
/// - Non-nullable boolean column: deleted iff the value is exactly
///   `false`. This polarity is the inverse of the intuitive
///   "true means deleted" and also disagrees with the `true` deletion
///   marker; it is a known oddity preserved as a fixed contract, not a
///   bug to correct.
/// - Everything else (time, nullable boolean, string without sentinel):
///   deleted iff the value is not null.
///
/// Pure function of (configuration, value); no side effects.
pub fn is_deleted(config: &ParanoidConfig, value: &Value) -> bool {
    if let Some(sentinel) = config.sentinel() {
        matches!(value, Value::String(s) if s == sentinel)
    } else if config.boolean_not_nullable() {
        matches!(value, Value::Bool(false))
    } else {
        !value.is_null()
    }
}
