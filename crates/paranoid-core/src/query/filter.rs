//! Filter evaluation against rows of field values.

use paranoid_expr::{FilterExpr, SimpleFilter, Value};

/// Evaluates filter expressions against row data.
///
/// Null handling is deliberate two-valued logic: `IsNull` matches both
/// explicit nulls and absent fields, and `Ne` against a null field value
/// is true. The scope filters in [`crate::scope`] rely on this when
/// lifting or inverting the default deletion filter.
pub struct FilterEvaluator;

impl FilterEvaluator {
    /// Evaluate a filter expression against a row of field values.
    ///
    /// Returns `true` if the row matches the filter.
    pub fn evaluate(filter: &FilterExpr, row: &[(String, Value)]) -> bool {
        match filter {
            FilterExpr::Eq { field, value } => {
                Self::compare_field(row, field, |fv| Self::values_equal(fv, value))
            }
            FilterExpr::Ne { field, value } => {
                Self::compare_field(row, field, |fv| !Self::values_equal(fv, value))
            }
            FilterExpr::Lt { field, value } => Self::compare_field(row, field, |fv| {
                Self::compare_values(fv, value).map(|ord| ord.is_lt()).unwrap_or(false)
            }),
            FilterExpr::Le { field, value } => Self::compare_field(row, field, |fv| {
                Self::compare_values(fv, value).map(|ord| ord.is_le()).unwrap_or(false)
            }),
            FilterExpr::Gt { field, value } => Self::compare_field(row, field, |fv| {
                Self::compare_values(fv, value).map(|ord| ord.is_gt()).unwrap_or(false)
            }),
            FilterExpr::Ge { field, value } => Self::compare_field(row, field, |fv| {
                Self::compare_values(fv, value).map(|ord| ord.is_ge()).unwrap_or(false)
            }),
            FilterExpr::In { field, values } => Self::compare_field(row, field, |fv| {
                values.iter().any(|v| Self::values_equal(fv, v))
            }),
            FilterExpr::IsNull { field } => {
                matches!(Self::get_field_value(row, field), None | Some(Value::Null))
            }
            FilterExpr::IsNotNull { field } => {
                !matches!(Self::get_field_value(row, field), None | Some(Value::Null))
            }
            FilterExpr::And(conditions) => conditions
                .iter()
                .all(|condition| Self::evaluate_simple(condition, row)),
            FilterExpr::Or(conditions) => conditions
                .iter()
                .any(|condition| Self::evaluate_simple(condition, row)),
        }
    }

    /// Evaluate a simple (non-compound) filter.
    fn evaluate_simple(filter: &SimpleFilter, row: &[(String, Value)]) -> bool {
        match filter {
            SimpleFilter::Eq { field, value } => {
                Self::compare_field(row, field, |fv| Self::values_equal(fv, value))
            }
            SimpleFilter::Ne { field, value } => {
                Self::compare_field(row, field, |fv| !Self::values_equal(fv, value))
            }
            SimpleFilter::Lt { field, value } => Self::compare_field(row, field, |fv| {
                Self::compare_values(fv, value).map(|ord| ord.is_lt()).unwrap_or(false)
            }),
            SimpleFilter::Le { field, value } => Self::compare_field(row, field, |fv| {
                Self::compare_values(fv, value).map(|ord| ord.is_le()).unwrap_or(false)
            }),
            SimpleFilter::Gt { field, value } => Self::compare_field(row, field, |fv| {
                Self::compare_values(fv, value).map(|ord| ord.is_gt()).unwrap_or(false)
            }),
            SimpleFilter::Ge { field, value } => Self::compare_field(row, field, |fv| {
                Self::compare_values(fv, value).map(|ord| ord.is_ge()).unwrap_or(false)
            }),
            SimpleFilter::In { field, values } => Self::compare_field(row, field, |fv| {
                values.iter().any(|v| Self::values_equal(fv, v))
            }),
            SimpleFilter::IsNull { field } => {
                matches!(Self::get_field_value(row, field), None | Some(Value::Null))
            }
            SimpleFilter::IsNotNull { field } => {
                !matches!(Self::get_field_value(row, field), None | Some(Value::Null))
            }
        }
    }

    /// Get a field value from a row by name.
    fn get_field_value<'a>(row: &'a [(String, Value)], field: &str) -> Option<&'a Value> {
        row.iter().find(|(name, _)| name == field).map(|(_, v)| v)
    }

    /// Apply a comparator to a field value; a missing field never matches.
    fn compare_field<F>(row: &[(String, Value)], field: &str, comparator: F) -> bool
    where
        F: FnOnce(&Value) -> bool,
    {
        match Self::get_field_value(row, field) {
            Some(fv) => comparator(fv),
            None => false,
        }
    }

    /// Check if two values are equal, widening Int32 to Int64.
    fn values_equal(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int32(a), Value::Int32(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::Int32(a), Value::Int64(b)) => (*a as i64) == *b,
            (Value::Int64(a), Value::Int32(b)) => *a == (*b as i64),
            (Value::Float64(a), Value::Float64(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::Uuid(a), Value::Uuid(b)) => a == b,
            _ => false,
        }
    }

    /// Compare two values, returning their ordering if comparable.
    fn compare_values(a: &Value, b: &Value) -> Option<std::cmp::Ordering> {
        match (a, b) {
            (Value::Int32(a), Value::Int32(b)) => Some(a.cmp(b)),
            (Value::Int64(a), Value::Int64(b)) => Some(a.cmp(b)),
            (Value::Int32(a), Value::Int64(b)) => Some((*a as i64).cmp(b)),
            (Value::Int64(a), Value::Int32(b)) => Some(a.cmp(&(*b as i64))),
            (Value::Float64(a), Value::Float64(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
            (Value::Bytes(a), Value::Bytes(b)) => Some(a.cmp(b)),
            (Value::Uuid(a), Value::Uuid(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_row(fields: Vec<(&str, Value)>) -> Vec<(String, Value)> {
        fields.into_iter().map(|(n, v)| (n.to_string(), v)).collect()
    }

    #[test]
    fn test_eq_and_ne() {
        let row = make_row(vec![("status", Value::String("active".into()))]);

        assert!(FilterEvaluator::evaluate(
            &FilterExpr::eq("status", "active"),
            &row
        ));
        assert!(!FilterEvaluator::evaluate(
            &FilterExpr::eq("status", "gone"),
            &row
        ));
        assert!(FilterEvaluator::evaluate(
            &FilterExpr::ne("status", "gone"),
            &row
        ));
    }

    #[test]
    fn test_ne_against_null_field() {
        // Two-valued logic: a null field value differs from any sentinel.
        let row = make_row(vec![("status", Value::Null)]);
        assert!(FilterEvaluator::evaluate(
            &FilterExpr::ne("status", "deleted"),
            &row
        ));
    }

    #[test]
    fn test_null_checks_cover_missing_fields() {
        let with_null = make_row(vec![("deleted_at", Value::Null)]);
        let with_value = make_row(vec![("deleted_at", Value::Timestamp(5))]);
        let missing = make_row(vec![("other", Value::Int32(1))]);

        let is_null = FilterExpr::is_null("deleted_at");
        assert!(FilterEvaluator::evaluate(&is_null, &with_null));
        assert!(!FilterEvaluator::evaluate(&is_null, &with_value));
        assert!(FilterEvaluator::evaluate(&is_null, &missing));

        let is_not_null = FilterExpr::is_not_null("deleted_at");
        assert!(!FilterEvaluator::evaluate(&is_not_null, &with_null));
        assert!(FilterEvaluator::evaluate(&is_not_null, &with_value));
        assert!(!FilterEvaluator::evaluate(&is_not_null, &missing));
    }

    #[test]
    fn test_range_comparisons() {
        let row = make_row(vec![("deleted_at", Value::Timestamp(100))]);

        assert!(FilterEvaluator::evaluate(
            &FilterExpr::ge("deleted_at", Value::Timestamp(100)),
            &row
        ));
        assert!(FilterEvaluator::evaluate(
            &FilterExpr::le("deleted_at", Value::Timestamp(150)),
            &row
        ));
        assert!(!FilterEvaluator::evaluate(
            &FilterExpr::gt("deleted_at", Value::Timestamp(100)),
            &row
        ));
        assert!(FilterEvaluator::evaluate(
            &FilterExpr::lt("deleted_at", Value::Timestamp(101)),
            &row
        ));
    }

    #[test]
    fn test_in_filter() {
        let row = make_row(vec![("id", Value::Int64(2))]);

        assert!(FilterEvaluator::evaluate(
            &FilterExpr::in_values("id", vec![Value::Int64(1), Value::Int64(2)]),
            &row
        ));
        assert!(!FilterEvaluator::evaluate(
            &FilterExpr::in_values("id", vec![Value::Int64(3)]),
            &row
        ));
    }

    #[test]
    fn test_numeric_widening() {
        let row = make_row(vec![("count", Value::Int64(100))]);

        assert!(FilterEvaluator::evaluate(
            &FilterExpr::eq("count", Value::Int32(100)),
            &row
        ));
        assert!(FilterEvaluator::evaluate(
            &FilterExpr::gt("count", Value::Int32(50)),
            &row
        ));
    }

    #[test]
    fn test_and_or() {
        let row = make_row(vec![
            ("status", Value::Null),
            ("flag", Value::String("keep".into())),
        ]);

        let or = FilterExpr::or(vec![
            SimpleFilter::is_null("status"),
            SimpleFilter::ne("flag", "keep"),
        ]);
        assert!(FilterEvaluator::evaluate(&or, &row));

        let and = FilterExpr::and(vec![
            SimpleFilter::is_null("status"),
            SimpleFilter::eq("flag", "keep"),
        ]);
        assert!(FilterEvaluator::evaluate(&and, &row));

        let and = FilterExpr::and(vec![
            SimpleFilter::is_not_null("status"),
            SimpleFilter::eq("flag", "keep"),
        ]);
        assert!(!FilterEvaluator::evaluate(&and, &row));
    }

    #[test]
    fn test_empty_compounds() {
        let row = make_row(vec![("x", Value::Int32(1))]);

        // Empty AND is true, empty OR is false.
        assert!(FilterEvaluator::evaluate(&FilterExpr::And(vec![]), &row));
        assert!(!FilterEvaluator::evaluate(&FilterExpr::Or(vec![]), &row));
    }
}
