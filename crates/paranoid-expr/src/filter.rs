//! Composable filter expressions.
//!
//! Filters are plain values: a scope that lifts or inverts the default
//! deletion filter constructs a new expression rather than mutating an
//! existing one.

use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Filter expression for selecting rows.
///
/// Note: this uses a flat design; And/Or contain a single level of
/// [`SimpleFilter`] conditions rather than recursive boxed trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterExpr {
    /// Field equals value.
    Eq { field: String, value: Value },
    /// Field not equals value.
    Ne { field: String, value: Value },
    /// Field less than value.
    Lt { field: String, value: Value },
    /// Field less than or equal to value.
    Le { field: String, value: Value },
    /// Field greater than value.
    Gt { field: String, value: Value },
    /// Field greater than or equal to value.
    Ge { field: String, value: Value },
    /// Field is in a set of values.
    In { field: String, values: Vec<Value> },
    /// Field is null.
    IsNull { field: String },
    /// Field is not null.
    IsNotNull { field: String },
    /// All conditions must be true (flat list, single level).
    And(Vec<SimpleFilter>),
    /// At least one condition must be true (flat list, single level).
    Or(Vec<SimpleFilter>),
}

/// A simple (non-compound) filter for use in And/Or expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimpleFilter {
    /// Field equals value.
    Eq { field: String, value: Value },
    /// Field not equals value.
    Ne { field: String, value: Value },
    /// Field less than value.
    Lt { field: String, value: Value },
    /// Field less than or equal to value.
    Le { field: String, value: Value },
    /// Field greater than value.
    Gt { field: String, value: Value },
    /// Field greater than or equal to value.
    Ge { field: String, value: Value },
    /// Field is in a set of values.
    In { field: String, values: Vec<Value> },
    /// Field is null.
    IsNull { field: String },
    /// Field is not null.
    IsNotNull { field: String },
}

impl FilterExpr {
    /// Create an equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        FilterExpr::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a not-equal filter.
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        FilterExpr::Ne {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a less-than filter.
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        FilterExpr::Lt {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a less-than-or-equal filter.
    pub fn le(field: impl Into<String>, value: impl Into<Value>) -> Self {
        FilterExpr::Le {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a greater-than filter.
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        FilterExpr::Gt {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a greater-than-or-equal filter.
    pub fn ge(field: impl Into<String>, value: impl Into<Value>) -> Self {
        FilterExpr::Ge {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create an IN filter.
    pub fn in_values(field: impl Into<String>, values: Vec<Value>) -> Self {
        FilterExpr::In {
            field: field.into(),
            values,
        }
    }

    /// Create an IS NULL filter.
    pub fn is_null(field: impl Into<String>) -> Self {
        FilterExpr::IsNull {
            field: field.into(),
        }
    }

    /// Create an IS NOT NULL filter.
    pub fn is_not_null(field: impl Into<String>) -> Self {
        FilterExpr::IsNotNull {
            field: field.into(),
        }
    }

    /// Create a conjunction of simple conditions.
    pub fn and(conditions: Vec<SimpleFilter>) -> Self {
        FilterExpr::And(conditions)
    }

    /// Create a disjunction of simple conditions.
    pub fn or(conditions: Vec<SimpleFilter>) -> Self {
        FilterExpr::Or(conditions)
    }
}

impl SimpleFilter {
    /// Create an equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        SimpleFilter::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a not-equal filter.
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        SimpleFilter::Ne {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a greater-than-or-equal filter.
    pub fn ge(field: impl Into<String>, value: impl Into<Value>) -> Self {
        SimpleFilter::Ge {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a less-than-or-equal filter.
    pub fn le(field: impl Into<String>, value: impl Into<Value>) -> Self {
        SimpleFilter::Le {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create an IS NULL filter.
    pub fn is_null(field: impl Into<String>) -> Self {
        SimpleFilter::IsNull {
            field: field.into(),
        }
    }

    /// Create an IS NOT NULL filter.
    pub fn is_not_null(field: impl Into<String>) -> Self {
        SimpleFilter::IsNotNull {
            field: field.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_helpers() {
        let f = FilterExpr::eq("deleted_at", Value::Null);
        assert_eq!(
            f,
            FilterExpr::Eq {
                field: "deleted_at".into(),
                value: Value::Null
            }
        );

        let f = FilterExpr::is_not_null("deleted_at");
        assert_eq!(
            f,
            FilterExpr::IsNotNull {
                field: "deleted_at".into()
            }
        );
    }

    #[test]
    fn test_compound_construction() {
        let f = FilterExpr::or(vec![
            SimpleFilter::is_null("flag"),
            SimpleFilter::ne("flag", "deleted"),
        ]);
        match f {
            FilterExpr::Or(conditions) => assert_eq!(conditions.len(), 2),
            other => panic!("expected Or, got {other:?}"),
        }
    }

}
