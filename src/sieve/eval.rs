//! Filter evaluator
//!
//! Evaluates filter conditions against JSON records. Nothing in here can fail:
//! nullish operands, type mismatches and missing paths all degrade to `false`.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::coerce::{compare, is_nullish, loose_equal, to_canonical_string};
use super::operator::Operator;

/// One `field operator value` test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    /// Field name, dot-separated for nested properties (`seller.address.city`)
    pub field: String,
    pub operator: Operator,
    /// Right-hand operand; ignored by `==null` and `!=null`
    #[serde(default)]
    pub value: Value,
}

impl FilterCondition {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }
}

/// Evaluate one condition against an already-extracted field value.
///
/// `None` stands for a missing field and behaves exactly like JSON `null`.
///
/// A nullish field never satisfies `@=`, `_=`, `_-=` or their `*` forms, not
/// even with an empty needle; the empty needle matches every non-nullish
/// value. The negated text operators are therefore `true` on a nullish field.
pub fn evaluate_filter(condition: &FilterCondition, value: Option<&Value>) -> bool {
    let expected = &condition.value;

    match condition.operator {
        Operator::Equals => loose_equal(value, Some(expected)),
        Operator::NotEquals => !loose_equal(value, Some(expected)),
        Operator::EqualsCaseInsensitive => equals_ignore_case(value, expected),

        Operator::GreaterThan => ordered(value, expected, Ordering::is_gt),
        Operator::GreaterThanOrEqual => ordered(value, expected, Ordering::is_ge),
        Operator::LessThan => ordered(value, expected, Ordering::is_lt),
        Operator::LessThanOrEqual => ordered(value, expected, Ordering::is_le),

        Operator::Contains => text_match(value, expected, false, |h, n| h.contains(n)),
        Operator::ContainsCaseInsensitive => {
            text_match(value, expected, true, |h, n| h.contains(n))
        }
        Operator::StartsWith => text_match(value, expected, false, |h, n| h.starts_with(n)),
        Operator::StartsWithCaseInsensitive => {
            text_match(value, expected, true, |h, n| h.starts_with(n))
        }
        Operator::EndsWith => text_match(value, expected, false, |h, n| h.ends_with(n)),

        Operator::NotContains => !text_match(value, expected, false, |h, n| h.contains(n)),
        Operator::NotStartsWith => !text_match(value, expected, false, |h, n| h.starts_with(n)),
        Operator::NotEndsWith => !text_match(value, expected, false, |h, n| h.ends_with(n)),

        Operator::IsNull => is_nullish(value),
        Operator::IsNotNull => !is_nullish(value),
    }
}

/// Evaluate every condition against `record`, ANDed together.
///
/// An empty condition list matches every record.
pub fn evaluate_filters(conditions: &[FilterCondition], record: &Value) -> bool {
    conditions
        .iter()
        .all(|condition| evaluate_filter(condition, resolve_field(record, &condition.field)))
}

/// Walk a dot-separated path through nested objects.
///
/// Numeric segments also index into arrays (`images.0.url`). Any missing
/// segment, or a scalar in the middle of the path, resolves to None.
pub fn resolve_field<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(record, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn equals_ignore_case(value: Option<&Value>, expected: &Value) -> bool {
    match (value, is_nullish(value), is_nullish(Some(expected))) {
        (_, true, true) => true,
        (Some(actual), false, false) => {
            to_canonical_string(actual).to_lowercase() == to_canonical_string(expected).to_lowercase()
        }
        _ => false,
    }
}

fn ordered(value: Option<&Value>, expected: &Value, accept: fn(Ordering) -> bool) -> bool {
    match value {
        Some(actual) if !is_nullish(value) && !expected.is_null() => {
            compare(actual, expected).is_some_and(accept)
        }
        _ => false,
    }
}

/// A nullish field never matches a positive text operator.
fn text_match(
    value: Option<&Value>,
    needle: &Value,
    ignore_case: bool,
    test: impl Fn(&str, &str) -> bool,
) -> bool {
    let Some(actual) = value.filter(|v| !v.is_null()) else {
        return false;
    };

    let haystack = to_canonical_string(actual);
    let needle = to_canonical_string(needle);
    if ignore_case {
        test(haystack.to_lowercase().as_str(), needle.to_lowercase().as_str())
    } else {
        test(haystack.as_ref(), needle.as_ref())
    }
}
