//! Value coercions shared by the sieve operators
//!
//! Records arrive as loosely typed JSON, so comparisons follow a small set of
//! coercion rules: nullish detection, canonical string form, numeric
//! conversion and loose equality.

use std::borrow::Cow;
use std::cmp::Ordering;

use serde_json::{Number, Value};

/// Rendering used for objects in string contexts.
pub const OBJECT_PLACEHOLDER: &str = "[object Object]";

/// A missing value (`None`) and JSON `null` are the same thing to the evaluator.
pub fn is_nullish(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// Canonical string form of a JSON value.
///
/// Arrays join their elements with `,` (nullish elements render empty) and
/// objects collapse to [`OBJECT_PLACEHOLDER`]. This is not a content search.
pub fn to_canonical_string(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Null => Cow::Borrowed("null"),
        Value::Bool(true) => Cow::Borrowed("true"),
        Value::Bool(false) => Cow::Borrowed("false"),
        Value::Number(n) => Cow::Owned(number_to_string(n)),
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Array(items) => Cow::Owned(
            items
                .iter()
                .map(|item| match item {
                    Value::Null => Cow::Borrowed(""),
                    other => to_canonical_string(other),
                })
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Cow::Borrowed(OBJECT_PLACEHOLDER),
    }
}

/// Integers print without a fraction, floats print their shortest
/// round-trip form, and very large or very small magnitudes use exponent
/// notation with an explicit sign (`1e+21`, `1e-7`).
pub fn number_to_string(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    format_f64(n.as_f64().unwrap_or(0.0))
}

fn format_f64(f: f64) -> String {
    if f == 0.0 {
        // covers -0.0
        return "0".to_string();
    }
    let magnitude = f.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let formatted = format!("{:e}", f);
        match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => formatted,
        }
    } else {
        f.to_string()
    }
}

/// Numeric view of a value: numbers, booleans as 0/1, and strings that parse
/// as a finite number. Blank strings are not numeric.
pub fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
        }
        _ => None,
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    match (a.as_i64(), b.as_i64()) {
        (Some(x), Some(y)) => x == y,
        _ => match (a.as_u64(), b.as_u64()) {
            (Some(x), Some(y)) => x == y,
            _ => a.as_f64() == b.as_f64(),
        },
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::Bool(_) | Value::Number(_) | Value::String(_))
}

/// Structural equality without coercion, except that numbers compare by value
/// (`1 == 1.0`).
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| deep_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| deep_equal(x, y)))
        }
        _ => false,
    }
}

/// Equality used by `==` and `!=`.
///
/// Nullish values equal each other and nothing else. Scalars of different
/// kinds compare by canonical string, so `100` equals `"100"`.
pub fn loose_equal(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (is_nullish(a), is_nullish(b)) {
        (true, true) => return true,
        (true, false) | (false, true) => return false,
        (false, false) => {}
    }

    let (Some(a), Some(b)) = (a, b) else {
        return false;
    };

    if std::mem::discriminant(a) == std::mem::discriminant(b) {
        return deep_equal(a, b);
    }
    if is_scalar(a) && is_scalar(b) {
        return to_canonical_string(a) == to_canonical_string(b);
    }
    false
}

/// Ordering used by `>`, `>=`, `<`, `<=`.
///
/// Two strings compare lexicographically, which orders ISO-8601 dates
/// correctly. Anything else compares numerically when both sides coerce to a
/// number. Returns None when the operands cannot be ordered.
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    if let (Value::String(x), Value::String(y)) = (a, b) {
        return Some(x.as_str().cmp(y.as_str()));
    }
    let x = to_number(a)?;
    let y = to_number(b)?;
    x.partial_cmp(&y)
}
