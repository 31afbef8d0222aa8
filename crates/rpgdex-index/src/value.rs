//! Ordering and equality over JSON payload values.

use std::cmp::Ordering;

use serde_json::Value;

/// Equality as used by `where` constraints.
///
/// Numbers compare by numeric value, so `1` equals `1.0`. Everything else is
/// structural.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        _ => a == b,
    }
}

/// Natural ordering for sort keys.
///
/// Numbers order numerically, strings lexically, booleans false-first.
/// Mixed types order bool < number < string < array < object, and a
/// missing or null field sorts after everything else. Arrays and objects
/// are not compared element-wise and tie.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

fn rank(value: Option<&Value>) -> u8 {
    match value {
        Some(Value::Bool(_)) => 0,
        Some(Value::Number(_)) => 1,
        Some(Value::String(_)) => 2,
        Some(Value::Array(_)) => 3,
        Some(Value::Object(_)) => 4,
        Some(Value::Null) | None => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_equality_ignores_representation() {
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(!values_equal(&json!(1), &json!("1")));
        assert!(values_equal(&json!([1, 2]), &json!([1, 2])));
    }

    #[test]
    fn test_ordering_within_type() {
        assert_eq!(compare_values(Some(&json!(2)), Some(&json!(10))), Ordering::Less);
        assert_eq!(compare_values(Some(&json!("b")), Some(&json!("a"))), Ordering::Greater);
        assert_eq!(compare_values(Some(&json!(false)), Some(&json!(true))), Ordering::Less);
    }

    #[test]
    fn test_missing_sorts_last() {
        assert_eq!(compare_values(None, Some(&json!(0))), Ordering::Greater);
        assert_eq!(compare_values(Some(&json!("x")), Some(&Value::Null)), Ordering::Less);
        assert_eq!(compare_values(None, None), Ordering::Equal);
    }
}
