//! JavaScript value coercions used by the operators.
//!
//! JsonLogic is defined by its JavaScript reference implementation, so
//! truthiness, `ToNumber`, `parseFloat`, `String()` and abstract equality
//! are reproduced here over [`JsValue`].

use std::cmp::Ordering;
use std::sync::OnceLock;

use serde_json::{Number, Value};

use crate::types::JsValue;

// ----------------------------------------------------------------- Numbers

/// Largest integer an `f64` holds exactly (2^53).
const MAX_SAFE: f64 = 9_007_199_254_740_992.0;

/// Converts an `f64` result back into a JSON value.
///
/// Integral results become JSON integers (`3`, not `3.0`); NaN and the
/// infinities become `null`, matching `JSON.stringify`.
pub fn f64_to_jsval(n: f64) -> JsValue {
    JsValue::Json(f64_to_json(n))
}

pub fn f64_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE {
        return Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
}

/// Formats a number the way JavaScript's `String(n)` does.
///
/// # Example
///
/// ```
/// use json_logic::util::number_to_string;
///
/// assert_eq!(number_to_string(10.0), "10");
/// assert_eq!(number_to_string(1.5), "1.5");
/// assert_eq!(number_to_string(1e21), "1e+21");
/// assert_eq!(number_to_string(1e-7), "1e-7");
/// ```
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let abs = n.abs();
    if (1e-6..1e21).contains(&abs) {
        if n.fract() == 0.0 {
            return format!("{n:.0}");
        }
        return format!("{n}");
    }
    let exp = format!("{n:e}");
    match exp.split_once('e') {
        Some((mantissa, e)) if !e.starts_with('-') => format!("{mantissa}e+{e}"),
        _ => exp,
    }
}

fn decimal_regex() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex::Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$").expect("valid regex")
    })
}

fn float_prefix_regex() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex::Regex::new(r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)").expect("valid regex")
    })
}

fn parse_signed_infinity(s: &str) -> Option<f64> {
    match s {
        "Infinity" | "+Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        _ => None,
    }
}

/// JavaScript `Number(string)`.
pub fn string_to_number(s: &str) -> f64 {
    let t = s.trim();
    if t.is_empty() {
        return 0.0;
    }
    if let Some(inf) = parse_signed_infinity(t) {
        return inf;
    }
    if let Some(hex) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).map(|n| n as f64).unwrap_or(f64::NAN);
    }
    if decimal_regex().is_match(t) {
        return t.parse().unwrap_or(f64::NAN);
    }
    f64::NAN
}

/// JavaScript `Number(value)`.
pub fn to_number(value: &JsValue) -> f64 {
    match value {
        JsValue::Undefined => f64::NAN,
        JsValue::Json(v) => match v {
            Value::Null => 0.0,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
            Value::String(s) => string_to_number(s),
            Value::Array(_) => string_to_number(&to_js_string(value)),
            Value::Object(_) => f64::NAN,
        },
    }
}

/// JavaScript `parseFloat(value)`: the longest numeric prefix of `String(value)`.
pub fn parse_float(value: &JsValue) -> f64 {
    if let JsValue::Json(Value::Number(n)) = value {
        return n.as_f64().unwrap_or(f64::NAN);
    }
    let s = to_js_string(value);
    let t = s.trim_start();
    match float_prefix_regex().find(t) {
        Some(m) => {
            let text = m.as_str();
            parse_signed_infinity(text).unwrap_or_else(|| text.parse().unwrap_or(f64::NAN))
        }
        None => f64::NAN,
    }
}

/// JavaScript `ToIntegerOrInfinity`.
pub fn to_integer(value: &JsValue) -> f64 {
    let n = to_number(value);
    if n.is_nan() {
        0.0
    } else {
        n.trunc()
    }
}

// ----------------------------------------------------------------- Strings

/// JavaScript `String(value)`.
pub fn to_js_string(value: &JsValue) -> String {
    match value {
        JsValue::Undefined => "undefined".to_string(),
        JsValue::Json(v) => json_to_js_string(v),
    }
}

fn json_to_js_string(v: &Value) -> String {
    match v {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(u)) => u.to_string(),
            _ => number_to_string(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => json_to_js_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

// ----------------------------------------------------------------- Truthiness

/// JsonLogic truthiness: JavaScript truthiness, except that an empty array
/// is falsy.
pub fn is_truthy(value: &JsValue) -> bool {
    match value {
        JsValue::Undefined => false,
        JsValue::Json(v) => match v {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
            Value::String(s) => !s.is_empty(),
            Value::Array(a) => !a.is_empty(),
            Value::Object(_) => true,
        },
    }
}

// ----------------------------------------------------------------- Equality

fn is_container(v: &Value) -> bool {
    matches!(v, Value::Array(_) | Value::Object(_))
}

/// JavaScript `===`.
///
/// Arrays and objects compare structurally: documents have no reference
/// identity to compare.
pub fn strict_equals(a: &JsValue, b: &JsValue) -> bool {
    match (a, b) {
        (JsValue::Undefined, JsValue::Undefined) => true,
        (JsValue::Json(Value::Number(x)), JsValue::Json(Value::Number(y))) => x.as_f64() == y.as_f64(),
        (JsValue::Json(x), JsValue::Json(y)) => x == y,
        _ => false,
    }
}

/// JavaScript `==` (abstract equality).
pub fn loose_equals(a: &JsValue, b: &JsValue) -> bool {
    if a.is_nullish() || b.is_nullish() {
        return a.is_nullish() && b.is_nullish();
    }
    let (JsValue::Json(x), JsValue::Json(y)) = (a, b) else {
        return false;
    };
    match (x, y) {
        (Value::Number(_), Value::Number(_))
        | (Value::String(_), Value::String(_))
        | (Value::Bool(_), Value::Bool(_)) => strict_equals(a, b),
        (Value::Number(_), Value::String(_)) | (Value::String(_), Value::Number(_)) => {
            let (nx, ny) = (to_number(a), to_number(b));
            nx == ny
        }
        (Value::Bool(_), _) => loose_equals(&JsValue::from(to_number(a)), b),
        (_, Value::Bool(_)) => loose_equals(a, &JsValue::from(to_number(b))),
        (l, r) if is_container(l) && is_container(r) => l == r,
        (l, _) if is_container(l) => loose_equals(&JsValue::from(to_js_string(a)), b),
        (_, r) if is_container(r) => loose_equals(a, &JsValue::from(to_js_string(b))),
        _ => false,
    }
}

// ----------------------------------------------------------------- Ordering

/// JavaScript abstract relational comparison.
///
/// Two strings (after `ToPrimitive`) compare lexically, anything else
/// numerically. `None` when either side is NaN, which makes every relational
/// operator false.
pub fn js_compare(a: &JsValue, b: &JsValue) -> Option<Ordering> {
    let prim = |v: &JsValue| -> JsValue {
        match v {
            JsValue::Json(j) if is_container(j) => JsValue::from(to_js_string(v)),
            other => other.clone(),
        }
    };
    let (pa, pb) = (prim(a), prim(b));
    if let (JsValue::Json(Value::String(sa)), JsValue::Json(Value::String(sb))) = (&pa, &pb) {
        return Some(sa.encode_utf16().cmp(sb.encode_utf16()));
    }
    to_number(&pa).partial_cmp(&to_number(&pb))
}

pub fn js_lt(a: &JsValue, b: &JsValue) -> bool {
    js_compare(a, b) == Some(Ordering::Less)
}

pub fn js_lte(a: &JsValue, b: &JsValue) -> bool {
    matches!(js_compare(a, b), Some(Ordering::Less | Ordering::Equal))
}

pub fn js_gt(a: &JsValue, b: &JsValue) -> bool {
    js_compare(a, b) == Some(Ordering::Greater)
}

pub fn js_gte(a: &JsValue, b: &JsValue) -> bool {
    matches!(js_compare(a, b), Some(Ordering::Greater | Ordering::Equal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn j(v: Value) -> JsValue {
        JsValue::Json(v)
    }

    #[test]
    fn test_number_to_string() {
        assert_eq!(number_to_string(0.0), "0");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(42.0), "42");
        assert_eq!(number_to_string(-3.25), "-3.25");
        assert_eq!(number_to_string(0.1), "0.1");
        assert_eq!(number_to_string(1e20), "100000000000000000000");
        assert_eq!(number_to_string(1.5e-7), "1.5e-7");
        assert_eq!(number_to_string(f64::NAN), "NaN");
    }

    #[test]
    fn test_to_number() {
        assert_eq!(to_number(&j(json!(""))), 0.0);
        assert_eq!(to_number(&j(json!(" 12 "))), 12.0);
        assert_eq!(to_number(&j(json!("0x1F"))), 31.0);
        assert!(to_number(&j(json!("12px"))).is_nan());
        assert!(to_number(&j(json!("inf"))).is_nan());
        assert_eq!(to_number(&j(json!(null))), 0.0);
        assert_eq!(to_number(&j(json!(true))), 1.0);
        assert_eq!(to_number(&j(json!([7]))), 7.0);
        assert!(to_number(&JsValue::Undefined).is_nan());
    }

    #[test]
    fn test_parse_float() {
        assert_eq!(parse_float(&j(json!("12px"))), 12.0);
        assert_eq!(parse_float(&j(json!("  -1.5e2x"))), -150.0);
        assert_eq!(parse_float(&j(json!(".5"))), 0.5);
        assert!(parse_float(&j(json!(true))).is_nan());
        assert!(parse_float(&j(json!(null))).is_nan());
        assert!(parse_float(&j(json!(""))).is_nan());
    }

    #[test]
    fn test_js_string() {
        assert_eq!(to_js_string(&j(json!([1, null, "a"]))), "1,,a");
        assert_eq!(to_js_string(&j(json!({"a": 1}))), "[object Object]");
        assert_eq!(to_js_string(&j(json!(2.5))), "2.5");
        assert_eq!(to_js_string(&JsValue::Undefined), "undefined");
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&j(json!([]))));
        assert!(is_truthy(&j(json!([0]))));
        assert!(is_truthy(&j(json!({}))));
        assert!(!is_truthy(&j(json!(""))));
        assert!(!is_truthy(&j(json!(0))));
        assert!(is_truthy(&j(json!("0"))));
    }

    #[test]
    fn test_loose_equals() {
        assert!(loose_equals(&j(json!(1)), &j(json!("1"))));
        assert!(loose_equals(&j(json!(0)), &j(json!(false))));
        assert!(loose_equals(&j(json!(null)), &JsValue::Undefined));
        assert!(!loose_equals(&j(json!(null)), &j(json!(0))));
        assert!(loose_equals(&j(json!([1, 2])), &j(json!("1,2"))));
        assert!(loose_equals(&j(json!(1)), &j(json!(1.0))));
    }

    #[test]
    fn test_strict_equals() {
        assert!(!strict_equals(&j(json!(1)), &j(json!("1"))));
        assert!(strict_equals(&j(json!(1)), &j(json!(1.0))));
        assert!(!strict_equals(&j(json!(null)), &JsValue::Undefined));
    }

    #[test]
    fn test_compare() {
        assert!(js_lt(&j(json!(2)), &j(json!(11))));
        assert!(js_lt(&j(json!("11")), &j(json!("2"))));
        assert!(js_lt(&j(json!("2")), &j(json!(11))));
        assert!(!js_lt(&j(json!("abc")), &j(json!(1))));
        assert!(!js_gte(&j(json!("abc")), &j(json!(1))));
        assert!(js_gte(&j(json!("")), &j(json!(""))));
    }
}
