//! Data access: `var`, `missing`, `missing_some`.

use serde_json::Value;

use super::{eval_args, nth};
use crate::error::EvalError;
use crate::eval_ctx::EvalCtx;
use crate::types::{Arity, JsValue, OperatorDefinition};
use crate::util::{to_js_string, to_number};

/// Looks up a dotted path (`"a.b.0"`) in `data`.
///
/// `None`, `null`, `undefined` and `""` name the whole data. Array segments
/// must be canonical indices. Returns `None` when any segment is absent.
///
/// # Example
///
/// ```
/// use json_logic::operators::data::lookup;
/// use json_logic::JsValue;
/// use serde_json::json;
///
/// let data = json!({"user": {"tags": ["a", "b"]}});
/// assert_eq!(lookup(&data, &JsValue::from("user.tags.1")), Some(&json!("b")));
/// assert_eq!(lookup(&data, &JsValue::from("user.name")), None);
/// ```
pub fn lookup<'a>(data: &'a Value, path: &JsValue) -> Option<&'a Value> {
    let key = match path {
        JsValue::Undefined | JsValue::Json(Value::Null) => return Some(data),
        other => to_js_string(other),
    };
    if key.is_empty() {
        return Some(data);
    }
    let mut current = data;
    for segment in key.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(array_index(segment)?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn array_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || (segment.len() > 1 && segment.starts_with('0')) {
        return None;
    }
    if !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// `var(path[, default])`. An unresolved path with no default yields
/// `undefined`.
fn var_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    let args = eval_args(operands, ctx)?;
    let path = nth(&args, 0);
    match lookup(ctx.data, &path) {
        Some(value) => Ok(JsValue::Json(value.clone())),
        None => Ok(nth(&args, 1)),
    }
}

fn is_missing(data: &Value, key: &JsValue) -> bool {
    match lookup(data, key) {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn missing_keys(data: &Value, args: Vec<JsValue>) -> Vec<Value> {
    let keys = match args.first() {
        Some(JsValue::Json(Value::Array(items))) => items.iter().cloned().map(JsValue::Json).collect(),
        _ => args,
    };
    keys.into_iter()
        .filter(|key| is_missing(data, key))
        .map(JsValue::into_json)
        .collect()
}

/// Lists the keys (first operand may be a list of keys) that are absent,
/// `null` or `""` in the data.
fn missing_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    let args = eval_args(operands, ctx)?;
    Ok(JsValue::Json(Value::Array(missing_keys(ctx.data, args))))
}

/// `missing_some(need, keys)`: empty when at least `need` of `keys` are
/// present, otherwise the missing keys.
fn missing_some_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    let args = eval_args(operands, ctx)?;
    let need = to_number(&nth(&args, 0));
    let options = match nth(&args, 1) {
        JsValue::Json(Value::Array(items)) => items,
        _ => Vec::new(),
    };
    let total = options.len();
    let missing = missing_keys(ctx.data, vec![JsValue::Json(Value::Array(options))]);
    if (total - missing.len()) as f64 >= need {
        return Ok(JsValue::Json(Value::Array(Vec::new())));
    }
    Ok(JsValue::Json(Value::Array(missing)))
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![
        OperatorDefinition::builtin("var", &[], Arity::Range(1, Some(2)), var_eval),
        OperatorDefinition::builtin("missing", &[], Arity::Any, missing_eval),
        OperatorDefinition::builtin("missing_some", &[], Arity::Fixed(2), missing_some_eval),
    ]
}
