//! String operators: `cat`, `substr`, `in`.

use serde_json::Value;

use super::{eval_args, nth};
use crate::error::EvalError;
use crate::eval_ctx::EvalCtx;
use crate::types::{Arity, JsValue, OperatorDefinition};
use crate::util::{self, to_integer, to_js_string};

fn cat_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    let args = eval_args(operands, ctx)?;
    Ok(JsValue::from(args.iter().map(to_js_string).collect::<String>()))
}

/// `String.prototype.substr` over characters.
fn substr_chars(chars: &[char], start: f64, length: Option<f64>) -> String {
    let len = chars.len() as f64;
    let from = if start < 0.0 { (len + start).max(0.0) } else { start.min(len) };
    let count = match length {
        Some(l) => l.max(0.0).min(len - from),
        None => len - from,
    };
    chars[from as usize..(from + count) as usize].iter().collect()
}

/// `substr(source, start[, length])`. A negative length trims that many
/// characters from the end of the tail.
fn substr_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    let args = eval_args(operands, ctx)?;
    let source: Vec<char> = to_js_string(&nth(&args, 0)).chars().collect();
    let start = to_integer(&nth(&args, 1));
    let out = match args.get(2) {
        None | Some(JsValue::Undefined) => substr_chars(&source, start, None),
        Some(end) => {
            let end = to_integer(end);
            if end < 0.0 {
                let tail: Vec<char> = substr_chars(&source, start, None).chars().collect();
                let keep = tail.len() as f64 + end;
                substr_chars(&tail, 0.0, Some(keep))
            } else {
                substr_chars(&source, start, Some(end))
            }
        }
    };
    Ok(JsValue::from(out))
}

/// `in(needle, haystack)`: substring test on strings, strict membership on
/// arrays, `false` otherwise.
fn in_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    let args = eval_args(operands, ctx)?;
    let needle = nth(&args, 0);
    let found = match nth(&args, 1) {
        JsValue::Json(Value::String(hay)) => hay.contains(&to_js_string(&needle)),
        JsValue::Json(Value::Array(items)) => items
            .into_iter()
            .any(|item| util::strict_equals(&JsValue::Json(item), &needle)),
        _ => false,
    };
    Ok(JsValue::from(found))
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![
        OperatorDefinition::builtin("cat", &[], Arity::Any, cat_eval),
        OperatorDefinition::builtin("substr", &[], Arity::Range(2, Some(3)), substr_eval),
        OperatorDefinition::builtin("in", &[], Arity::Fixed(2), in_eval),
    ]
}
