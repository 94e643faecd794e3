//! Numeric operators.
//!
//! `+` and `*` read operands with `parseFloat`, the rest with `Number`.
//! Non-finite results serialize as `null`.

use serde_json::Value;

use super::{eval_args, nth};
use crate::error::EvalError;
use crate::eval_ctx::EvalCtx;
use crate::types::{Arity, JsValue, OperatorDefinition};
use crate::util::{parse_float, to_number};

fn add_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    let args = eval_args(operands, ctx)?;
    Ok(JsValue::from(args.iter().map(parse_float).sum::<f64>()))
}

/// A lone operand is returned untouched; no operands yield `undefined`.
fn mul_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    let mut args = eval_args(operands, ctx)?.into_iter();
    let Some(first) = args.next() else {
        return Ok(JsValue::Undefined);
    };
    let mut acc = match args.next() {
        Some(second) => parse_float(&first) * parse_float(&second),
        None => return Ok(first),
    };
    for arg in args {
        acc *= parse_float(&arg);
    }
    Ok(JsValue::from(acc))
}

fn sub_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    let args = eval_args(operands, ctx)?;
    let a = to_number(&nth(&args, 0));
    match args.get(1) {
        None | Some(JsValue::Undefined) => Ok(JsValue::from(-a)),
        Some(b) => Ok(JsValue::from(a - to_number(b))),
    }
}

fn div_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    let args = eval_args(operands, ctx)?;
    Ok(JsValue::from(to_number(&nth(&args, 0)) / to_number(&nth(&args, 1))))
}

fn mod_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    let args = eval_args(operands, ctx)?;
    Ok(JsValue::from(to_number(&nth(&args, 0)) % to_number(&nth(&args, 1))))
}

fn fold_numbers(args: &[JsValue], init: f64, pick: fn(f64, f64) -> f64) -> f64 {
    args.iter().map(to_number).fold(init, |acc, n| {
        if acc.is_nan() || n.is_nan() {
            f64::NAN
        } else {
            pick(acc, n)
        }
    })
}

fn min_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    let args = eval_args(operands, ctx)?;
    Ok(JsValue::from(fold_numbers(&args, f64::INFINITY, f64::min)))
}

fn max_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    let args = eval_args(operands, ctx)?;
    Ok(JsValue::from(fold_numbers(&args, f64::NEG_INFINITY, f64::max)))
}

fn abs_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    let args = eval_args(operands, ctx)?;
    Ok(JsValue::from(to_number(&nth(&args, 0)).abs()))
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![
        OperatorDefinition::builtin("+", &[], Arity::Any, add_eval),
        OperatorDefinition::builtin("-", &[], Arity::Range(1, Some(2)), sub_eval),
        OperatorDefinition::builtin("*", &[], Arity::Range(1, None), mul_eval),
        OperatorDefinition::builtin("/", &[], Arity::Fixed(2), div_eval),
        OperatorDefinition::builtin("%", &[], Arity::Fixed(2), mod_eval),
        OperatorDefinition::builtin("min", &[], Arity::Any, min_eval),
        OperatorDefinition::builtin("max", &[], Arity::Any, max_eval),
        OperatorDefinition::builtin("abs", &[], Arity::Fixed(1), abs_eval),
    ]
}

#[cfg(test)]
mod tests {
    use crate::{Evaluator, JsValue};
    use serde_json::{json, Value};

    fn apply(logic: Value) -> JsValue {
        Evaluator::with_builtins().apply(&logic, &json!(null)).unwrap()
    }

    #[test]
    fn test_add_parses_floats() {
        assert_eq!(apply(json!({"+": [1, "2", "3.5kg"]})), JsValue::Json(json!(6.5)));
        assert_eq!(apply(json!({"+": []})), JsValue::Json(json!(0)));
        assert_eq!(apply(json!({"+": "3"})), JsValue::Json(json!(3)));
    }

    #[test]
    fn test_mul() {
        assert_eq!(apply(json!({"*": [2, "3", 4]})), JsValue::Json(json!(24)));
        assert_eq!(apply(json!({"*": ["x"]})), JsValue::from("x"));
        assert_eq!(apply(json!({"*": []})), JsValue::Undefined);
    }

    #[test]
    fn test_sub_and_negate() {
        assert_eq!(apply(json!({"-": [5, 2]})), JsValue::Json(json!(3)));
        assert_eq!(apply(json!({"-": [2]})), JsValue::Json(json!(-2)));
        assert_eq!(apply(json!({"-": ["4"]})), JsValue::Json(json!(-4)));
    }

    #[test]
    fn test_div_mod() {
        assert_eq!(apply(json!({"/": [3, 2]})), JsValue::Json(json!(1.5)));
        assert_eq!(apply(json!({"/": [1, 0]})), JsValue::Json(Value::Null));
        assert_eq!(apply(json!({"%": [7, 3]})), JsValue::Json(json!(1)));
    }

    #[test]
    fn test_min_max_abs() {
        assert_eq!(apply(json!({"min": [3, 1, "2"]})), JsValue::Json(json!(1)));
        assert_eq!(apply(json!({"max": [3, 1, 2]})), JsValue::Json(json!(3)));
        assert_eq!(apply(json!({"max": [1, "x"]})), JsValue::Json(Value::Null));
        assert_eq!(apply(json!({"min": []})), JsValue::Json(Value::Null));
        assert_eq!(apply(json!({"abs": -4.5})), JsValue::Json(json!(4.5)));
    }
}
