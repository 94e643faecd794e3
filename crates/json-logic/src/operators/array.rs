//! Array operators.
//!
//! `map`, `filter`, `reduce`, `all`, `none` and `some` evaluate their first
//! operand against the current data, then evaluate the body once per item
//! with that item as data.

use serde_json::{Map, Value};

use super::eval_args;
use crate::error::EvalError;
use crate::eval_ctx::EvalCtx;
use crate::evaluate::{evaluate, evaluate_opt};
use crate::types::{Arity, JsValue, OperatorDefinition};
use crate::util::is_truthy;

fn merge_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    let mut out = Vec::new();
    for arg in eval_args(operands, ctx)? {
        match arg.into_json() {
            Value::Array(items) => out.extend(items),
            other => out.push(other),
        }
    }
    Ok(JsValue::Json(Value::Array(out)))
}

/// Evaluates the source operand; anything other than an array is empty.
fn scoped_items(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<Vec<Value>, EvalError> {
    match evaluate_opt(operands.first(), ctx)? {
        JsValue::Json(Value::Array(items)) => Ok(items),
        _ => Ok(Vec::new()),
    }
}

static NULL: Value = Value::Null;

fn body(operands: &[Value]) -> &Value {
    operands.get(1).unwrap_or(&NULL)
}

fn filter_items(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<Vec<Value>, EvalError> {
    let logic = body(operands);
    let mut out = Vec::new();
    for item in scoped_items(operands, ctx)? {
        if is_truthy(&evaluate(logic, &ctx.scoped(&item))?) {
            out.push(item);
        }
    }
    Ok(out)
}

fn map_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    let logic = body(operands);
    let mut out = Vec::new();
    for item in scoped_items(operands, ctx)? {
        out.push(evaluate(logic, &ctx.scoped(&item))?.into_json());
    }
    Ok(JsValue::Json(Value::Array(out)))
}

fn filter_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    Ok(JsValue::Json(Value::Array(filter_items(operands, ctx)?)))
}

/// `reduce(items, logic, initial)`. The body sees `{"current", "accumulator"}`.
fn reduce_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    let items = scoped_items(operands, ctx)?;
    let logic = body(operands);
    let mut acc = match operands.get(2) {
        Some(initial) => evaluate(initial, ctx)?,
        None => JsValue::Json(Value::Null),
    };
    for current in items {
        let mut scope = Map::new();
        scope.insert("current".to_string(), current);
        scope.insert("accumulator".to_string(), acc.into_json());
        let scope = Value::Object(scope);
        acc = evaluate(logic, &ctx.scoped(&scope))?;
    }
    Ok(acc)
}

/// `false` for an empty source.
fn all_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    let items = scoped_items(operands, ctx)?;
    if items.is_empty() {
        return Ok(JsValue::from(false));
    }
    let logic = body(operands);
    for item in &items {
        if !is_truthy(&evaluate(logic, &ctx.scoped(item))?) {
            return Ok(JsValue::from(false));
        }
    }
    Ok(JsValue::from(true))
}

fn none_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    Ok(JsValue::from(filter_items(operands, ctx)?.is_empty()))
}

fn some_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    Ok(JsValue::from(!filter_items(operands, ctx)?.is_empty()))
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![
        OperatorDefinition::builtin("map", &[], Arity::Fixed(2), map_eval),
        OperatorDefinition::builtin("filter", &[], Arity::Fixed(2), filter_eval),
        OperatorDefinition::builtin("reduce", &[], Arity::Range(2, Some(3)), reduce_eval),
        OperatorDefinition::builtin("all", &[], Arity::Fixed(2), all_eval),
        OperatorDefinition::builtin("none", &[], Arity::Fixed(2), none_eval),
        OperatorDefinition::builtin("some", &[], Arity::Fixed(2), some_eval),
        OperatorDefinition::builtin("merge", &[], Arity::Any, merge_eval),
    ]
}
