//! Built-in operator tables.
//!
//! Each submodule exposes `operators()`; [`all_operators`] concatenates them
//! in palette order.

pub mod arithmetic;
pub mod array;
pub mod comparison;
pub mod data;
pub mod date;
pub mod logical;
pub mod misc;
pub mod string;

use serde_json::Value;

use crate::error::EvalError;
use crate::eval_ctx::EvalCtx;
use crate::types::{JsValue, OperatorDefinition};

/// Every built-in operator.
pub fn all_operators() -> Vec<OperatorDefinition> {
    let mut ops = Vec::new();
    ops.extend(logical::operators());
    ops.extend(comparison::operators());
    ops.extend(arithmetic::operators());
    ops.extend(data::operators());
    ops.extend(array::operators());
    ops.extend(string::operators());
    ops.extend(misc::operators());
    ops.extend(date::operators());
    ops
}

/// Evaluates all operands eagerly.
pub(crate) fn eval_args(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<Vec<JsValue>, EvalError> {
    crate::evaluate::evaluate_all(operands, ctx)
}

/// Argument `i`, or `undefined` when absent.
pub(crate) fn nth(args: &[JsValue], i: usize) -> JsValue {
    args.get(i).cloned().unwrap_or(JsValue::Undefined)
}
