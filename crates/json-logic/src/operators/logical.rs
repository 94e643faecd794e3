//! Logic operators: `if`, `and`, `or`, `!`, `!!`.

use serde_json::Value;

use crate::error::EvalError;
use crate::eval_ctx::EvalCtx;
use crate::evaluate::evaluate;
use crate::types::{Arity, JsValue, OperatorDefinition};
use crate::util;

/// `if` with any number of condition/branch pairs and an optional trailing
/// else. Only the chosen branch is evaluated.
fn if_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    let mut i = 0;
    while i + 1 < operands.len() {
        if util::is_truthy(&evaluate(&operands[i], ctx)?) {
            return evaluate(&operands[i + 1], ctx);
        }
        i += 2;
    }
    if i + 1 == operands.len() {
        return evaluate(&operands[i], ctx);
    }
    Ok(JsValue::Json(Value::Null))
}

fn and_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    let mut current = JsValue::Undefined;
    for operand in operands {
        current = evaluate(operand, ctx)?;
        if !util::is_truthy(&current) {
            return Ok(current);
        }
    }
    Ok(current)
}

fn or_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    let mut current = JsValue::Undefined;
    for operand in operands {
        current = evaluate(operand, ctx)?;
        if util::is_truthy(&current) {
            return Ok(current);
        }
    }
    Ok(current)
}

fn first(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    crate::evaluate::evaluate_opt(operands.first(), ctx)
}

fn not_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    Ok(JsValue::from(!util::is_truthy(&first(operands, ctx)?)))
}

fn double_not_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    Ok(JsValue::from(util::is_truthy(&first(operands, ctx)?)))
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![
        OperatorDefinition::builtin("if", &["?:"], Arity::Range(1, None), if_eval),
        OperatorDefinition::builtin("and", &[], Arity::Range(1, None), and_eval),
        OperatorDefinition::builtin("or", &[], Arity::Range(1, None), or_eval),
        OperatorDefinition::builtin("!", &[], Arity::Fixed(1), not_eval),
        OperatorDefinition::builtin("!!", &[], Arity::Fixed(1), double_not_eval),
    ]
}
