//! Comparison operators.

use serde_json::Value;

use super::{eval_args, nth};
use crate::error::EvalError;
use crate::eval_ctx::EvalCtx;
use crate::types::{Arity, JsValue, OperatorDefinition};
use crate::util;

fn binary(
    operands: &[Value],
    ctx: &EvalCtx<'_>,
    cmp: fn(&JsValue, &JsValue) -> bool,
) -> Result<JsValue, EvalError> {
    let args = eval_args(operands, ctx)?;
    Ok(JsValue::from(cmp(&nth(&args, 0), &nth(&args, 1))))
}

/// Two operands compare directly; three operands test `a op b op c`.
fn between(
    operands: &[Value],
    ctx: &EvalCtx<'_>,
    cmp: fn(&JsValue, &JsValue) -> bool,
) -> Result<JsValue, EvalError> {
    let args = eval_args(operands, ctx)?;
    let (a, b) = (nth(&args, 0), nth(&args, 1));
    if args.len() >= 3 {
        let c = nth(&args, 2);
        return Ok(JsValue::from(cmp(&a, &b) && cmp(&b, &c)));
    }
    Ok(JsValue::from(cmp(&a, &b)))
}

fn eq_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    binary(operands, ctx, util::loose_equals)
}

fn strict_eq_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    binary(operands, ctx, util::strict_equals)
}

fn ne_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    binary(operands, ctx, |a, b| !util::loose_equals(a, b))
}

fn strict_ne_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    binary(operands, ctx, |a, b| !util::strict_equals(a, b))
}

fn gt_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    binary(operands, ctx, util::js_gt)
}

fn gte_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    binary(operands, ctx, util::js_gte)
}

fn lt_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    between(operands, ctx, util::js_lt)
}

fn lte_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    between(operands, ctx, util::js_lte)
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![
        OperatorDefinition::builtin("==", &[], Arity::Fixed(2), eq_eval),
        OperatorDefinition::builtin("===", &[], Arity::Fixed(2), strict_eq_eval),
        OperatorDefinition::builtin("!=", &[], Arity::Fixed(2), ne_eval),
        OperatorDefinition::builtin("!==", &[], Arity::Fixed(2), strict_ne_eval),
        OperatorDefinition::builtin(">", &[], Arity::Fixed(2), gt_eval),
        OperatorDefinition::builtin(">=", &[], Arity::Fixed(2), gte_eval),
        OperatorDefinition::builtin("<", &[], Arity::Range(2, Some(3)), lt_eval),
        OperatorDefinition::builtin("<=", &[], Arity::Range(2, Some(3)), lte_eval),
    ]
}

#[cfg(test)]
mod tests {
    use crate::{Evaluator, JsValue};
    use serde_json::{json, Value};

    fn check(logic: Value, expected: bool) {
        let result = Evaluator::with_builtins().apply(&logic, &json!(null)).unwrap();
        assert_eq!(result, JsValue::from(expected), "{logic}");
    }

    #[test]
    fn test_equality() {
        check(json!({"==": [1, "1"]}), true);
        check(json!({"===": [1, "1"]}), false);
        check(json!({"!=": [1, 2]}), true);
        check(json!({"!==": [1, 1]}), false);
        check(json!({"==": [null, {"var": "nope"}]}), true);
    }

    #[test]
    fn test_ordering() {
        check(json!({">": [2, 1]}), true);
        check(json!({">=": [1, 1]}), true);
        check(json!({"<": [1, 2]}), true);
        check(json!({"<=": [2, 2]}), true);
        check(json!({">": ["b", "a"]}), true);
    }

    #[test]
    fn test_between() {
        check(json!({"<": [1, 2, 3]}), true);
        check(json!({"<": [1, 1, 3]}), false);
        check(json!({"<=": [1, 1, 3]}), true);
        check(json!({"<=": [1, 4, 3]}), false);
    }
}
