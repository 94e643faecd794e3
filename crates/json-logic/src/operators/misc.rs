use serde_json::Value;

use super::{eval_args, nth};
use crate::error::EvalError;
use crate::eval_ctx::EvalCtx;
use crate::types::{Arity, JsValue, OperatorDefinition};

/// `log(value)` emits the value at info level and returns it unchanged.
fn log_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    let value = nth(&eval_args(operands, ctx)?, 0);
    tracing::info!(target: "json_logic::log", value = %value, "log");
    Ok(value)
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![OperatorDefinition::builtin("log", &[], Arity::Fixed(1), log_eval)]
}

#[cfg(test)]
mod tests {
    use crate::{Evaluator, JsValue};
    use serde_json::json;

    #[test]
    fn test_log_passes_value_through() {
        let result = Evaluator::with_builtins().apply(&json!({"log": "apple"}), &json!(null)).unwrap();
        assert_eq!(result, JsValue::from("apple"));
    }
}
