//! The `evaluate` walk and the [`Evaluator`] facade.

use serde_json::Value;

use crate::error::EvalError;
use crate::eval_ctx::EvalCtx;
use crate::registry::OperatorRegistry;
use crate::types::{Implementation, JsValue, OperatorDefinition};

/// Evaluates a JsonLogic expression against a context.
///
/// - Arrays evaluate element-wise.
/// - An object with exactly one key is an operation `{op: operands}`. A
///   non-array operand payload is a single operand.
/// - Everything else is returned as a literal.
pub fn evaluate(expr: &Value, ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    match expr {
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(evaluate(item, ctx)?.into_json());
            }
            Ok(JsValue::Json(Value::Array(out)))
        }
        Value::Object(map) if map.len() == 1 => {
            let (op, payload) = map.iter().next().ok_or_else(|| EvalError::UnrecognizedOperation(String::new()))?;
            let def = ctx
                .registry
                .get(op)
                .ok_or_else(|| EvalError::UnrecognizedOperation(op.clone()))?;
            dispatch(def, operands(payload), ctx)
        }
        other => Ok(JsValue::Json(other.clone())),
    }
}

/// Evaluates an operand that may be absent; absent operands are `undefined`.
pub fn evaluate_opt(expr: Option<&Value>, ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    match expr {
        Some(e) => evaluate(e, ctx),
        None => Ok(JsValue::Undefined),
    }
}

/// Evaluates every operand in order.
pub fn evaluate_all(exprs: &[Value], ctx: &EvalCtx<'_>) -> Result<Vec<JsValue>, EvalError> {
    exprs.iter().map(|e| evaluate(e, ctx)).collect()
}

fn operands(payload: &Value) -> &[Value] {
    match payload {
        Value::Array(items) => items,
        single => std::slice::from_ref(single),
    }
}

fn dispatch(def: &OperatorDefinition, operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    match &def.implementation {
        Implementation::Builtin(eval_fn) => eval_fn(operands, ctx),
        Implementation::Custom(f) => {
            let args = def.arity.pad(evaluate_all(operands, ctx)?);
            f(&args, ctx)
        }
    }
}

/// A JsonLogic evaluator bound to one operator registry.
///
/// # Example
///
/// ```
/// use json_logic::{Evaluator, JsValue};
/// use serde_json::json;
///
/// let evaluator = Evaluator::with_builtins();
/// let rule = json!({">": [{"+": [1, {"var": "x"}]}, 5]});
/// let result = evaluator.apply(&rule, &json!({"x": 10})).unwrap();
/// assert_eq!(result, JsValue::from(true));
/// ```
#[derive(Debug, Clone)]
pub struct Evaluator {
    registry: OperatorRegistry,
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::with_builtins()
    }
}

impl Evaluator {
    pub fn new(registry: OperatorRegistry) -> Self {
        Evaluator { registry }
    }

    pub fn with_builtins() -> Self {
        Evaluator::new(OperatorRegistry::with_builtins())
    }

    pub fn registry(&self) -> &OperatorRegistry {
        &self.registry
    }

    /// Extends this evaluator's vocabulary. Other evaluators are unaffected.
    pub fn register_operation(&mut self, def: OperatorDefinition) {
        tracing::debug!(op = %def.name, "registering operation");
        self.registry.register_operation(def);
    }

    pub fn apply(&self, logic: &Value, data: &Value) -> Result<JsValue, EvalError> {
        let ctx = EvalCtx::new(data, &self.registry);
        evaluate(logic, &ctx)
    }
}
