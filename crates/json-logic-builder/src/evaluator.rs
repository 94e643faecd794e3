use json_logic::{EvalError, Evaluator, JsValue, OperatorDefinition};
use serde_json::Value;

/// The rule evaluator as the builder sees it.
///
/// The builder only shapes documents; computing results is delegated
/// through this trait. Any document the mutation engine produces must be
/// accepted by `apply` without a structural error.
pub trait ExpressionEvaluator {
    fn apply(&self, logic: &Value, data: &Value) -> Result<JsValue, EvalError>;

    /// Extends the vocabulary of this evaluator only.
    fn register_operation(&mut self, def: OperatorDefinition);
}

impl ExpressionEvaluator for Evaluator {
    fn apply(&self, logic: &Value, data: &Value) -> Result<JsValue, EvalError> {
        Evaluator::apply(self, logic, data)
    }

    fn register_operation(&mut self, def: OperatorDefinition) {
        Evaluator::register_operation(self, def)
    }
}
