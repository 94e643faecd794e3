use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::EvalError;
use crate::eval_ctx::EvalCtx;

/// Any value an expression can produce, including JavaScript `undefined`
/// (no JSON equivalent). A variable that does not resolve is `Undefined`.
#[derive(Debug, Clone, PartialEq)]
pub enum JsValue {
    /// JavaScript `undefined`.
    Undefined,
    /// Any JSON-compatible value.
    Json(Value),
}

impl JsValue {
    pub fn is_undefined(&self) -> bool {
        matches!(self, JsValue::Undefined)
    }

    /// `undefined` or `null`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, JsValue::Undefined | JsValue::Json(Value::Null))
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            JsValue::Json(v) => Some(v),
            JsValue::Undefined => None,
        }
    }

    /// Converts to JSON; `undefined` becomes `null` as in `JSON.stringify`.
    pub fn into_json(self) -> Value {
        match self {
            JsValue::Undefined => Value::Null,
            JsValue::Json(v) => v,
        }
    }
}

impl fmt::Display for JsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsValue::Undefined => f.write_str("undefined"),
            JsValue::Json(v) => write!(f, "{v}"),
        }
    }
}

impl Serialize for JsValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            JsValue::Undefined => serializer.serialize_unit(),
            JsValue::Json(v) => v.serialize(serializer),
        }
    }
}

impl From<Value> for JsValue {
    fn from(v: Value) -> Self {
        JsValue::Json(v)
    }
}

impl From<bool> for JsValue {
    fn from(b: bool) -> Self {
        JsValue::Json(Value::Bool(b))
    }
}

impl From<f64> for JsValue {
    fn from(n: f64) -> Self {
        crate::util::f64_to_jsval(n)
    }
}

impl From<String> for JsValue {
    fn from(s: String) -> Self {
        JsValue::Json(Value::String(s))
    }
}

impl From<&str> for JsValue {
    fn from(s: &str) -> Self {
        JsValue::Json(Value::String(s.to_string()))
    }
}

/// Declared operand count of an operator.
///
/// JsonLogic never rejects an operand count; arity only decides how many
/// `undefined` arguments a host callable receives when operands are missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arity {
    /// Any number of operands.
    Any,
    /// Exactly `n` operands.
    Fixed(usize),
    /// Between `min` and `max` operands. `None` for max = unlimited.
    Range(usize, Option<usize>),
}

impl Arity {
    /// Minimum number of arguments a callable with this arity expects.
    pub fn min(&self) -> usize {
        match self {
            Arity::Any => 0,
            Arity::Fixed(n) => *n,
            Arity::Range(min, _) => *min,
        }
    }

    /// Pads `args` with `undefined` up to the minimum operand count.
    pub fn pad(&self, mut args: Vec<JsValue>) -> Vec<JsValue> {
        let min = self.min();
        if args.len() < min {
            args.resize(min, JsValue::Undefined);
        }
        args
    }
}

/// A built-in operator body.
///
/// Receives the raw operand list (not yet evaluated) so short-circuiting and
/// scoped operators decide what to evaluate.
pub type EvalFn = for<'a> fn(&[Value], &EvalCtx<'a>) -> Result<JsValue, EvalError>;

/// A host-supplied operator body. Receives evaluated arguments.
///
/// Runs with the full privileges of the host process; nothing here sandboxes
/// it.
pub type CustomFn = Arc<dyn Fn(&[JsValue], &EvalCtx<'_>) -> Result<JsValue, EvalError> + Send + Sync>;

#[derive(Clone)]
pub enum Implementation {
    Builtin(EvalFn),
    Custom(CustomFn),
}

/// An operator known to the evaluator.
#[derive(Clone)]
pub struct OperatorDefinition {
    pub name: String,
    pub aliases: Vec<String>,
    pub arity: Arity,
    pub implementation: Implementation,
}

impl OperatorDefinition {
    pub fn builtin(name: &str, aliases: &[&str], arity: Arity, eval_fn: EvalFn) -> Self {
        OperatorDefinition {
            name: name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            arity,
            implementation: Implementation::Builtin(eval_fn),
        }
    }

    /// Wraps a host callable as an operator.
    ///
    /// # Example
    ///
    /// ```
    /// use json_logic::{Arity, Evaluator, JsValue, OperatorDefinition};
    /// use serde_json::json;
    ///
    /// let mut evaluator = Evaluator::with_builtins();
    /// evaluator.register_operation(OperatorDefinition::custom("twice", Arity::Fixed(1), |args, _ctx| {
    ///     Ok(JsValue::from(json_logic::util::to_number(&args[0]) * 2.0))
    /// }));
    /// let result = evaluator.apply(&json!({"twice": 21}), &json!(null)).unwrap();
    /// assert_eq!(result, JsValue::Json(json!(42)));
    /// ```
    pub fn custom<F>(name: &str, arity: Arity, f: F) -> Self
    where
        F: Fn(&[JsValue], &EvalCtx<'_>) -> Result<JsValue, EvalError> + Send + Sync + 'static,
    {
        OperatorDefinition {
            name: name.to_string(),
            aliases: Vec::new(),
            arity,
            implementation: Implementation::Custom(Arc::new(f)),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self.implementation, Implementation::Custom(_))
    }
}

impl fmt::Debug for OperatorDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorDefinition")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("arity", &self.arity)
            .field("custom", &self.is_custom())
            .finish()
    }
}
