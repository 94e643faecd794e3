//! User-defined operations.
//!
//! A custom operation is either a host callable or a JsonLogic expression
//! body. Expression bodies are evaluated with `{"args": [...]}` as their data,
//! so `{"var": "args.0"}` reads the first argument.
//!
//! Both kinds run with the full privileges of the evaluator. Nothing here
//! sandboxes them; a body that calls itself recurses without bound.

use std::fmt;

use json_logic::{evaluate, Arity, CustomFn, EvalCtx, EvalError, JsValue, OperatorDefinition, OperatorRegistry};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::catalog::{Category, Operation, OperationCatalog};
use crate::document::{Node, VAR};
use crate::error::{BuilderError, Result};

/// Declarative form of a custom operation, as written in configuration
/// files and session scripts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomOperationConfig {
    pub id: String,
    pub description: String,
    /// Expression body, or a string holding its JSON text.
    pub body: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arity: Option<usize>,
}

#[derive(Clone)]
pub enum CustomBody {
    Native(CustomFn),
    Expression(Value),
}

impl fmt::Debug for CustomBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomBody::Native(_) => f.write_str("Native(..)"),
            CustomBody::Expression(body) => f.debug_tuple("Expression").field(body).finish(),
        }
    }
}

/// A validated custom operation, ready to register.
#[derive(Debug, Clone)]
pub struct CustomOperation {
    id: String,
    description: String,
    arity: Arity,
    body: CustomBody,
}

fn invalid(message: impl Into<String>) -> BuilderError {
    BuilderError::InvalidCustomOperation(message.into())
}

/// Ids of the default palette and of the evaluator's built-in operators.
fn is_builtin(id: &str) -> bool {
    OperationCatalog::default().contains(id) || OperatorRegistry::with_builtins().contains(id)
}

fn validate_header(id: &str, description: &str) -> Result<(String, String)> {
    let id = id.trim();
    let description = description.trim();
    if id.is_empty() {
        return Err(invalid("operation id is required"));
    }
    if description.is_empty() {
        return Err(invalid("description is required"));
    }
    if id == VAR || is_builtin(id) {
        return Err(invalid(format!("\"{id}\" is a built-in operation")));
    }
    Ok((id.to_string(), description.to_string()))
}

impl CustomOperation {
    /// Wraps a host callable.
    pub fn native<F>(id: &str, description: &str, arity: Arity, f: F) -> Result<Self>
    where
        F: Fn(&[JsValue], &EvalCtx<'_>) -> std::result::Result<JsValue, EvalError> + Send + Sync + 'static,
    {
        let (id, description) = validate_header(id, description)?;
        Ok(CustomOperation {
            id,
            description,
            arity,
            body: CustomBody::Native(std::sync::Arc::new(f)),
        })
    }

    /// Builds an operation whose body is an expression.
    ///
    /// The body must be an operation node.
    pub fn from_expression(id: &str, description: &str, body: Value, arity: Arity) -> Result<Self> {
        let (id, description) = validate_header(id, description)?;
        if !Node::classify(&body).is_operation() {
            return Err(invalid("body must be a single operation"));
        }
        Ok(CustomOperation {
            id,
            description,
            arity,
            body: CustomBody::Expression(body),
        })
    }

    /// Builds an operation from body text, as typed into a form.
    ///
    /// # Example
    ///
    /// ```
    /// use json_logic::{Arity, Evaluator, JsValue};
    /// use json_logic_builder::custom::CustomOperation;
    /// use serde_json::json;
    ///
    /// let op = CustomOperation::from_source(
    ///     "double",
    ///     "Twice the argument",
    ///     r#"{"*": [{"var": "args.0"}, 2]}"#,
    ///     Arity::Fixed(1),
    /// )
    /// .unwrap();
    /// let mut evaluator = Evaluator::with_builtins();
    /// evaluator.register_operation(op.to_definition());
    /// let result = evaluator.apply(&json!({"double": 21}), &json!(null)).unwrap();
    /// assert_eq!(result, JsValue::Json(json!(42)));
    /// ```
    pub fn from_source(id: &str, description: &str, source: &str, arity: Arity) -> Result<Self> {
        if source.trim().is_empty() {
            return Err(invalid("implementation is required"));
        }
        let body: Value = serde_json::from_str(source).map_err(|e| invalid(format!("body is not valid JSON: {e}")))?;
        Self::from_expression(id, description, body, arity)
    }

    /// Validates a declarative definition. A string body is read as JSON
    /// text.
    pub fn from_config(config: &CustomOperationConfig) -> Result<Self> {
        let arity = config.arity.map_or(Arity::Any, Arity::Fixed);
        match &config.body {
            Value::String(source) => Self::from_source(&config.id, &config.description, source, arity),
            body => Self::from_expression(&config.id, &config.description, body.clone(), arity),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn arity(&self) -> &Arity {
        &self.arity
    }

    pub fn body(&self) -> &CustomBody {
        &self.body
    }

    /// The palette entry for this operation.
    pub fn catalog_entry(&self) -> Operation {
        Operation::new(&self.id, &self.description, Category::Custom)
    }

    /// The evaluator definition for this operation.
    pub fn to_definition(&self) -> OperatorDefinition {
        match &self.body {
            CustomBody::Native(f) => {
                let f = f.clone();
                OperatorDefinition::custom(&self.id, self.arity.clone(), move |args, ctx| f(args, ctx))
            }
            CustomBody::Expression(body) => {
                let body = body.clone();
                OperatorDefinition::custom(&self.id, self.arity.clone(), move |args, ctx| {
                    let mut scope = Map::new();
                    scope.insert(
                        "args".to_string(),
                        Value::Array(args.iter().cloned().map(JsValue::into_json).collect()),
                    );
                    let scope = Value::Object(scope);
                    evaluate(&body, &ctx.scoped(&scope))
                })
            }
        }
    }
}
