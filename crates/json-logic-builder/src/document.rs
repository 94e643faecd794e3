//! The expression document and its structural vocabulary.
//!
//! A document is plain JSON. Its shape is read through [`Node::classify`],
//! which tags a value once so callers match on the tag instead of
//! re-checking "single-key object", "array" and friends at every call site.

use json_logic::util::{f64_to_json, number_to_string, to_js_string};
use json_logic::JsValue;
use json_logic_path::{Path, PathStep};
use serde_json::{Map, Value};

use crate::error::{BuilderError, Result};

/// Identifier of the variable-reference operation.
pub const VAR: &str = "var";

/// The empty document `{}`: nothing built yet.
pub fn empty() -> Value {
    Value::Object(Map::new())
}

pub fn is_empty(doc: &Value) -> bool {
    matches!(doc, Value::Object(map) if map.is_empty())
}

/// Structural reading of one value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node<'a> {
    /// `{}`.
    Empty,
    /// Single-key object other than `var`.
    Operation { id: &'a str, payload: &'a Value },
    /// Ordered operand list.
    Sequence(&'a [Value]),
    /// `{"var": payload}`.
    VariableRef { payload: &'a Value },
    /// Scalar, or an object with two or more keys.
    Literal(&'a Value),
}

impl<'a> Node<'a> {
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => Node::Sequence(items),
            Value::Object(map) if map.is_empty() => Node::Empty,
            Value::Object(map) if map.len() == 1 => match map.iter().next() {
                Some((id, payload)) if id == VAR => Node::VariableRef { payload },
                Some((id, payload)) => Node::Operation { id, payload },
                None => Node::Empty,
            },
            other => Node::Literal(other),
        }
    }

    /// True for operation nodes, variable references included.
    pub fn is_operation(&self) -> bool {
        matches!(self, Node::Operation { .. } | Node::VariableRef { .. })
    }

    /// The operation id, `"var"` for variable references.
    pub fn operation_id(&self) -> Option<&'a str> {
        match *self {
            Node::Operation { id, .. } => Some(id),
            Node::VariableRef { .. } => Some(VAR),
            _ => None,
        }
    }

    /// The variable name of a `{"var": "name"}` node.
    pub fn variable_name(&self) -> Option<&'a str> {
        match *self {
            Node::VariableRef { payload: Value::String(name) } => Some(name.as_str()),
            _ => None,
        }
    }
}

/// The root operation `(id, payload)`, if the document has exactly one key.
pub fn root_operation(doc: &Value) -> Option<(&str, &Value)> {
    match doc {
        Value::Object(map) if map.len() == 1 => map.iter().next().map(|(k, v)| (k.as_str(), v)),
        _ => None,
    }
}

/// Checks the single-root rule: a root is `{}` or a single-key object.
pub fn validate_root(doc: &Value) -> Result<()> {
    match doc {
        Value::Object(map) if map.len() <= 1 => Ok(()),
        _ => Err(BuilderError::InvalidRoot),
    }
}

/// Every address reachable from the root, in depth-first pre-order,
/// starting with the root itself.
///
/// # Example
///
/// ```
/// use json_logic_builder::document::addresses;
/// use json_logic_path::path;
/// use serde_json::json;
///
/// let doc = json!({"or": [{"var": "x"}]});
/// assert_eq!(
///     addresses(&doc),
///     vec![path![], path!["or"], path!["or", 0], path!["or", 0, "var"]]
/// );
/// ```
pub fn addresses(doc: &Value) -> Vec<Path> {
    let mut out = Vec::new();
    collect_addresses(doc, Path::root(), &mut out);
    out
}

fn collect_addresses(value: &Value, here: Path, out: &mut Vec<Path>) {
    match value {
        Value::Array(items) => {
            out.push(here.clone());
            for (i, item) in items.iter().enumerate() {
                collect_addresses(item, here.child(i), out);
            }
        }
        Value::Object(map) => {
            out.push(here.clone());
            for (key, item) in map {
                collect_addresses(item, here.child(PathStep::Key(key.clone())), out);
            }
        }
        _ => out.push(here),
    }
}

/// Canonical text form: JSON with 2-space indentation.
pub fn to_pretty_json(doc: &Value) -> String {
    serde_json::to_string_pretty(doc).unwrap_or_else(|_| doc.to_string())
}

/// True for string, number, boolean and null.
pub fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

/// `String(value)` for a scalar, as a variable name is written.
pub fn scalar_to_string(value: &Value) -> String {
    to_js_string(&JsValue::Json(value.clone()))
}

/// Reads field text back into a scalar; the inverse of [`scalar_to_string`].
///
/// `"true"`, `"false"` and `"null"` become their literals, text that is the
/// canonical rendering of a finite number becomes that number, and anything
/// else (including `""`) stays a string.
///
/// # Example
///
/// ```
/// use json_logic_builder::document::coerce_scalar;
/// use serde_json::json;
///
/// assert_eq!(coerce_scalar("10"), json!(10));
/// assert_eq!(coerce_scalar("2.5"), json!(2.5));
/// assert_eq!(coerce_scalar("false"), json!(false));
/// assert_eq!(coerce_scalar("010"), json!("010"));
/// assert_eq!(coerce_scalar(""), json!(""));
/// ```
pub fn coerce_scalar(text: &str) -> Value {
    match text {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" => return Value::Null,
        _ => {}
    }
    match text.parse::<f64>() {
        Ok(n) if n.is_finite() && number_to_string(n) == text => f64_to_json(n),
        _ => Value::String(text.to_string()),
    }
}
