//! Where a dropped operation goes and what it starts out holding.

use json_logic_path::{resolve, Path};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::document;
use crate::error::{BuilderError, Result};
use crate::mutation::{insert_into_sequence, set_value_at, RootPolicy};

/// Default-shape class of an operation id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorClass {
    /// `and`, `or`: start with no operands.
    VariadicBoolean,
    /// Comparisons and `if`: two empty-string operands.
    Comparison,
    /// `+ - * / %`: two zero operands.
    Arithmetic,
    /// `var`, `missing`, `cat`: an empty-string payload.
    ScalarAccessor,
    /// Everything else, custom operations included.
    Unclassified,
}

impl OperatorClass {
    pub fn of(id: &str) -> Self {
        match id {
            "and" | "or" => OperatorClass::VariadicBoolean,
            "if" | ">" | ">=" | "<" | "<=" | "==" | "===" | "!=" | "!==" => OperatorClass::Comparison,
            "+" | "-" | "*" | "/" | "%" => OperatorClass::Arithmetic,
            "var" | "missing" | "cat" => OperatorClass::ScalarAccessor,
            _ => OperatorClass::Unclassified,
        }
    }

    pub fn default_payload(self) -> Value {
        match self {
            OperatorClass::VariadicBoolean => json!([]),
            OperatorClass::Comparison => json!(["", ""]),
            OperatorClass::Arithmetic => json!([0, 0]),
            OperatorClass::ScalarAccessor | OperatorClass::Unclassified => json!(""),
        }
    }
}

/// `{op_id: default payload}`.
///
/// # Example
///
/// ```
/// use json_logic_builder::placement::default_node;
/// use serde_json::json;
///
/// assert_eq!(default_node("and"), json!({"and": []}));
/// assert_eq!(default_node("+"), json!({"+": [0, 0]}));
/// assert_eq!(default_node("var"), json!({"var": ""}));
/// ```
pub fn default_node(op_id: &str) -> Value {
    let mut node = Map::new();
    node.insert(op_id.to_string(), OperatorClass::of(op_id).default_payload());
    Value::Object(node)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropTargetKind {
    /// The builder area itself.
    Root,
    /// The operand sequence at this path.
    Slot(Path),
}

/// Render-time descriptor of a drop location.
///
/// Whether a location accepts drops is decided when it is rendered and
/// carried here; placement does not re-derive it from the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropTarget {
    pub kind: DropTargetKind,
    #[serde(default = "accepts_by_default")]
    pub accepts_drop: bool,
}

fn accepts_by_default() -> bool {
    true
}

impl DropTarget {
    pub fn root() -> Self {
        DropTarget {
            kind: DropTargetKind::Root,
            accepts_drop: true,
        }
    }

    pub fn slot(path: Path) -> Self {
        DropTarget {
            kind: DropTargetKind::Slot(path),
            accepts_drop: true,
        }
    }

    /// The same location, marked as not accepting drops.
    pub fn rejecting(mut self) -> Self {
        self.accepts_drop = false;
        self
    }

    fn describe(&self) -> String {
        match &self.kind {
            DropTargetKind::Root => "root".to_string(),
            DropTargetKind::Slot(path) => path.to_string(),
        }
    }
}

/// Places a new `op_id` node at `target`.
///
/// On the empty root the node becomes the root operation. On a slot holding
/// an operand sequence it is appended as the last operand. Every other
/// target is rejected with [`BuilderError::InvalidDropTarget`].
pub fn place_operation(doc: &Value, op_id: &str, target: &DropTarget) -> Result<Value> {
    if !target.accepts_drop {
        return Err(BuilderError::InvalidDropTarget(target.describe()));
    }
    let node = default_node(op_id);
    match &target.kind {
        DropTargetKind::Root if document::is_empty(doc) => set_value_at(doc, &Path::root(), node, RootPolicy::Locked),
        DropTargetKind::Root => Err(BuilderError::InvalidDropTarget(target.describe())),
        DropTargetKind::Slot(path) => match resolve(doc, path).map_err(BuilderError::from_path(path))? {
            Value::Array(_) => insert_into_sequence(doc, path, node, None),
            _ => Err(BuilderError::InvalidDropTarget(target.describe())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use json_logic_path::path;

    #[test]
    fn test_class_table() {
        assert_eq!(OperatorClass::of("or"), OperatorClass::VariadicBoolean);
        assert_eq!(OperatorClass::of("if"), OperatorClass::Comparison);
        assert_eq!(OperatorClass::of("!=="), OperatorClass::Comparison);
        assert_eq!(OperatorClass::of("%"), OperatorClass::Arithmetic);
        assert_eq!(OperatorClass::of("cat"), OperatorClass::ScalarAccessor);
        assert_eq!(OperatorClass::of("afterDate"), OperatorClass::Unclassified);
        assert_eq!(OperatorClass::of("min"), OperatorClass::Unclassified);
    }

    #[test]
    fn test_default_payloads() {
        assert_eq!(default_node("=="), json!({"==": ["", ""]}));
        assert_eq!(default_node("missing"), json!({"missing": ""}));
        assert_eq!(default_node("myOp"), json!({"myOp": ""}));
    }

    #[test]
    fn test_drop_on_empty_root() {
        let doc = place_operation(&document::empty(), "or", &DropTarget::root()).unwrap();
        assert_eq!(doc, json!({"or": []}));
    }

    #[test]
    fn test_drop_on_built_root_is_rejected() {
        let doc = json!({"or": []});
        assert!(matches!(
            place_operation(&doc, "and", &DropTarget::root()),
            Err(BuilderError::InvalidDropTarget(_))
        ));
    }

    #[test]
    fn test_drop_into_sequence_appends() {
        let doc = json!({"or": [true]});
        let next = place_operation(&doc, ">", &DropTarget::slot(path!["or"])).unwrap();
        assert_eq!(next, json!({"or": [true, {">": ["", ""]}]}));
    }

    #[test]
    fn test_drop_on_scalar_or_rejecting_target() {
        let doc = json!({"var": "x"});
        assert!(matches!(
            place_operation(&doc, "and", &DropTarget::slot(path!["var"])),
            Err(BuilderError::InvalidDropTarget(_))
        ));
        let doc = json!({"or": []});
        assert!(matches!(
            place_operation(&doc, "and", &DropTarget::slot(path!["or"]).rejecting()),
            Err(BuilderError::InvalidDropTarget(_))
        ));
    }

    #[test]
    fn test_drop_target_serde() {
        let target: DropTarget = serde_json::from_value(json!({"kind": {"slot": ["or", 0, ">"]}})).unwrap();
        assert_eq!(target, DropTarget::slot(path!["or", 0, ">"]));
        let root: DropTarget = serde_json::from_value(json!({"kind": "root"})).unwrap();
        assert_eq!(root, DropTarget::root());
    }
}
