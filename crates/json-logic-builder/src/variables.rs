//! Variable references used by a document.

use indexmap::IndexSet;
use json_logic::JsValue;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::document::{Node, VAR};
use crate::evaluator::ExpressionEvaluator;

/// Names of every `{"var": "name"}` node in `doc`.
///
/// The payload of a `var` node is never walked into. Order follows first
/// appearance but is not significant.
///
/// # Example
///
/// ```
/// use json_logic_builder::variables::extract_variable_names;
/// use serde_json::json;
///
/// let doc = json!({"or": [{">": [{"var": "x"}, {"var": "y"}]}, {"var": "x"}]});
/// let found = extract_variable_names(&doc);
/// let names: Vec<&str> = found.iter().map(String::as_str).collect();
/// assert_eq!(names, vec!["x", "y"]);
/// ```
pub fn extract_variable_names(doc: &Value) -> IndexSet<String> {
    let mut names = IndexSet::new();
    walk(doc, &mut names);
    names
}

fn walk(value: &Value, names: &mut IndexSet<String>) {
    let node = Node::classify(value);
    if let Some(name) = node.variable_name() {
        names.insert(name.to_string());
        return;
    }
    match node {
        Node::VariableRef { .. } => {}
        Node::Sequence(items) => items.iter().for_each(|item| walk(item, names)),
        Node::Operation { payload, .. } => walk(payload, names),
        Node::Literal(Value::Object(map)) => map.values().for_each(|item| walk(item, names)),
        Node::Empty | Node::Literal(_) => {}
    }
}

/// A variable name with the value it resolves to in the test data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableBinding {
    pub name: String,
    pub value: JsValue,
}

/// Resolves each name by evaluating `{"var": name}` against `data`.
///
/// A missing key, or any evaluator failure, yields `undefined` rather than
/// an error.
pub fn resolve_variables<E: ExpressionEvaluator + ?Sized>(
    names: &IndexSet<String>,
    evaluator: &E,
    data: &Value,
) -> Vec<VariableBinding> {
    names
        .iter()
        .map(|name| {
            let mut reference = Map::new();
            reference.insert(VAR.to_string(), Value::String(name.clone()));
            let value = evaluator
                .apply(&Value::Object(reference), data)
                .unwrap_or(JsValue::Undefined);
            VariableBinding {
                name: name.clone(),
                value,
            }
        })
        .collect()
}
