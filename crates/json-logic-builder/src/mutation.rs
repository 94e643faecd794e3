//! Path-addressed edits over expression documents.
//!
//! Every function takes the current document by reference and returns a new
//! one. The input is never touched: an edit either produces a complete new
//! document or fails with nothing changed.

use json_logic_path::{resolve, resolve_mut, resolve_parent, resolve_parent_mut, Path, PathStep};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::{self, coerce_scalar, is_scalar, scalar_to_string, Node, VAR};
use crate::error::{BuilderError, Result};

/// Whether the root operation may be replaced or removed.
///
/// A capability of the caller, not a property of the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootPolicy {
    #[default]
    Locked,
    Deletable,
}

/// True when `path` addresses the root node or the root operation's key.
fn addresses_root(doc: &Value, path: &Path) -> bool {
    match path.steps() {
        [] => true,
        [PathStep::Key(key)] => matches!(document::root_operation(doc), Some((id, _)) if id == key),
        _ => false,
    }
}

fn require_deletable(policy: RootPolicy) -> Result<()> {
    match policy {
        RootPolicy::Deletable => Ok(()),
        RootPolicy::Locked => Err(BuilderError::RootLocked),
    }
}

fn replace_child(container: &mut Value, step: &PathStep, value: Value) {
    match container {
        Value::Array(items) => {
            if let Some(slot) = step.as_index().and_then(|i| items.get_mut(i)) {
                *slot = value;
            }
        }
        Value::Object(map) => {
            if let Some(slot) = step.as_key().and_then(|k| map.get_mut(k)) {
                *slot = value;
            }
        }
        _ => {}
    }
}

/// Replaces the value at `path`.
///
/// Only existing keys and in-bounds slots are replaced, so no edit can add a
/// second root key. Replacing the root itself is allowed on the empty
/// document; replacing a built root needs [`RootPolicy::Deletable`]. A new
/// root must itself be `{}` or a single-key object.
///
/// # Example
///
/// ```
/// use json_logic_builder::mutation::{set_value_at, RootPolicy};
/// use json_logic_path::path;
/// use serde_json::json;
///
/// let doc = json!({"or": [{">": ["", ""]}]});
/// let next = set_value_at(&doc, &path!["or", 0, ">", 1], json!(5), RootPolicy::Locked).unwrap();
/// assert_eq!(next, json!({"or": [{">": ["", 5]}]}));
/// assert_eq!(doc, json!({"or": [{">": ["", ""]}]}));
/// ```
pub fn set_value_at(doc: &Value, path: &Path, new_value: Value, policy: RootPolicy) -> Result<Value> {
    if path.is_root() {
        if !document::is_empty(doc) {
            require_deletable(policy)?;
        }
        document::validate_root(&new_value)?;
        return Ok(new_value);
    }
    let mut next = doc.clone();
    let (container, last) = resolve_parent_mut(&mut next, path).map_err(BuilderError::from_path(path))?;
    replace_child(container, last, new_value);
    Ok(next)
}

fn sequence_mut<'a>(doc: &'a mut Value, path: &Path) -> Result<&'a mut Vec<Value>> {
    match resolve_mut(doc, path).map_err(BuilderError::from_path(path))? {
        Value::Array(items) => Ok(items),
        _ => Err(BuilderError::NotASequence(path.clone())),
    }
}

/// Inserts `item` into the operand sequence at `path`; `None` appends.
pub fn insert_into_sequence(doc: &Value, path: &Path, item: Value, index: Option<usize>) -> Result<Value> {
    let mut next = doc.clone();
    let items = sequence_mut(&mut next, path)?;
    let len = items.len();
    let at = index.unwrap_or(len);
    if at > len {
        return Err(BuilderError::InvalidIndex { index: at, len });
    }
    items.insert(at, item);
    Ok(next)
}

/// Removes element `index` of the operand sequence at `path`.
pub fn remove_from_sequence(doc: &Value, path: &Path, index: usize) -> Result<Value> {
    let mut next = doc.clone();
    let items = sequence_mut(&mut next, path)?;
    if index >= items.len() {
        return Err(BuilderError::InvalidIndex { index, len: items.len() });
    }
    items.remove(index);
    Ok(next)
}

/// The "add value" action: appends an empty-string placeholder operand.
pub fn add_placeholder(doc: &Value, path: &Path) -> Result<Value> {
    insert_into_sequence(doc, path, Value::String(String::new()), None)
}

/// Removes the subtree at `path`.
///
/// - an element of a sequence is spliced out;
/// - the root, or the root operation's key, resets the document to `{}`
///   (needs [`RootPolicy::Deletable`]);
/// - the payload of an operation that sits in a sequence removes that whole
///   operation from the sequence;
/// - a key of a literal object with three or more keys is dropped (one
///   with two keys would be left reading as an operation).
///
/// Anything else is [`BuilderError::NotRemovable`].
pub fn remove_at_path(doc: &Value, path: &Path, policy: RootPolicy) -> Result<Value> {
    if addresses_root(doc, path) {
        resolve(doc, path).map_err(BuilderError::from_path(path))?;
        require_deletable(policy)?;
        return Ok(document::empty());
    }
    let (container, last) = resolve_parent(doc, path).map_err(BuilderError::from_path(path))?;
    match Node::classify(container) {
        Node::Sequence(_) => {
            let (parent, _) = path.split_last().map_err(BuilderError::from_path(path))?;
            let index = last.as_index().ok_or_else(|| BuilderError::PathNotFound(path.clone()))?;
            remove_from_sequence(doc, &parent, index)
        }
        Node::Operation { .. } | Node::VariableRef { .. } => {
            let (operation_path, _) = path.split_last().map_err(BuilderError::from_path(path))?;
            let (outer, outer_last) =
                resolve_parent(doc, &operation_path).map_err(|_| BuilderError::NotRemovable(path.clone()))?;
            match (outer, outer_last.as_index()) {
                (Value::Array(_), Some(index)) => {
                    let (sequence_path, _) = operation_path.split_last().map_err(BuilderError::from_path(path))?;
                    remove_from_sequence(doc, &sequence_path, index)
                }
                _ => Err(BuilderError::NotRemovable(path.clone())),
            }
        }
        Node::Literal(Value::Object(map)) if map.len() > 2 => {
            let mut next = doc.clone();
            let (container, last) =
                resolve_parent_mut(&mut next, path).map_err(BuilderError::from_path(path))?;
            if let (Value::Object(map), Some(key)) = (container, last.as_key()) {
                map.shift_remove(key);
            }
            Ok(next)
        }
        _ => Err(BuilderError::NotRemovable(path.clone())),
    }
}

/// Swaps the slot at `path` between a literal and a variable reference.
///
/// A scalar `v` becomes `{"var": String(v)}`; a `{"var": name}` node becomes
/// the literal its name reads as (see [`coerce_scalar`]), so toggling twice
/// restores the slot. Sibling slots are untouched.
///
/// # Example
///
/// ```
/// use json_logic_builder::mutation::{toggle_variable_wrapper, RootPolicy};
/// use json_logic_path::path;
/// use serde_json::json;
///
/// let doc = json!({"==": [10, "x"]});
/// let wrapped = toggle_variable_wrapper(&doc, &path!["==", 0], RootPolicy::Locked).unwrap();
/// assert_eq!(wrapped, json!({"==": [{"var": "10"}, "x"]}));
/// let unwrapped = toggle_variable_wrapper(&wrapped, &path!["==", 0], RootPolicy::Locked).unwrap();
/// assert_eq!(unwrapped, doc);
/// ```
pub fn toggle_variable_wrapper(doc: &Value, path: &Path, policy: RootPolicy) -> Result<Value> {
    let current = resolve(doc, path).map_err(BuilderError::from_path(path))?;
    let replacement = match Node::classify(current) {
        Node::VariableRef { payload: Value::String(name) } => coerce_scalar(name),
        Node::VariableRef { payload } if is_scalar(payload) => payload.clone(),
        Node::Literal(value) if is_scalar(value) => {
            let mut wrapper = Map::new();
            wrapper.insert(VAR.to_string(), Value::String(scalar_to_string(value)));
            Value::Object(wrapper)
        }
        _ => return Err(BuilderError::NotToggleable(path.clone())),
    };
    set_value_at(doc, path, replacement, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use json_logic_path::path;
    use serde_json::json;

    #[test]
    fn test_set_value_leaves_input_untouched() {
        let doc = json!({"and": [1, 2]});
        let next = set_value_at(&doc, &path!["and", 1], json!({"var": "x"}), RootPolicy::Locked).unwrap();
        assert_eq!(next, json!({"and": [1, {"var": "x"}]}));
        assert_eq!(doc, json!({"and": [1, 2]}));
    }

    #[test]
    fn test_set_value_stale_path() {
        let doc = json!({"and": [1]});
        let err = set_value_at(&doc, &path!["and", 3], json!(0), RootPolicy::Locked).unwrap_err();
        assert!(matches!(err, BuilderError::PathNotFound(p) if p == path!["and", 3]));
        let err = set_value_at(&doc, &path!["or"], json!(0), RootPolicy::Locked).unwrap_err();
        assert!(matches!(err, BuilderError::PathNotFound(_)));
    }

    #[test]
    fn test_set_root_rules() {
        let empty = document::empty();
        assert_eq!(
            set_value_at(&empty, &Path::root(), json!({"or": []}), RootPolicy::Locked).unwrap(),
            json!({"or": []})
        );
        let built = json!({"or": []});
        assert!(matches!(
            set_value_at(&built, &Path::root(), json!({"and": []}), RootPolicy::Locked),
            Err(BuilderError::RootLocked)
        ));
        assert_eq!(
            set_value_at(&built, &Path::root(), json!({"and": []}), RootPolicy::Deletable).unwrap(),
            json!({"and": []})
        );
        assert!(matches!(
            set_value_at(&empty, &Path::root(), json!({"a": 1, "b": 2}), RootPolicy::Locked),
            Err(BuilderError::InvalidRoot)
        ));
    }

    #[test]
    fn test_set_root_payload_is_an_ordinary_edit() {
        let doc = json!({"or": [1]});
        let next = set_value_at(&doc, &path!["or"], json!([1, 2]), RootPolicy::Locked).unwrap();
        assert_eq!(next, json!({"or": [1, 2]}));
    }

    #[test]
    fn test_insert_into_sequence() {
        let doc = json!({"or": [1, 3]});
        assert_eq!(insert_into_sequence(&doc, &path!["or"], json!(2), Some(1)).unwrap(), json!({"or": [1, 2, 3]}));
        assert_eq!(insert_into_sequence(&doc, &path!["or"], json!(4), None).unwrap(), json!({"or": [1, 3, 4]}));
        assert!(matches!(
            insert_into_sequence(&doc, &path!["or"], json!(4), Some(3)),
            Err(BuilderError::InvalidIndex { index: 3, len: 2 })
        ));
        assert!(matches!(
            insert_into_sequence(&doc, &path!["or", 0], json!(4), None),
            Err(BuilderError::NotASequence(_))
        ));
    }

    #[test]
    fn test_remove_from_sequence() {
        let doc = json!({"or": [1, 2]});
        assert_eq!(remove_from_sequence(&doc, &path!["or"], 0).unwrap(), json!({"or": [2]}));
        assert!(matches!(
            remove_from_sequence(&doc, &path!["or"], 2),
            Err(BuilderError::InvalidIndex { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_add_placeholder() {
        let doc = json!({"cat": ["a"]});
        assert_eq!(add_placeholder(&doc, &path!["cat"]).unwrap(), json!({"cat": ["a", ""]}));
    }

    #[test]
    fn test_remove_root() {
        let doc = json!({"or": [1]});
        assert!(matches!(remove_at_path(&doc, &path!["or"], RootPolicy::Locked), Err(BuilderError::RootLocked)));
        assert_eq!(remove_at_path(&doc, &path!["or"], RootPolicy::Deletable).unwrap(), json!({}));
        assert_eq!(remove_at_path(&doc, &Path::root(), RootPolicy::Deletable).unwrap(), json!({}));
    }

    #[test]
    fn test_remove_operation_payload_removes_operation() {
        let doc = json!({"or": [{">": [1, 2]}, true]});
        assert_eq!(
            remove_at_path(&doc, &path!["or", 0, ">"], RootPolicy::Locked).unwrap(),
            json!({"or": [true]})
        );
        assert_eq!(remove_at_path(&doc, &path!["or", 1], RootPolicy::Locked).unwrap(), json!({"or": [{">": [1, 2]}]}));
    }

    #[test]
    fn test_remove_literal_object_key() {
        let doc = json!({"==": [{"a": 1, "b": 2, "c": 3}, 3]});
        let next = remove_at_path(&doc, &path!["==", 0, "a"], RootPolicy::Locked).unwrap();
        assert_eq!(next, json!({"==": [{"b": 2, "c": 3}, 3]}));
        assert!(json_logic::Evaluator::with_builtins().apply(&next, &json!({})).is_ok());
    }

    #[test]
    fn test_remove_key_of_two_key_literal_is_rejected() {
        let doc = json!({"==": ["", 3]});
        let doc = set_value_at(&doc, &path!["==", 0], json!({"a": 1, "b": 2}), RootPolicy::Locked).unwrap();
        let evaluator = json_logic::Evaluator::with_builtins();
        assert!(evaluator.apply(&doc, &json!({})).is_ok());
        assert!(matches!(
            remove_at_path(&doc, &path!["==", 0, "a"], RootPolicy::Locked),
            Err(BuilderError::NotRemovable(p)) if p == path!["==", 0, "a"]
        ));
    }

    #[test]
    fn test_remove_nested_payload_outside_sequence_is_rejected() {
        let doc = json!({"!": {"var": "x"}});
        assert!(matches!(
            remove_at_path(&doc, &path!["!", "var"], RootPolicy::Deletable),
            Err(BuilderError::NotRemovable(_))
        ));
    }

    #[test]
    fn test_toggle_round_trip() {
        let doc = json!({"and": [true, null, 2.5, "name"]});
        for i in 0..4 {
            let p = path!["and", i];
            let wrapped = toggle_variable_wrapper(&doc, &p, RootPolicy::Locked).unwrap();
            assert!(Node::classify(resolve(&wrapped, &p).unwrap()).variable_name().is_some());
            assert_eq!(toggle_variable_wrapper(&wrapped, &p, RootPolicy::Locked).unwrap(), doc);
        }
    }

    #[test]
    fn test_toggle_rejections() {
        let doc = json!({"and": [[1], {"or": []}, {"var": ["a", 0]}]});
        for i in 0..3 {
            assert!(matches!(
                toggle_variable_wrapper(&doc, &path!["and", i], RootPolicy::Deletable),
                Err(BuilderError::NotToggleable(_))
            ));
        }
        let root_var = json!({"var": "x"});
        assert!(matches!(
            toggle_variable_wrapper(&root_var, &Path::root(), RootPolicy::Locked),
            Err(BuilderError::RootLocked)
        ));
        assert!(matches!(
            toggle_variable_wrapper(&root_var, &Path::root(), RootPolicy::Deletable),
            Err(BuilderError::InvalidRoot)
        ));
    }
}
