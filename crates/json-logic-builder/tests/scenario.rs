use std::cell::RefCell;

use json_logic::{EvalError, Evaluator, JsValue, OperatorDefinition};
use json_logic_builder::mutation::{insert_into_sequence, remove_at_path, set_value_at};
use json_logic_builder::placement::{default_node, place_operation};
use json_logic_builder::variables::extract_variable_names;
use json_logic_builder::{
    document, BuilderConfig, BuilderController, BuilderError, DropTarget, Evaluation, ExpressionEvaluator, RootPolicy,
};
use json_logic_path::{path, Path};
use serde_json::{json, Value};

/// Delegates to the bundled evaluator and records every document it is
/// asked to apply.
#[derive(Default)]
struct RecordingEvaluator {
    inner: Evaluator,
    seen: RefCell<Vec<(Value, Value)>>,
}

impl ExpressionEvaluator for RecordingEvaluator {
    fn apply(&self, logic: &Value, data: &Value) -> Result<JsValue, EvalError> {
        self.seen.borrow_mut().push((logic.clone(), data.clone()));
        self.inner.apply(logic, data)
    }

    fn register_operation(&mut self, def: OperatorDefinition) {
        self.inner.register_operation(def);
    }
}

fn empty_session(data: Value) -> BuilderController<RecordingEvaluator> {
    let config = BuilderConfig {
        template: document::empty(),
        test_data: data,
        ..BuilderConfig::default()
    };
    BuilderController::with_evaluator(config, RecordingEvaluator::default()).unwrap()
}

#[test]
fn build_from_empty_with_engine_calls() {
    let doc = document::empty();
    let doc = place_operation(&doc, "or", &DropTarget::root()).unwrap();
    assert_eq!(doc, json!({"or": []}));
    let doc = insert_into_sequence(&doc, &path!["or"], default_node(">"), None).unwrap();
    assert_eq!(doc, json!({"or": [{">": ["", ""]}]}));
    let doc = set_value_at(
        &doc,
        &path!["or", 0, ">", 0],
        json!({"+": [1, {"var": "x"}]}),
        RootPolicy::Locked,
    )
    .unwrap();
    let doc = set_value_at(&doc, &path!["or", 0, ">", 1], json!(5), RootPolicy::Locked).unwrap();
    assert_eq!(doc, json!({"or": [{">": [{"+": [1, {"var": "x"}]}, 5]}]}));

    let names: Vec<String> = extract_variable_names(&doc).into_iter().collect();
    assert_eq!(names, vec!["x"]);
    assert_eq!(
        Evaluator::with_builtins().apply(&doc, &json!({"x": 10})).unwrap(),
        JsValue::from(true)
    );
}

#[test]
fn build_from_empty_through_controller() {
    let mut session = empty_session(json!({"x": 10}));

    session.begin_drag("or", "palette").unwrap();
    session.drop_on(&DropTarget::root()).unwrap();
    assert_eq!(session.document(), &json!({"or": []}));

    session.begin_drag(">", "palette").unwrap();
    session.drop_on(&DropTarget::slot(path!["or"])).unwrap();
    assert_eq!(session.document(), &json!({"or": [{">": ["", ""]}]}));

    session.begin_drag("+", "palette").unwrap();
    session.drop_on(&DropTarget::slot(path!["or", 0, ">"])).unwrap();
    session.remove_item(&path!["or", 0, ">"], 0).unwrap();
    session.remove_item(&path!["or", 0, ">"], 0).unwrap();
    assert_eq!(session.document(), &json!({"or": [{">": [{"+": [0, 0]}]}]}));
    session.add_value(&path!["or", 0, ">"]).unwrap();
    session.edit_value(&path!["or", 0, ">", 1], "5").unwrap();
    session.edit_value(&path!["or", 0, ">", 0, "+", 0], "1").unwrap();
    session.edit_value(&path!["or", 0, ">", 0, "+", 1], "x").unwrap();
    session.toggle_variable(&path!["or", 0, ">", 0, "+", 1]).unwrap();

    let expected = json!({"or": [{">": [{"+": [1, {"var": "x"}]}, 5]}]});
    assert_eq!(session.document(), &expected);
    assert_eq!(session.variables().len(), 1);
    assert_eq!(session.variables()[0].name, "x");
    assert_eq!(session.variables()[0].value, JsValue::Json(json!(10)));
    assert_eq!(session.result(), &Evaluation::Value(JsValue::from(true)));

    let seen = session.evaluator().seen.borrow();
    assert!(seen.iter().any(|(logic, data)| logic == &expected && data == &json!({"x": 10})));
    assert_eq!(session.json_output(), serde_json::to_string_pretty(&expected).unwrap());
}

#[test]
fn default_shapes_on_empty_root() {
    for (op, expected) in [
        ("and", json!({"and": []})),
        ("+", json!({"+": [0, 0]})),
        ("var", json!({"var": ""})),
        ("if", json!({"if": ["", ""]})),
        ("max", json!({"max": ""})),
    ] {
        let doc = place_operation(&document::empty(), op, &DropTarget::root()).unwrap();
        assert_eq!(doc, expected, "{op}");
    }
}

#[test]
fn removing_the_root_resets_to_empty() {
    let doc = json!({"or": [{">": [1, 2]}]});
    for path in [Path::root(), path!["or"]] {
        let next = remove_at_path(&doc, &path, RootPolicy::Deletable).unwrap();
        assert_eq!(next, json!({}));
        assert_eq!(next.as_object().map(|m| m.len()), Some(0));
        assert!(matches!(
            remove_at_path(&doc, &path, RootPolicy::Locked),
            Err(BuilderError::RootLocked)
        ));
    }
}

#[test]
fn invalid_drop_leaves_document_byte_identical() {
    let mut session = empty_session(json!({}));
    session.begin_drag("==", "palette").unwrap();
    session.drop_on(&DropTarget::root()).unwrap();
    let before = session.json_output();

    for op in ["and", "var", "+", "cat"] {
        session.begin_drag(op, "palette").unwrap();
        let err = session.drop_on(&DropTarget::slot(path!["==", 0])).unwrap_err();
        assert!(matches!(err, BuilderError::InvalidDropTarget(_)), "{op}");
        assert_eq!(session.json_output(), before);
    }

    session.begin_drag("and", "palette").unwrap();
    assert!(matches!(
        session.drop_on(&DropTarget::root()),
        Err(BuilderError::InvalidDropTarget(_))
    ));
    assert_eq!(session.json_output(), before);
}

#[test]
fn stale_paths_are_reported() {
    let mut session = empty_session(json!({}));
    session.begin_drag("and", "palette").unwrap();
    session.drop_on(&DropTarget::root()).unwrap();
    session.add_value(&path!["and"]).unwrap();
    session.remove_item(&path!["and"], 0).unwrap();
    let err = session.edit_value(&path!["and", 0], "1").unwrap_err();
    assert!(matches!(err, BuilderError::PathNotFound(p) if p == path!["and", 0]));
    assert!(matches!(
        session.add_value(&path!["or"]),
        Err(BuilderError::PathNotFound(_))
    ));
}

#[test]
fn every_placed_document_evaluates() {
    let evaluator = Evaluator::with_builtins();
    let catalog = json_logic_builder::OperationCatalog::default();
    for op in catalog.iter() {
        let doc = place_operation(&json!({"and": []}), &op.id, &DropTarget::slot(path!["and"])).unwrap();
        assert!(evaluator.apply(&doc, &json!({})).is_ok(), "{}", op.id);
    }
}
