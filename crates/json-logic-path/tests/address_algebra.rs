use json_logic_path::{path, resolve, resolve_parent, Path, PathError, PathStep};
use serde_json::json;

#[test]
fn test_child_then_parent_is_identity() {
    let base = path!["or", 0];
    let child = base.child(">").child(1);
    assert_eq!(child.parent().and_then(|p| p.parent()), Some(base.clone()));
    assert!(base.is_strict_prefix_of(&child));
}

#[test]
fn test_pointer_text_and_steps_agree() {
    let doc = json!({"and": [{"var": "a"}, {"==": [{"var": "b"}, "x/y"]}]});
    let p: Path = "/and/1/==/1".parse().unwrap();
    assert_eq!(resolve(&doc, &p).unwrap(), &json!("x/y"));
    assert_eq!(p.to_string(), "/and/1/==/1");
}

#[test]
fn test_sibling_paths_differ_only_in_last_step() {
    let doc = json!({"or": ["a", "b", "c"]});
    let parent = path!["or"];
    let seq = resolve(&doc, &parent).unwrap().as_array().unwrap();
    let addresses: Vec<Path> = (0..seq.len()).map(|i| parent.child(i)).collect();
    for (i, addr) in addresses.iter().enumerate() {
        let (container, last) = resolve_parent(&doc, addr).unwrap();
        assert_eq!(container, &json!(["a", "b", "c"]));
        assert_eq!(last, &PathStep::Index(i));
    }
}

#[test]
fn test_missing_intermediate_step() {
    let doc = json!({"or": []});
    assert_eq!(resolve(&doc, &path!["or", 0, "var"]), Err(PathError::NotFound));
    assert_eq!(resolve_parent(&doc, &path!["or", 0]), Err(PathError::NotFound));
}
