use serde_json::Value;

use crate::types::{Path, PathStep};
use crate::PathError;

fn step_into<'a>(current: &'a Value, step: &PathStep) -> Result<&'a Value, PathError> {
    match current {
        Value::Array(arr) => {
            let idx = step.as_index().ok_or(PathError::NotFound)?;
            arr.get(idx).ok_or(PathError::NotFound)
        }
        Value::Object(map) => {
            let key = step.as_key().ok_or(PathError::NotFound)?;
            map.get(key).ok_or(PathError::NotFound)
        }
        _ => Err(PathError::NotFound),
    }
}

fn step_into_mut<'a>(current: &'a mut Value, step: &PathStep) -> Result<&'a mut Value, PathError> {
    match current {
        Value::Array(arr) => {
            let idx = step.as_index().ok_or(PathError::NotFound)?;
            arr.get_mut(idx).ok_or(PathError::NotFound)
        }
        Value::Object(map) => {
            let key = step.as_key().ok_or(PathError::NotFound)?;
            map.get_mut(key).ok_or(PathError::NotFound)
        }
        _ => Err(PathError::NotFound),
    }
}

/// Returns the value at `path`.
///
/// Fails with [`PathError::NotFound`] when an intermediate step is missing or
/// type-mismatches (an index into an object, a key into an array, any step
/// into a scalar).
///
/// # Example
///
/// ```
/// use json_logic_path::{path, resolve};
/// use serde_json::json;
///
/// let doc = json!({"or": [{"var": "x"}]});
/// assert_eq!(resolve(&doc, &path!["or", 0, "var"]).unwrap(), &json!("x"));
/// assert!(resolve(&doc, &path!["and"]).is_err());
/// ```
pub fn resolve<'a>(doc: &'a Value, path: &Path) -> Result<&'a Value, PathError> {
    path.iter().try_fold(doc, step_into)
}

/// Mutable counterpart of [`resolve`].
pub fn resolve_mut<'a>(doc: &'a mut Value, path: &Path) -> Result<&'a mut Value, PathError> {
    let mut current = doc;
    for step in path {
        current = step_into_mut(current, step)?;
    }
    Ok(current)
}

/// Returns the container holding the value at `path` together with the final
/// step that selects it inside that container.
///
/// The root has no parent: an empty path fails with [`PathError::NoParent`].
/// The final step itself is checked, so a stale index fails here rather than
/// at the later replacement.
pub fn resolve_parent<'a, 'p>(
    doc: &'a Value,
    path: &'p Path,
) -> Result<(&'a Value, &'p PathStep), PathError> {
    let (parent_path, last) = split(path)?;
    let container = path_prefix_resolve(doc, parent_path)?;
    step_into(container, last)?;
    Ok((container, last))
}

/// Mutable counterpart of [`resolve_parent`].
pub fn resolve_parent_mut<'a, 'p>(
    doc: &'a mut Value,
    path: &'p Path,
) -> Result<(&'a mut Value, &'p PathStep), PathError> {
    let (parent_path, last) = split(path)?;
    let mut container = doc;
    for step in parent_path {
        container = step_into_mut(container, step)?;
    }
    step_into(container, last)?;
    Ok((container, last))
}

fn split(path: &Path) -> Result<(&[PathStep], &PathStep), PathError> {
    match path.steps().split_last() {
        Some((last, init)) => Ok((init, last)),
        None => Err(PathError::NoParent),
    }
}

fn path_prefix_resolve<'a>(doc: &'a Value, steps: &[PathStep]) -> Result<&'a Value, PathError> {
    steps.iter().try_fold(doc, step_into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;
    use serde_json::json;

    #[test]
    fn test_resolve_root() {
        let doc = json!({"and": []});
        assert_eq!(resolve(&doc, &Path::root()).unwrap(), &doc);
    }

    #[test]
    fn test_resolve_key_step_into_array() {
        let doc = json!({"or": [1, 2]});
        assert_eq!(resolve(&doc, &path!["or", "1"]).unwrap(), &json!(2));
        assert_eq!(resolve(&doc, &path!["or", "01"]), Err(PathError::NotFound));
    }

    #[test]
    fn test_resolve_index_into_object() {
        let doc = json!({"0": "zero"});
        assert_eq!(resolve(&doc, &path![0]), Err(PathError::NotFound));
        assert_eq!(resolve(&doc, &path!["0"]).unwrap(), &json!("zero"));
    }

    #[test]
    fn test_resolve_through_scalar() {
        let doc = json!({"var": "x"});
        assert_eq!(resolve(&doc, &path!["var", 0]), Err(PathError::NotFound));
    }

    #[test]
    fn test_resolve_parent() {
        let doc = json!({"or": [{">": ["", ""]}]});
        let p = path!["or", 0, ">", 1];
        let (container, last) = resolve_parent(&doc, &p).unwrap();
        assert_eq!(container, &json!(["", ""]));
        assert_eq!(last, &PathStep::Index(1));
    }

    #[test]
    fn test_resolve_parent_root() {
        let doc = json!({});
        assert_eq!(resolve_parent(&doc, &Path::root()), Err(PathError::NoParent));
    }

    #[test]
    fn test_resolve_parent_stale_index() {
        let doc = json!({"or": [1]});
        assert_eq!(resolve_parent(&doc, &path!["or", 3]), Err(PathError::NotFound));
    }

    #[test]
    fn test_resolve_mut() {
        let mut doc = json!({"or": [1, 2]});
        *resolve_mut(&mut doc, &path!["or", 0]).unwrap() = json!(9);
        assert_eq!(doc, json!({"or": [9, 2]}));
    }
}
