//! Path addresses into JsonLogic expression documents.
//!
//! A [`Path`] is an ordered list of [`PathStep`]s, each an object key or an
//! array index. Paths are values: they compare structurally, and the address
//! algebra ([`Path::child`], [`Path::parent`], [`Path::is_prefix_of`]) is the
//! only way code in this workspace derives one path from another.
//!
//! Paths print and parse in [JSON Pointer (RFC 6901)](https://tools.ietf.org/html/rfc6901)
//! form, which is handy for diagnostics and command-line input.
//!
//! # Example
//!
//! ```
//! use json_logic_path::{path, resolve, Path};
//! use serde_json::json;
//!
//! let doc = json!({"or": [{">": [{"var": "x"}, 5]}]});
//! let p: Path = "/or/0/>/1".parse().unwrap();
//! assert_eq!(p, path!["or", 0, ">", 1]);
//! assert_eq!(resolve(&doc, &p).unwrap(), &json!(5));
//! ```

use thiserror::Error;

pub mod find;
pub mod types;

pub use find::{resolve, resolve_mut, resolve_parent, resolve_parent_mut};
pub use types::{Path, PathStep};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("NOT_FOUND")]
    NotFound,
    #[error("NO_PARENT")]
    NoParent,
    #[error("POINTER_INVALID")]
    InvalidPointer,
}

/// Unescapes a JSON Pointer path component.
///
/// Per RFC 6901, `~1` is replaced with `/` and `~0` is replaced with `~`.
///
/// # Example
///
/// ```
/// use json_logic_path::unescape_component;
///
/// assert_eq!(unescape_component("a~0b"), "a~b");
/// assert_eq!(unescape_component("c~1d"), "c/d");
/// ```
pub fn unescape_component(component: &str) -> String {
    if !component.contains('~') {
        return component.to_string();
    }
    // Order matters: ~1 must be replaced before ~0
    component.replace("~1", "/").replace("~0", "~")
}

/// Escapes a JSON Pointer path component.
///
/// # Example
///
/// ```
/// use json_logic_path::escape_component;
///
/// assert_eq!(escape_component("a~b"), "a~0b");
/// assert_eq!(escape_component("c/d"), "c~1d");
/// ```
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    // Order matters: ~ must be escaped before /
    component.replace('~', "~0").replace('/', "~1")
}

/// Check if a string represents a valid non-negative integer array index.
///
/// # Example
///
/// ```
/// use json_logic_path::is_valid_index;
///
/// assert!(is_valid_index("0"));
/// assert!(is_valid_index("123"));
/// assert!(!is_valid_index("-1"));
/// assert!(!is_valid_index("01"));
/// ```
pub fn is_valid_index(index: &str) -> bool {
    if index.is_empty() {
        return false;
    }
    let bytes = index.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|&b| b.is_ascii_digit())
}

/// Parse JSON Pointer text into a [`Path`].
///
/// Canonical decimal components become [`PathStep::Index`], everything else
/// a [`PathStep::Key`]. The empty string is the root; any other pointer must
/// start with `/`.
pub fn parse_pointer(pointer: &str) -> Result<Path, PathError> {
    if pointer.is_empty() {
        return Ok(Path::root());
    }
    let rest = pointer.strip_prefix('/').ok_or(PathError::InvalidPointer)?;
    Ok(rest
        .split('/')
        .map(|component| {
            if is_valid_index(component) {
                match component.parse() {
                    Ok(i) => PathStep::Index(i),
                    Err(_) => PathStep::Key(component.to_string()),
                }
            } else {
                PathStep::Key(unescape_component(component))
            }
        })
        .collect())
}

/// Format a [`Path`] as JSON Pointer text. The root formats as `""`.
pub fn format_pointer(path: &Path) -> String {
    let mut out = String::new();
    for step in path {
        out.push('/');
        match step {
            PathStep::Index(i) => out.push_str(&i.to_string()),
            PathStep::Key(k) => out.push_str(&escape_component(k)),
        }
    }
    out
}
