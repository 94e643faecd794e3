//! Type definitions for path addresses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{format_pointer, parse_pointer, PathError};

/// A step in a path address.
///
/// Serializes as a bare JSON string (object key) or number (array index), so
/// a whole path reads as `["or", 0, ">"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathStep {
    /// Array index.
    Index(usize),
    /// Object key.
    Key(String),
}

impl PathStep {
    /// Returns the array index this step addresses, if any.
    ///
    /// A `Key` step counts as an index when it is a canonical non-negative
    /// decimal (`"0"`, `"12"`, but not `"01"` or `"-1"`).
    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathStep::Index(i) => Some(*i),
            PathStep::Key(k) if crate::is_valid_index(k) => k.parse().ok(),
            PathStep::Key(_) => None,
        }
    }

    /// Returns the object key this step addresses, if any.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathStep::Key(k) => Some(k),
            PathStep::Index(_) => None,
        }
    }
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Index(i) => write!(f, "{i}"),
            PathStep::Key(k) => f.write_str(k),
        }
    }
}

impl From<usize> for PathStep {
    fn from(i: usize) -> Self {
        PathStep::Index(i)
    }
}

impl From<&str> for PathStep {
    fn from(k: &str) -> Self {
        PathStep::Key(k.to_string())
    }
}

impl From<String> for PathStep {
    fn from(k: String) -> Self {
        PathStep::Key(k)
    }
}

/// An address of a subtree inside a JSON document.
///
/// Paths are plain values: two paths are the same address when their steps
/// are equal. All manipulation goes through the methods below so callers
/// never splice step vectors by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<PathStep>);

impl Path {
    /// The empty path, addressing the document root.
    pub fn root() -> Self {
        Path(Vec::new())
    }

    pub fn new(steps: Vec<PathStep>) -> Self {
        Path(steps)
    }

    /// Returns a new path with `step` appended.
    ///
    /// # Example
    ///
    /// ```
    /// use json_logic_path::Path;
    ///
    /// let p = Path::root().child("or").child(0);
    /// assert_eq!(p.to_string(), "/or/0");
    /// ```
    pub fn child(&self, step: impl Into<PathStep>) -> Self {
        let mut steps = self.0.clone();
        steps.push(step.into());
        Path(steps)
    }

    /// Returns the parent address, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            return None;
        }
        Some(Path(self.0[..self.0.len() - 1].to_vec()))
    }

    /// Splits into `(parent, last step)`.
    pub fn split_last(&self) -> Result<(Path, &PathStep), PathError> {
        match self.0.split_last() {
            Some((last, init)) => Ok((Path(init.to_vec()), last)),
            None => Err(PathError::NoParent),
        }
    }

    pub fn last(&self) -> Option<&PathStep> {
        self.0.last()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathStep> {
        self.0.iter()
    }

    /// True when `self` is `other` or one of its ancestors.
    ///
    /// # Example
    ///
    /// ```
    /// use json_logic_path::Path;
    ///
    /// let parent = Path::root().child("or");
    /// let child = parent.child(0);
    /// assert!(parent.is_prefix_of(&child));
    /// assert!(parent.is_prefix_of(&parent));
    /// assert!(!child.is_prefix_of(&parent));
    /// ```
    pub fn is_prefix_of(&self, other: &Path) -> bool {
        self.0.len() <= other.0.len() && self.0[..] == other.0[..self.0.len()]
    }

    /// True when `self` is a proper ancestor of `other`.
    pub fn is_strict_prefix_of(&self, other: &Path) -> bool {
        self.0.len() < other.0.len() && self.is_prefix_of(other)
    }
}

impl From<Vec<PathStep>> for Path {
    fn from(steps: Vec<PathStep>) -> Self {
        Path(steps)
    }
}

impl FromIterator<PathStep> for Path {
    fn from_iter<I: IntoIterator<Item = PathStep>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathStep;
    type IntoIter = std::slice::Iter<'a, PathStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_pointer(self))
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_pointer(s)
    }
}

/// Builds a [`Path`] from a list of keys and indices.
///
/// ```
/// use json_logic_path::{path, PathStep};
///
/// let p = path!["or", 0, ">"];
/// assert_eq!(p.steps()[1], PathStep::Index(0));
/// ```
#[macro_export]
macro_rules! path {
    () => { $crate::Path::root() };
    ($($step:expr),+ $(,)?) => {
        $crate::Path::new(vec![$($crate::PathStep::from($step)),+])
    };
}
