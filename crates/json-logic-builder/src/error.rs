use json_logic_path::{Path, PathError};
use thiserror::Error;

/// Every way an edit, a registration or a configuration can be rejected.
///
/// An operation that returns one of these has left its input untouched.
#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("PATH_NOT_FOUND: {0}")]
    PathNotFound(Path),

    #[error("NOT_A_SEQUENCE: {0}")]
    NotASequence(Path),

    #[error("INVALID_DROP_TARGET: {0}")]
    InvalidDropTarget(String),

    #[error("INVALID_INDEX: {index} (length {len})")]
    InvalidIndex { index: usize, len: usize },

    #[error("INVALID_ROOT: root must be {{}} or a single-key object")]
    InvalidRoot,

    #[error("ROOT_LOCKED")]
    RootLocked,

    #[error("NOT_REMOVABLE: {0}")]
    NotRemovable(Path),

    #[error("NOT_TOGGLEABLE: {0}")]
    NotToggleable(Path),

    #[error("UNKNOWN_OPERATION: {0}")]
    UnknownOperation(String),

    #[error("INVALID_TEST_DATA: {0}")]
    InvalidTestData(String),

    #[error("INVALID_CUSTOM_OPERATION: {0}")]
    InvalidCustomOperation(String),

    #[error("INVALID_CONFIG: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BuilderError {
    /// Maps a traversal failure at `path` to [`BuilderError::PathNotFound`].
    pub(crate) fn from_path(path: &Path) -> impl FnOnce(PathError) -> BuilderError + '_ {
        move |_| BuilderError::PathNotFound(path.clone())
    }
}

pub type Result<T> = std::result::Result<T, BuilderError>;
