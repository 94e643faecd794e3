use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Unrecognized operation {0}")]
    UnrecognizedOperation(String),

    #[error("\"{op}\" failed: {message}")]
    Custom { op: String, message: String },
}
