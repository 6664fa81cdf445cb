use thiserror::Error;

/// Errors produced while building or parsing core types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// An event category name did not match any known category.
    #[error("unknown event category: {0}")]
    UnknownCategory(String),

    /// A webhook registration violates a structural invariant.
    #[error("invalid webhook registration: {0}")]
    InvalidRegistration(String),
}
