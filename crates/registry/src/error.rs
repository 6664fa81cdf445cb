use thiserror::Error;

/// Errors raised while fetching webhook registrations.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// The backing store could not be reached.
    #[error("connection error: {0}")]
    Connection(String),

    /// The backing store reported an error while running a query.
    #[error("backend error: {0}")]
    Backend(String),

    /// A stored row could not be mapped onto a registration.
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}
