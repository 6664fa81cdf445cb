use hookcast_registry::RepositoryError;
use thiserror::Error;

/// Errors that fail a whole dispatch call.
///
/// Individual delivery failures are not represented here: they are logged,
/// counted and dropped from the result.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The active registrations could not be obtained; nothing was delivered.
    #[error("failed to load active webhooks: {0}")]
    Registry(#[from] RepositoryError),
}
