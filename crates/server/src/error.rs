use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hookcast_dispatcher::DispatchError;
use thiserror::Error;

/// Errors that can occur when running the Hookcast server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A dispatch that could not start because registrations were
    /// unavailable.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Dispatch(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use hookcast_registry::RepositoryError;

    use super::*;

    #[test]
    fn registry_failure_is_service_unavailable() {
        let err = ServerError::from(DispatchError::from(RepositoryError::Connection(
            "refused".into(),
        )));
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn config_error_is_internal() {
        let err = ServerError::Config("bad".into());
        assert_eq!(err.to_string(), "configuration error: bad");
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
