use std::time::Duration;

use thiserror::Error;

/// Errors that make a single delivery fail.
#[derive(Debug, Error)]
pub enum TransportError {
    /// An HTTP-level transport error occurred (connection refused, DNS, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint did not respond within the configured timeout.
    #[error("timeout after {0:?}")]
    Timeout(Duration),

    /// The remote endpoint returned a status outside the success set.
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// The endpoint answered with HTTP 429 (Too Many Requests).
    #[error("rate limited by remote endpoint")]
    RateLimited,

    /// The event could not be serialized for the request body.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// HMAC signature computation failed.
    #[error("HMAC signing error: {0}")]
    Signing(String),

    /// The transport was given invalid configuration.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl TransportError {
    /// Map a `reqwest` send error, surfacing timeouts as [`Self::Timeout`].
    pub(crate) fn from_send(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Http(err)
        }
    }

    /// HTTP status code reported by the endpoint, if it answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::RateLimited => Some(429),
            _ => None,
        }
    }
}
