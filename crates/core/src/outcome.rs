use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Result of one successful delivery to a webhook endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryOutcome {
    /// Registration the event was delivered to.
    pub webhook_id: Uuid,

    /// Endpoint URL the event was POSTed to.
    pub endpoint_url: String,

    /// HTTP status code returned by the endpoint.
    pub status_code: u16,

    /// Response body (parsed as JSON if possible, otherwise wrapped text).
    pub body: serde_json::Value,
}

impl DeliveryOutcome {
    pub fn new(
        webhook_id: Uuid,
        endpoint_url: impl Into<String>,
        status_code: u16,
        body: serde_json::Value,
    ) -> Self {
        Self {
            webhook_id,
            endpoint_url: endpoint_url.into(),
            status_code,
            body,
        }
    }
}
