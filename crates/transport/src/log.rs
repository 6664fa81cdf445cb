use hookcast_core::{DeliveryOutcome, EventRecord, WebhookRegistration};
use tracing::info;

use crate::error::TransportError;
use crate::transport::Transport;

/// A transport that logs the delivery and reports success without
/// performing any external I/O.
///
/// Useful for local development and dry runs where the endpoints must not
/// actually be called.
pub struct LogTransport {
    name: String,
}

impl LogTransport {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Transport for LogTransport {
    fn name(&self) -> &str {
        &self.name
    }

    async fn post(
        &self,
        target: &WebhookRegistration,
        event: &EventRecord,
    ) -> Result<DeliveryOutcome, TransportError> {
        info!(
            transport = %self.name,
            webhook_id = %target.id,
            url = %target.url,
            chain_id = %event.chain_id(),
            event_type = %event.category(),
            "log transport skipped delivery"
        );
        Ok(DeliveryOutcome::new(
            target.id,
            &target.url,
            200,
            serde_json::json!({
                "transport": self.name,
                "logged": true,
            }),
        ))
    }
}
