use hmac::{Hmac, Mac};
use hookcast_core::{DeliveryOutcome, EventRecord, WebhookRegistration};
use reqwest::Client;
use sha2::Sha256;
use tracing::{debug, instrument, warn};

use crate::config::TransportConfig;
use crate::error::TransportError;
use crate::transport::Transport;

type HmacSha256 = Hmac<Sha256>;

/// HTTP transport that POSTs events as JSON to webhook endpoints.
///
/// One instance serves every registration: the target URL and its
/// `Authorization` header come from the [`WebhookRegistration`], everything
/// else (timeout, static headers, signing, success statuses) from the
/// shared [`TransportConfig`]. The underlying `reqwest::Client` pools
/// connections across deliveries.
pub struct HttpTransport {
    name: String,
    config: TransportConfig,
    client: Client,
}

impl HttpTransport {
    /// Create a transport with a `reqwest::Client` built from `config`.
    pub fn new(name: impl Into<String>, config: TransportConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::default()
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()
            .map_err(|e| {
                TransportError::Configuration(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self::with_client(name, config, client))
    }

    /// Create a transport with a custom HTTP client.
    ///
    /// The client's own timeout applies; `config.timeout` is only used to
    /// report [`TransportError::Timeout`].
    pub fn with_client(name: impl Into<String>, config: TransportConfig, client: Client) -> Self {
        Self {
            name: name.into(),
            config,
            client,
        }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Compute the HMAC-SHA256 signature of the request body.
    fn compute_hmac(secret: &str, body: &[u8]) -> Result<String, TransportError> {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| TransportError::Signing(format!("invalid HMAC key: {e}")))?;
        mac.update(body);
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    fn build_request(
        &self,
        target: &WebhookRegistration,
        body: Vec<u8>,
    ) -> Result<reqwest::RequestBuilder, TransportError> {
        let signature = match &self.config.signing {
            Some(signing) => Some((
                signing.header.as_str(),
                Self::compute_hmac(&signing.secret, &body)?,
            )),
            None => None,
        };

        let mut request = self
            .client
            .post(&target.url)
            .header("Content-Type", "application/json")
            .body(body);

        for (key, value) in &self.config.headers {
            request = request.header(key, value);
        }

        if let Some(authorization) = &target.authorization {
            request = request.header("Authorization", authorization);
        }

        if let Some((header, signature)) = signature {
            request = request.header(header, format!("sha256={signature}"));
        }

        Ok(request)
    }
}

impl Transport for HttpTransport {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        skip(self, target, event),
        fields(webhook_id = %target.id, url = %target.url, event_type = %event.category())
    )]
    async fn post(
        &self,
        target: &WebhookRegistration,
        event: &EventRecord,
    ) -> Result<DeliveryOutcome, TransportError> {
        let body =
            serde_json::to_vec(event).map_err(|e| TransportError::InvalidPayload(e.to_string()))?;

        debug!("posting event to webhook");

        let response = self
            .build_request(target, body)?
            .send()
            .await
            .map_err(|e| TransportError::from_send(e, self.config.timeout))?;

        let status_code = response.status().as_u16();

        if status_code == 429 {
            warn!("webhook endpoint returned 429");
            return Err(TransportError::RateLimited);
        }

        // Parse response body (best-effort JSON, fallback to text).
        let response_text = response
            .text()
            .await
            .map_err(|e| TransportError::from_send(e, self.config.timeout))?;

        if !self.config.is_success_status(status_code) {
            return Err(TransportError::UnexpectedStatus {
                status: status_code,
                body: response_text,
            });
        }

        let response_body: serde_json::Value = if response_text.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&response_text).unwrap_or_else(|_| {
                serde_json::json!({
                    "status_code": status_code,
                    "body": response_text,
                })
            })
        };

        debug!(status_code, "webhook accepted event");
        Ok(DeliveryOutcome::new(
            target.id,
            &target.url,
            status_code,
            response_body,
        ))
    }
}
