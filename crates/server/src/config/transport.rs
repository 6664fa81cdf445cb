use std::collections::HashMap;

use hookcast_transport::TransportConfig;
use serde::Deserialize;

/// Delivery transport configuration.
#[derive(Debug, Deserialize)]
pub struct TransportSettings {
    /// Which transport to use: `"http"` (real deliveries) or `"log"` (log
    /// and report success without calling the endpoint).
    #[serde(default = "default_kind")]
    pub kind: String,

    /// Per-delivery timeout in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Status codes counted as a successful delivery. Empty means any 2xx.
    #[serde(default)]
    pub success_status_codes: Vec<u16>,

    /// Static headers added to every delivery.
    #[serde(default)]
    pub headers: HashMap<String, String>,

    #[serde(default = "default_follow_redirects")]
    pub follow_redirects: bool,

    /// When set, every body is signed with HMAC-SHA256 using this secret.
    pub signing_secret: Option<String>,

    /// Header carrying the body signature.
    #[serde(default = "default_signing_header")]
    pub signing_header: String,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            timeout_seconds: default_timeout_seconds(),
            success_status_codes: Vec::new(),
            headers: HashMap::new(),
            follow_redirects: default_follow_redirects(),
            signing_secret: None,
            signing_header: default_signing_header(),
        }
    }
}

impl TransportSettings {
    pub fn to_transport_config(&self) -> TransportConfig {
        let mut config = TransportConfig::default()
            .with_timeout_secs(self.timeout_seconds)
            .with_success_status_codes(self.success_status_codes.clone());
        for (key, value) in &self.headers {
            config = config.with_header(key, value);
        }
        if !self.follow_redirects {
            config = config.with_no_redirects();
        }
        if let Some(ref secret) = self.signing_secret {
            config = config.with_signing(secret, &self.signing_header);
        }
        config
    }
}

fn default_kind() -> String {
    "http".to_owned()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_follow_redirects() -> bool {
    true
}

fn default_signing_header() -> String {
    "X-Hookcast-Signature".to_owned()
}
