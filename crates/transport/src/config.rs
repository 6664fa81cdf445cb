use std::collections::HashMap;
use std::time::Duration;

/// HMAC signing of the delivered body.
///
/// The signature is computed as `HMAC-SHA256(secret, body)`, hex-encoded,
/// and sent as `sha256=<hex>` in `header`.
#[derive(Clone)]
pub struct SigningConfig {
    pub secret: String,
    pub header: String,
}

impl std::fmt::Debug for SigningConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningConfig")
            .field("secret", &"[REDACTED]")
            .field("header", &self.header)
            .finish()
    }
}

/// Configuration shared by every delivery made through an
/// [`HttpTransport`](crate::HttpTransport).
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Per-delivery timeout. A delivery that exceeds it is a failed delivery.
    pub timeout: Duration,

    /// Static headers to include in every request.
    pub headers: HashMap<String, String>,

    /// HTTP status codes considered successful. If empty, any 2xx is
    /// accepted.
    pub success_status_codes: Vec<u16>,

    /// Whether to follow redirects.
    pub follow_redirects: bool,

    /// Optional body signature.
    pub signing: Option<SigningConfig>,
}

impl Default for TransportConfig {
    /// 30-second timeout, redirects followed, any 2xx accepted, unsigned.
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            headers: HashMap::new(),
            success_status_codes: Vec::new(),
            follow_redirects: true,
            signing: None,
        }
    }
}

impl TransportConfig {
    /// Add a static header.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the request timeout in seconds.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set specific HTTP status codes to consider successful.
    ///
    /// When empty (the default), any 2xx status code is accepted.
    #[must_use]
    pub fn with_success_status_codes(mut self, codes: Vec<u16>) -> Self {
        self.success_status_codes = codes;
        self
    }

    #[must_use]
    pub fn with_no_redirects(mut self) -> Self {
        self.follow_redirects = false;
        self
    }

    /// Sign every body with HMAC-SHA256 and send the signature in `header`.
    #[must_use]
    pub fn with_signing(mut self, secret: impl Into<String>, header: impl Into<String>) -> Self {
        self.signing = Some(SigningConfig {
            secret: secret.into(),
            header: header.into(),
        });
        self
    }

    /// Check whether the status code indicates success.
    pub fn is_success_status(&self, status: u16) -> bool {
        if self.success_status_codes.is_empty() {
            (200..300).contains(&status)
        } else {
            self.success_status_codes.contains(&status)
        }
    }
}
