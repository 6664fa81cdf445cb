//! Delivery transport for the Hookcast fan-out engine.
//!
//! A [`Transport`] performs exactly one delivery: it POSTs an
//! [`EventRecord`](hookcast_core::EventRecord) to the endpoint of a
//! [`WebhookRegistration`](hookcast_core::WebhookRegistration) and reports
//! either a [`DeliveryOutcome`](hookcast_core::DeliveryOutcome) or a
//! [`TransportError`]. Timeouts, redirects and what counts as a successful
//! status are decided here, not by the dispatcher.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use hookcast_transport::{HttpTransport, TransportConfig};
//!
//! # fn main() -> Result<(), hookcast_transport::TransportError> {
//! let config = TransportConfig::default()
//!     .with_timeout_secs(10)
//!     .with_header("User-Agent", "hookcast")
//!     .with_signing("webhook-secret", "X-Hookcast-Signature");
//! let transport = HttpTransport::new("http", config)?;
//! # let _ = transport;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod log;
pub mod transport;

pub use config::{SigningConfig, TransportConfig};
pub use error::TransportError;
pub use http::HttpTransport;
pub use log::LogTransport;
pub use transport::{DynTransport, Transport};
