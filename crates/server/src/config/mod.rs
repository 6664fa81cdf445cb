mod dispatcher;
mod logging;
mod registry;
mod server;
mod transport;


pub use dispatcher::*;
pub use logging::*;
pub use registry::*;
pub use server::*;
pub use transport::*;

use serde::Deserialize;

/// Top-level configuration for the Hookcast server, loaded from a TOML file.
///
/// Every section is optional; an empty file yields a server bound to
/// `127.0.0.1:8080` that delivers over HTTP to the webhooks declared in
/// `[[webhooks]]` (none by default).
#[derive(Debug, Default, Deserialize)]
pub struct HookcastConfig {
    /// HTTP server bind configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Log filter configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Registration store and cache configuration.
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Delivery transport configuration.
    #[serde(default)]
    pub transport: TransportSettings,
    /// Fan-out tuning.
    #[serde(default)]
    pub dispatcher: DispatcherSettings,
    /// Static webhooks for the memory backend.
    #[serde(default)]
    pub webhooks: Vec<WebhookEntry>,
}
