use std::sync::Arc;

use hookcast_core::WebhookRegistration;
use hookcast_dispatcher::Dispatcher;
use hookcast_registry::{MemoryWebhookRepository, RegistrationCache, WebhookRepository};
#[cfg(feature = "postgres")]
use hookcast_registry::{PostgresConfig, PostgresWebhookRepository};
use hookcast_transport::{DynTransport, HttpTransport, LogTransport};
use tracing::{info, warn};

use crate::config::{HookcastConfig, RegistryConfig, TransportSettings, WebhookEntry};
use crate::error::ServerError;

/// Create the webhook repository from the given configuration.
///
/// Static `[[webhooks]]` entries seed the memory backend and are ignored by
/// the other backends.
#[allow(clippy::unused_async)]
pub async fn create_repository(
    config: &RegistryConfig,
    webhooks: &[WebhookEntry],
) -> Result<Arc<dyn WebhookRepository>, ServerError> {
    let repository: Arc<dyn WebhookRepository> = match config.backend.as_str() {
        "memory" => {
            let registrations = static_registrations(webhooks)?;
            info!(webhooks = registrations.len(), "loaded static webhooks");
            Arc::new(MemoryWebhookRepository::with_webhooks(registrations))
        }
        #[cfg(feature = "postgres")]
        "postgres" => {
            if !webhooks.is_empty() {
                warn!(
                    count = webhooks.len(),
                    "ignoring [[webhooks]] entries with the postgres backend"
                );
            }

            let url = config.url.as_deref().ok_or_else(|| {
                ServerError::Config("postgres backend requires [registry] url".into())
            })?;
            let defaults = PostgresConfig::default();
            let pg_config = PostgresConfig {
                url: url.to_owned(),
                pool_size: config.pool_size.unwrap_or(defaults.pool_size),
                schema: config.schema.clone().unwrap_or(defaults.schema),
                table: config.table.clone().unwrap_or(defaults.table),
                ssl_mode: config.ssl_mode.clone(),
                ssl_root_cert: config.ssl_root_cert.clone(),
            };

            let repository = PostgresWebhookRepository::new(pg_config)
                .await
                .map_err(|e| ServerError::Config(format!("registry postgres: {e}")))?;
            Arc::new(repository)
        }
        #[cfg(not(feature = "postgres"))]
        "postgres" => {
            return Err(ServerError::Config(
                "registry backend 'postgres' requires the 'postgres' feature".into(),
            ));
        }
        other => {
            return Err(ServerError::Config(format!(
                "unknown registry backend: {other}"
            )));
        }
    };

    info!(backend = %config.backend, "webhook repository initialized");
    Ok(repository)
}

fn static_registrations(
    webhooks: &[WebhookEntry],
) -> Result<Vec<WebhookRegistration>, ServerError> {
    webhooks
        .iter()
        .map(|entry| {
            let registration = entry.to_registration();
            registration
                .validate()
                .map_err(|e| ServerError::Config(format!("invalid [[webhooks]] entry: {e}")))?;
            Ok(registration)
        })
        .collect()
}

/// Create the delivery transport from the given configuration.
pub fn create_transport(config: &TransportSettings) -> Result<Arc<dyn DynTransport>, ServerError> {
    let transport: Arc<dyn DynTransport> = match config.kind.as_str() {
        "http" => {
            let transport = HttpTransport::new("http", config.to_transport_config())
                .map_err(|e| ServerError::Config(format!("http transport: {e}")))?;
            Arc::new(transport)
        }
        "log" => {
            warn!("log transport selected: events are logged, not delivered");
            Arc::new(LogTransport::new("log"))
        }
        other => {
            return Err(ServerError::Config(format!(
                "unknown transport kind: {other}"
            )));
        }
    };

    Ok(transport)
}

/// Wire repository, cache, transport and dispatcher together.
pub async fn create_dispatcher(config: &HookcastConfig) -> Result<Arc<Dispatcher>, ServerError> {
    let repository = create_repository(&config.registry, &config.webhooks).await?;
    let cache = Arc::new(RegistrationCache::new(
        repository,
        config.registry.cache_ttl(),
    ));
    let transport = create_transport(&config.transport)?;

    let dispatcher = Dispatcher::new(cache, transport)
        .with_config(config.dispatcher.to_dispatcher_config());
    info!(
        cache_ttl_secs = config.registry.cache_ttl_seconds,
        transport = %config.transport.kind,
        max_concurrent_deliveries = config.dispatcher.max_concurrent_deliveries,
        "dispatcher ready"
    );
    Ok(Arc::new(dispatcher))
}
