use std::sync::Arc;

use futures::stream::{self, StreamExt};
use hookcast_core::{DeliveryOutcome, EventRecord, WebhookRegistration};
use hookcast_registry::RegistrationCache;
use hookcast_transport::DynTransport;
use tracing::{debug, info, instrument, warn};

use crate::config::DispatcherConfig;
use crate::error::DispatchError;
use crate::metrics::DispatchMetrics;

/// Select the registrations that should receive `event`, in snapshot order.
///
/// A registration is a target when its subscription predicate matches and
/// it has a non-empty endpoint URL.
pub fn select_targets<'a>(
    registrations: &'a [WebhookRegistration],
    event: &EventRecord,
) -> Vec<&'a WebhookRegistration> {
    registrations
        .iter()
        .filter(|webhook| webhook.matches(event))
        .filter(|webhook| {
            if webhook.has_endpoint() {
                true
            } else {
                debug!(webhook_id = %webhook.id, "skipping webhook without url");
                false
            }
        })
        .collect()
}

/// Delivers events to every matching webhook registration.
///
/// Cheap to share behind an `Arc`; concurrent `dispatch` calls are
/// independent of each other.
pub struct Dispatcher {
    cache: Arc<RegistrationCache>,
    transport: Arc<dyn DynTransport>,
    config: DispatcherConfig,
    metrics: Arc<DispatchMetrics>,
}

impl Dispatcher {
    pub fn new(cache: Arc<RegistrationCache>, transport: Arc<dyn DynTransport>) -> Self {
        Self {
            cache,
            transport,
            config: DispatcherConfig::default(),
            metrics: Arc::new(DispatchMetrics::default()),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<RegistrationCache> {
        &self.cache
    }

    pub fn metrics(&self) -> Arc<DispatchMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Deliver `event` to every active registration subscribed to it.
    ///
    /// Returns the outcomes of the successful deliveries in registration
    /// order. Failed deliveries are logged and left out, so an empty result
    /// means either "no subscriber" or "every delivery failed". Only a
    /// failure to load the registrations fails the call, and in that case
    /// nothing is delivered.
    #[instrument(
        name = "dispatcher.dispatch",
        skip_all,
        fields(chain_id = %event.chain_id(), event_type = %event.category())
    )]
    pub async fn dispatch(&self, event: &EventRecord) -> Result<Vec<DeliveryOutcome>, DispatchError> {
        let registrations = self
            .cache
            .get_active()
            .await
            .inspect_err(|_| self.metrics.increment_registry_errors())?;
        self.metrics.increment_events();

        if registrations.is_empty() {
            debug!("no active webhooks");
            self.metrics.increment_unmatched();
            return Ok(Vec::new());
        }

        let targets = select_targets(&registrations, event);
        if targets.is_empty() {
            debug!(active = registrations.len(), "no webhook subscribed to event");
            self.metrics.increment_unmatched();
            return Ok(Vec::new());
        }

        let attempted = targets.len();
        self.metrics
            .add_attempted(u64::try_from(attempted).unwrap_or(u64::MAX));

        // `buffered` keeps up to `concurrency` deliveries in flight and yields
        // their results in input order, whatever order they complete in.
        let deliveries: Vec<_> = targets
            .into_iter()
            .map(|target| self.deliver(target, event))
            .collect();
        let delivered: Vec<DeliveryOutcome> = stream::iter(deliveries)
            .buffered(self.config.concurrency())
            .filter_map(std::future::ready)
            .collect()
            .await;

        info!(
            active = registrations.len(),
            attempted,
            delivered = delivered.len(),
            "event dispatched"
        );
        Ok(delivered)
    }

    /// One isolated delivery. Errors are absorbed here.
    async fn deliver(
        &self,
        target: &WebhookRegistration,
        event: &EventRecord,
    ) -> Option<DeliveryOutcome> {
        match self.transport.post(target, event).await {
            Ok(outcome) => {
                self.metrics.increment_succeeded();
                Some(outcome)
            }
            Err(e) => {
                self.metrics.increment_failed();
                warn!(
                    webhook_id = %target.id,
                    url = %target.url,
                    transport = self.transport.name(),
                    error = %e,
                    "webhook delivery failed"
                );
                None
            }
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("transport", &self.transport.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
