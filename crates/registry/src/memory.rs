use async_trait::async_trait;
use hookcast_core::WebhookRegistration;
use tokio::sync::RwLock;

use crate::error::RepositoryError;
use crate::repository::WebhookRepository;

/// In-memory [`WebhookRepository`] holding an ordered list of registrations.
///
/// Used for statically configured deployments and tests. Inactive
/// registrations are kept but never returned by
/// [`find_all_active`](WebhookRepository::find_all_active).
#[derive(Debug, Default)]
pub struct MemoryWebhookRepository {
    webhooks: RwLock<Vec<WebhookRegistration>>,
}

impl MemoryWebhookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository seeded with `webhooks`, preserving their order.
    pub fn with_webhooks(webhooks: Vec<WebhookRegistration>) -> Self {
        Self {
            webhooks: RwLock::new(webhooks),
        }
    }

    /// Append a registration.
    pub async fn insert(&self, webhook: WebhookRegistration) {
        self.webhooks.write().await.push(webhook);
    }

    /// Replace the whole registration list.
    pub async fn replace_all(&self, webhooks: Vec<WebhookRegistration>) {
        *self.webhooks.write().await = webhooks;
    }

    /// Number of stored registrations, active or not.
    pub async fn len(&self) -> usize {
        self.webhooks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.webhooks.read().await.is_empty()
    }
}

#[async_trait]
impl WebhookRepository for MemoryWebhookRepository {
    async fn find_all_active(&self) -> Result<Vec<WebhookRegistration>, RepositoryError> {
        Ok(self
            .webhooks
            .read()
            .await
            .iter()
            .filter(|webhook| webhook.is_active)
            .cloned()
            .collect())
    }
}
