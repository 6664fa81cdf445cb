use async_trait::async_trait;
use hookcast_core::WebhookRegistration;

use crate::error::RepositoryError;

/// Read-only access to stored webhook registrations.
///
/// Implementations must be `Send + Sync` and safe for concurrent access.
/// Registration management (create, update, delete) happens elsewhere.
#[async_trait]
pub trait WebhookRepository: Send + Sync {
    /// Fetch every currently active registration.
    ///
    /// The order of the returned list must be stable between calls for an
    /// unchanged data set; deliveries are issued in this order.
    async fn find_all_active(&self) -> Result<Vec<WebhookRegistration>, RepositoryError>;
}
