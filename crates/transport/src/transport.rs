use async_trait::async_trait;
use hookcast_core::{DeliveryOutcome, EventRecord, WebhookRegistration};

use crate::error::TransportError;

/// Strongly-typed transport trait with native `async fn`.
///
/// This trait is **not** object-safe because it uses native `async fn`
/// methods. If you need dynamic dispatch, use [`DynTransport`] instead --
/// every `Transport` automatically implements `DynTransport` via a blanket
/// implementation.
pub trait Transport: Send + Sync {
    /// Returns the name of this transport, used in logs.
    fn name(&self) -> &str;

    /// POST `event` to the endpoint of `target`.
    ///
    /// Returns an outcome only when the endpoint accepted the delivery;
    /// network errors, timeouts and rejected statuses are errors.
    fn post(
        &self,
        target: &WebhookRegistration,
        event: &EventRecord,
    ) -> impl std::future::Future<Output = Result<DeliveryOutcome, TransportError>> + Send;
}

/// Object-safe transport trait for use behind `Arc<dyn DynTransport>`.
///
/// You generally should not implement this trait directly -- instead
/// implement [`Transport`] and rely on the blanket implementation.
#[async_trait]
pub trait DynTransport: Send + Sync {
    fn name(&self) -> &str;

    async fn post(
        &self,
        target: &WebhookRegistration,
        event: &EventRecord,
    ) -> Result<DeliveryOutcome, TransportError>;
}

#[async_trait]
impl<T: Transport + Sync> DynTransport for T {
    fn name(&self) -> &str {
        Transport::name(self)
    }

    async fn post(
        &self,
        target: &WebhookRegistration,
        event: &EventRecord,
    ) -> Result<DeliveryOutcome, TransportError> {
        Transport::post(self, target, event).await
    }
}
