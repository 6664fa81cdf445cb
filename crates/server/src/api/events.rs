use axum::Json;
use axum::extract::State;
use serde::Serialize;

use hookcast_core::{DeliveryOutcome, EventRecord};

use crate::error::ServerError;

use super::AppState;

/// Response body of `POST /v1/events`.
#[derive(Debug, Serialize)]
pub struct PublishResponse {
    /// Successful deliveries, in registration order.
    pub delivered: Vec<DeliveryOutcome>,
}

/// `POST /v1/events` -- fan an event out to every subscribed webhook.
///
/// Failed deliveries are not reported individually; they are absent from
/// `delivered`. Returns 503 when the registrations cannot be loaded.
pub async fn publish(
    State(state): State<AppState>,
    Json(event): Json<EventRecord>,
) -> Result<Json<PublishResponse>, ServerError> {
    let delivered = state.dispatcher.dispatch(&event).await?;
    Ok(Json(PublishResponse { delivered }))
}
