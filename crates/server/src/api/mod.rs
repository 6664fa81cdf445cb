pub mod events;
pub mod health;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use hookcast_dispatcher::Dispatcher;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The dispatcher every published event goes through.
    pub dispatcher: Arc<Dispatcher>,
}

/// Build the Axum router with all API routes and middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/v1/events", post(events::publish))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
