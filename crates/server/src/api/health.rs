use axum::Json;
use axum::extract::State;
use serde::Serialize;

use hookcast_dispatcher::DispatchMetricsSnapshot;
use hookcast_registry::CacheStats;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub dispatch: DispatchMetricsSnapshot,
    pub cache: CacheStats,
}

/// `GET /health` -- returns service status together with dispatch and cache
/// counters.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        dispatch: state.dispatcher.metrics().snapshot(),
        cache: state.dispatcher.cache().stats().await,
    })
}
