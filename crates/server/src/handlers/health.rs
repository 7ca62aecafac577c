//! Liveness endpoint.

use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Latest committed metadata snapshot.
    pub store_version: u64,
}

/// GET /health - Health check.
///
/// Unauthenticated, for load balancers and health checks. Returns only
/// non-sensitive information.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        store_version: state.store.version(),
    })
}
