use crate::error::Result;
use crate::gateway::{AggregatedMethods, Relayed};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

/// POST /mcp/:target - Forward a JSON-RPC request to one backend.
///
/// # Responses
/// - 200 with the backend's body, unmodified
/// - 404 `{ error: "Unknown target <name>" }`
/// - 400 for a body that is not a JSON-RPC request
/// - backend status (or 500) with `{ error, details? }` for downstream failures
pub async fn route_handler(
    State(state): State<Arc<AppState>>,
    Path(target): Path<String>,
    body: Bytes,
) -> Result<Relayed> {
    state.gateway.route(&target, &body).await
}

/// POST /mcp/get_methods - `get_methods` is not a target; answered like any unknown name.
pub async fn get_methods_post_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Relayed> {
    state.gateway.route(GET_METHODS_PATH, &body).await
}

const GET_METHODS_PATH: &str = "get_methods";

/// GET /mcp/get_methods - Method listings from every backend.
///
/// Always 200; a failing backend shows up as an error string at its position.
pub async fn get_methods_handler(State(state): State<Arc<AppState>>) -> Json<AggregatedMethods> {
    let aggregated = state.gateway.aggregate_methods().await;

    let failed = aggregated.entries.iter().filter(|(_, r)| r.is_err()).count();
    tracing::info!(
        targets = aggregated.entries.len(),
        failed,
        "get_methods aggregation completed"
    );

    Json(aggregated)
}
