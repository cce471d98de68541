pub mod agent;
pub mod health;
pub mod mcp;
pub mod search;

pub use agent::agent_query_handler;
pub use health::health_handler;
pub use mcp::{get_methods_handler, get_methods_post_handler, route_handler};
pub use search::search_handler;

use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// All gateway routes, without middleware or the metrics endpoint.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/mcp/get_methods",
            get(get_methods_handler).post(get_methods_post_handler),
        )
        .route("/mcp/:target", post(route_handler))
        .route("/agent/query", post(agent_query_handler))
        .route("/rag/search", post(search_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}
