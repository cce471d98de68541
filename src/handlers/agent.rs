use crate::agent::AgentResponse;
use crate::error::{AppError, Result};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct AgentQueryRequest {
    pub query: String,
}

/// POST /agent/query - Parse, call the tool through this gateway, attach context.
pub async fn agent_query_handler(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<AgentQueryRequest>, JsonRejection>,
) -> Result<Json<AgentResponse>> {
    let Json(request) = payload?;

    if request.query.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Query cannot be empty".to_string(),
        ));
    }

    let response = state.agent().handle(&request.query).await?;

    tracing::debug!(
        tool = response.parsed.tool.as_str(),
        action = %response.parsed.action,
        context_chunks = response.rag_context_preview.len(),
        "Agent query completed"
    );

    Ok(Json(response))
}
