//! Retrieval endpoint: nearest chunks for a free-text query.

use crate::error::{AppError, Result};
use crate::retrieval::ScoredChunk;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// Free text matched against the corpus
    pub query: String,
    /// Number of chunks to return (default: configured top-k)
    #[serde(default)]
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<ScoredChunk>,
}

/// POST /rag/search - Top-k chunks by cosine similarity.
///
/// The first call builds the index from `DOCS_PATH`.
pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>> {
    let start_time = std::time::Instant::now();
    let Json(request) = payload?;

    if request.query.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Query cannot be empty".to_string(),
        ));
    }

    let top_k = request.top_k.unwrap_or(state.config.top_k);
    if top_k == 0 {
        return Err(AppError::ValidationError(
            "top_k must be at least 1".to_string(),
        ));
    }

    let retriever = state.retriever().await?;
    let results = retriever.retrieve(&request.query, top_k).await?;

    tracing::info!(
        query = %request.query,
        top_k,
        returned = results.len(),
        total_ms = start_time.elapsed().as_millis() as u64,
        "Search completed"
    );

    Ok(Json(SearchResponse { results }))
}
