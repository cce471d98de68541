pub mod hash;
pub mod remote;

pub use hash::{HashEmbedder, DEFAULT_HASH_DIM};
pub use remote::{HttpEmbedder, DEFAULT_EMBEDDING_BASE_URL, DEFAULT_EMBEDDING_MODEL};

use crate::config::Config;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Maps text to fixed-length vectors. The same embedder must serve both
/// ingestion and queries so their vectors are comparable.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn name(&self) -> &str;

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::EmbeddingError("No embedding returned".to_string()))
    }
}

/// Network embeddings when an API key is configured, the hash fallback otherwise.
pub fn embedder_from_config(config: &Config) -> Result<Arc<dyn Embedder>> {
    match &config.embedding_api_key {
        Some(key) => {
            tracing::info!(
                base_url = %config.embedding_base_url,
                model = %config.embedding_model,
                "Using network embeddings"
            );
            Ok(Arc::new(HttpEmbedder::new(
                &config.embedding_base_url,
                key.clone(),
                config.embedding_model.clone(),
            )?))
        }
        None => {
            tracing::info!(dim = config.embedding_dim, "Using deterministic hash embeddings");
            Ok(Arc::new(HashEmbedder::new(config.embedding_dim)))
        }
    }
}
