//! In-memory vector index over document chunks.
//!
//! The index is filled by [`Retriever::ingest`] and only read afterwards.
//! Queries are a full linear scan: every stored vector is scored against the
//! query by cosine similarity, which for L2-normalized vectors is a dot product.

use crate::error::{AppError, Result};
use crate::inference::Embedder;
use crate::ingestion::{load_documents, Chunker, DocumentChunk};
use async_trait::async_trait;
use ndarray::Array1;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// Default number of results for a query.
pub const DEFAULT_TOP_K: usize = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredChunk {
    #[serde(flatten)]
    pub chunk: DocumentChunk,
    pub score: f32,
}

pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    chunker: Chunker,
    chunks: Vec<DocumentChunk>,
    /// One normalized vector per entry of `chunks`, same order.
    embeddings: Vec<Array1<f32>>,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>, chunker: Chunker) -> Self {
        Self {
            embedder,
            chunker,
            chunks: Vec::new(),
            embeddings: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunks(&self) -> &[DocumentChunk] {
        &self.chunks
    }

    /// Load, chunk, and embed every file under `dir`. Returns the number of chunks added.
    ///
    /// Unreadable files are skipped (see [`load_documents`]). An embedding
    /// failure aborts the call and leaves the index unchanged.
    pub async fn ingest(&mut self, dir: &Path) -> Result<usize> {
        let start = std::time::Instant::now();
        let documents = load_documents(dir).await?;

        let new_chunks: Vec<DocumentChunk> = documents
            .iter()
            .flat_map(|doc| self.chunker.split(&doc.contents, &doc.path))
            .collect();

        if new_chunks.is_empty() {
            tracing::warn!(dir = %dir.display(), "No text found to ingest");
            return Ok(0);
        }

        let texts: Vec<String> = new_chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts).await?;

        if vectors.len() != new_chunks.len() {
            return Err(AppError::EmbeddingError(format!(
                "Expected {} embeddings, got {}",
                new_chunks.len(),
                vectors.len()
            )));
        }

        // All vectors in the index share the dimension of the first one stored.
        let dim = self
            .embeddings
            .first()
            .map(|e| e.len())
            .unwrap_or(vectors[0].len());
        let mut new_embeddings = Vec::with_capacity(vectors.len());
        for vector in vectors {
            if vector.len() != dim || dim == 0 {
                return Err(AppError::EmbeddingError(format!(
                    "Embedding dimension mismatch: expected {}, got {}",
                    dim,
                    vector.len()
                )));
            }
            new_embeddings.push(normalize(Array1::from(vector)));
        }

        let added = new_chunks.len();
        self.chunks.extend(new_chunks);
        self.embeddings.extend(new_embeddings);

        metrics::counter!("retrieval_chunks_ingested_total").increment(added as u64);
        tracing::info!(
            dir = %dir.display(),
            documents = documents.len(),
            chunks = added,
            embedder = self.embedder.name(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Ingestion complete"
        );

        Ok(added)
    }

    /// Top `k` chunks by descending cosine similarity to `query`.
    /// Equal scores keep ingestion order.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        if k == 0 || self.chunks.is_empty() {
            return Ok(Vec::new());
        }

        let query_vec = Array1::from(self.embedder.embed(query).await?);
        let dim = self.embeddings[0].len();
        if query_vec.len() != dim {
            return Err(AppError::EmbeddingError(format!(
                "Query embedding has dimension {}, index has {}",
                query_vec.len(),
                dim
            )));
        }
        let query_vec = normalize(query_vec);

        let similarities = cosine_similarity(&query_vec, &self.embeddings);

        let mut indexed: Vec<(usize, f32)> = similarities.into_iter().enumerate().collect();
        // Stable sort: ties stay in insertion order.
        indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        metrics::counter!("retrieval_queries_total").increment(1);

        Ok(indexed
            .into_iter()
            .take(k)
            .map(|(idx, score)| ScoredChunk {
                chunk: self.chunks[idx].clone(),
                score,
            })
            .collect())
    }
}

/// Where the agent gets its index from: a ready [`Retriever`], or one that is
/// built on first use.
#[async_trait]
pub trait ContextSource: Send + Sync {
    async fn retriever(&self) -> Result<Arc<Retriever>>;
}

#[async_trait]
impl ContextSource for Arc<Retriever> {
    async fn retriever(&self) -> Result<Arc<Retriever>> {
        Ok(Arc::clone(self))
    }
}

/// Dot product of a normalized query against each normalized document vector.
pub fn cosine_similarity(query: &Array1<f32>, docs: &[Array1<f32>]) -> Vec<f32> {
    docs.iter().map(|doc| query.dot(doc)).collect()
}

fn normalize(mut v: Array1<f32>) -> Array1<f32> {
    let norm = v.dot(&v).sqrt();
    if norm > 0.0 {
        v.mapv_inplace(|x| x / norm);
    }
    v
}
