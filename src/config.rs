use crate::agent::{DEFAULT_CONTEXT_K, DEFAULT_PREVIEW_CHARS};
use crate::inference::{DEFAULT_EMBEDDING_BASE_URL, DEFAULT_EMBEDDING_MODEL, DEFAULT_HASH_DIM};
use crate::ingestion::{Chunker, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use crate::registry::TargetRegistry;
use crate::retrieval::DEFAULT_TOP_K;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
    /// Backend base URLs, one per tool.
    pub targets: TargetRegistry,
    /// Root of the retrieval corpus.
    pub docs_path: PathBuf,
    /// Window length in characters.
    pub chunk_size: usize,
    /// Characters shared by consecutive windows. Must be smaller than `chunk_size`.
    pub chunk_overlap: usize,
    /// Default number of chunks a retrieval returns.
    pub top_k: usize,
    /// Chunks the agent attaches to each answer.
    pub context_k: usize,
    /// Characters kept from each chunk in agent previews.
    pub preview_chars: usize,
    /// Enables network embeddings when set. Otherwise the hash embedder is used.
    pub embedding_api_key: Option<String>,
    pub embedding_base_url: String,
    pub embedding_model: String,
    /// Output dimension of the hash embedder.
    pub embedding_dim: usize,
    /// Gateway address used by the agent CLI.
    pub gateway_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout_secs: 5,
            targets: TargetRegistry::default(),
            docs_path: PathBuf::from("./mock_knowledge_base"),
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            top_k: DEFAULT_TOP_K,
            context_k: DEFAULT_CONTEXT_K,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            embedding_api_key: None,
            embedding_base_url: DEFAULT_EMBEDDING_BASE_URL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_dim: DEFAULT_HASH_DIM,
            gateway_url: "http://localhost:8080".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// Backend URLs come from `FILESYSTEM_MCP_URL`, `GITHUB_MCP_URL`,
    /// `ATLASSIAN_MCP_URL` and `GDRIVE_MCP_URL`. Network embeddings are enabled
    /// by `EMBEDDING_API_KEY` (or `OPENAI_API_KEY`).
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let config = Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env::var("PORT")
                .unwrap_or_else(|_| defaults.port.to_string())
                .parse()?,
            shutdown_timeout_secs: env::var("SHUTDOWN_TIMEOUT")
                .unwrap_or_else(|_| defaults.shutdown_timeout_secs.to_string())
                .parse()?,
            targets: TargetRegistry::from_env(),
            docs_path: env::var("DOCS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.docs_path),
            chunk_size: env::var("CHUNK_SIZE")
                .unwrap_or_else(|_| defaults.chunk_size.to_string())
                .parse()?,
            chunk_overlap: env::var("CHUNK_OVERLAP")
                .unwrap_or_else(|_| defaults.chunk_overlap.to_string())
                .parse()?,
            top_k: env::var("RAG_TOP_K")
                .unwrap_or_else(|_| defaults.top_k.to_string())
                .parse()?,
            context_k: defaults.context_k,
            preview_chars: env::var("RAG_PREVIEW_CHARS")
                .unwrap_or_else(|_| defaults.preview_chars.to_string())
                .parse()?,
            embedding_api_key: env::var("EMBEDDING_API_KEY")
                .or_else(|_| env::var("OPENAI_API_KEY"))
                .ok()
                .filter(|k| !k.is_empty()),
            embedding_base_url: env::var("EMBEDDING_BASE_URL")
                .unwrap_or(defaults.embedding_base_url),
            embedding_model: env::var("EMBEDDING_MODEL").unwrap_or(defaults.embedding_model),
            embedding_dim: env::var("EMBEDDING_DIM")
                .unwrap_or_else(|_| defaults.embedding_dim.to_string())
                .parse()?,
            gateway_url: env::var("GATEWAY_URL").unwrap_or(defaults.gateway_url),
        };

        config.chunker()?;
        Ok(config)
    }

    /// Chunker for the configured window, rejecting `overlap >= size`.
    pub fn chunker(&self) -> anyhow::Result<Chunker> {
        Chunker::new(self.chunk_size, self.chunk_overlap).ok_or_else(|| {
            anyhow::anyhow!(
                "CHUNK_OVERLAP ({}) must be smaller than CHUNK_SIZE ({}), and CHUNK_SIZE must be positive",
                self.chunk_overlap,
                self.chunk_size
            )
        })
    }
}
