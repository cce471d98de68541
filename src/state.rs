use crate::agent::{Agent, AgentOptions};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::gateway::{Gateway, GatewayOptions};
use crate::inference::{embedder_from_config, Embedder};
use crate::ingestion::Chunker;
use crate::retrieval::{ContextSource, Retriever};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Application state shared across all request handlers.
///
/// The gateway is ready at construction. The retrieval index is built on
/// first use and then shared read-only for the life of the process.
pub struct AppState {
    pub gateway: Gateway,
    pub config: Arc<Config>,
    embedder: Arc<dyn Embedder>,
    chunker: Chunker,
    retriever: OnceCell<Arc<Retriever>>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let embedder = embedder_from_config(&config)?;
        Self::with_embedder(config, GatewayOptions::default(), embedder)
    }

    /// Build with explicit gateway deadlines and embedder.
    pub fn with_embedder(
        config: Config,
        gateway_options: GatewayOptions,
        embedder: Arc<dyn Embedder>,
    ) -> anyhow::Result<Self> {
        let chunker = config.chunker()?;
        let gateway = Gateway::new(config.targets.clone(), gateway_options)?;

        Ok(Self {
            gateway,
            config: Arc::new(config),
            embedder,
            chunker,
            retriever: OnceCell::new(),
        })
    }

    /// The retrieval index, ingesting `docs_path` on the first call.
    ///
    /// A failed build is not cached; the next caller retries it.
    pub async fn retriever(&self) -> Result<Arc<Retriever>> {
        self.retriever
            .get_or_try_init(|| async {
                let mut retriever = Retriever::new(Arc::clone(&self.embedder), self.chunker);
                retriever.ingest(&self.config.docs_path).await?;
                Ok::<_, AppError>(Arc::new(retriever))
            })
            .await
            .map(Arc::clone)
    }

    /// Whether the retrieval index has been built.
    pub fn index_loaded(&self) -> bool {
        self.retriever.initialized()
    }

    /// An agent wired to the in-process gateway. The index is resolved only
    /// after the tool call.
    pub fn agent(self: &Arc<Self>) -> Agent<Gateway, Arc<AppState>> {
        Agent::new(
            self.gateway.clone(),
            Arc::clone(self),
            AgentOptions {
                context_k: self.config.context_k,
                preview_chars: self.config.preview_chars,
            },
        )
    }
}

#[async_trait]
impl ContextSource for Arc<AppState> {
    async fn retriever(&self) -> Result<Arc<Retriever>> {
        AppState::retriever(self).await
    }
}
