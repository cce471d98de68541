//! mcp-relay - MCP demo gateway
//!
//! Routes JSON-RPC calls to tool backends, aggregates their method listings,
//! and answers agent queries with an in-memory retrieval index alongside.

pub mod agent;
pub mod config;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod inference;
pub mod ingestion;
pub mod jsonrpc;
pub mod mock;
pub mod registry;
pub mod retrieval;
pub mod state;

// Re-export key types for convenience
pub use agent::{parse, Agent, AgentOptions, AgentResponse, ParsedQuery};
pub use config::Config;
pub use error::{AppError, Result};
pub use gateway::{Gateway, GatewayOptions, HttpGatewayClient, ToolGateway};
pub use inference::{Embedder, HashEmbedder, HttpEmbedder};
pub use ingestion::{Chunker, DocumentChunk};
pub use registry::{Target, TargetRegistry, Tool};
pub use retrieval::{ContextSource, Retriever, ScoredChunk};
pub use state::AppState;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides `default_filter`; `LOG_FORMAT=json` switches to JSON
/// lines. With `to_stderr`, stdout stays free for program output.
pub fn init_tracing(default_filter: &str, to_stderr: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    match (json, to_stderr) {
        (true, true) => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        (true, false) => registry.with(fmt::layer().json()).init(),
        (false, true) => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        (false, false) => registry.with(fmt::layer()).init(),
    }
}
