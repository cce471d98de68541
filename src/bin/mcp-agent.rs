//! Single-shot agent query against a running gateway.
//!
//! ```text
//! mcp-agent filesystem list_files path=./src
//! ```

use clap::Parser;
use mcp_relay::gateway::CLIENT_TIMEOUT;
use mcp_relay::inference::embedder_from_config;
use mcp_relay::{init_tracing, Agent, AgentOptions, Config, HttpGatewayClient, Retriever};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "mcp-agent", version, about = "Run one agent query and print the JSON answer")]
struct Args {
    /// Gateway base URL.
    #[arg(long, env = "GATEWAY_URL")]
    gateway_url: Option<String>,

    /// Documents directory for retrieval context.
    #[arg(long, env = "DOCS_PATH")]
    docs: Option<PathBuf>,

    /// Print single-line JSON.
    #[arg(long)]
    compact: bool,

    /// Query words, e.g. `github list_commits`.
    #[arg(required = true, trailing_var_arg = true)]
    query: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("mcp_relay=warn", true);
    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(url) = args.gateway_url {
        config.gateway_url = url;
    }
    if let Some(docs) = args.docs {
        config.docs_path = docs;
    }

    let embedder = embedder_from_config(&config)?;
    let mut retriever = Retriever::new(embedder, config.chunker()?);
    retriever.ingest(&config.docs_path).await?;

    let gateway = HttpGatewayClient::new(&config.gateway_url, CLIENT_TIMEOUT)?;
    let agent = Agent::new(
        gateway,
        Arc::new(retriever),
        AgentOptions {
            context_k: config.context_k,
            preview_chars: config.preview_chars,
        },
    );

    let response = agent.handle(&args.query.join(" ")).await?;

    let output = if args.compact {
        serde_json::to_string(&response)?
    } else {
        serde_json::to_string_pretty(&response)?
    };
    println!("{}", output);

    Ok(())
}
