//! Serves the canned tool backends.
//!
//! Without arguments all four run on their default ports (8001-8004).

use clap::Parser;
use mcp_relay::{init_tracing, mock, Tool};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[derive(Debug, Parser)]
#[command(name = "mock-mcp", version, about = "Canned MCP tool backends")]
struct Args {
    /// Serve only this tool (filesystem, github, atlassian, gdrive).
    #[arg(long)]
    tool: Option<Tool>,

    /// Port for `--tool`; defaults to the tool's standard port.
    #[arg(long, requires = "tool")]
    port: Option<u16>,

    /// Interface to bind.
    #[arg(long, env = "MOCK_HOST", default_value = "127.0.0.1")]
    host: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("mcp_relay=debug,tower_http=info", false);
    let args = Args::parse();

    let backends: Vec<(Tool, u16)> = match args.tool {
        Some(tool) => vec![(tool, args.port.unwrap_or(tool.default_port()))],
        None => Tool::ALL.into_iter().map(|t| (t, t.default_port())).collect(),
    };

    let mut servers = tokio::task::JoinSet::new();
    for (tool, port) in backends {
        let addr: SocketAddr = format!("{}:{}", args.host, port).parse()?;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(tool = tool.as_str(), address = %addr, "Mock backend listening");

        let app = mock::router(tool).layer(TraceLayer::new_for_http());
        servers.spawn(async move { axum::serve(listener, app).await });
    }

    tokio::select! {
        Some(result) = servers.join_next() => {
            result??;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl+C, stopping mock backends");
        }
    }

    Ok(())
}
