//! MCP Search Server
//!
//! Serves the `fetch_web_content` tool over HTTP. Refuses to start without
//! `CLAUDE_API_KEY`.

use clap::Parser;
use mcp_search_bridge::mcp::ToolBridge;
use mcp_search_bridge::server::{self, AppContext};
use mcp_search_bridge::{logging, Config, VERSION};
use std::net::SocketAddr;
use tracing::{error, info};

#[derive(Parser)]
#[command(
    name = "mcp-search-server",
    version = VERSION,
    about = "Tool server exposing web search to MCP agents"
)]
struct Args {
    /// Bind address (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port (overrides PORT)
    #[arg(long, short)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    logging::init(&config.log);

    let bridge = ToolBridge::from_config(&config).inspect_err(|e| {
        error!(error = %e, "Cannot start MCP server");
    })?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!(version = VERSION, "Starting MCP server on http://{}", addr);

    server::serve(AppContext::new(bridge), addr).await?;

    info!("MCP server stopped");
    Ok(())
}
