//! DOF MCP Server Binary
//!
//! Runs the DOF MCP server on stdio transport, forwarding agent commands to a
//! running Isaac Sim instance.
//!
//! ## Usage
//!
//! Run directly:
//! ```bash
//! dof-mcp --host 127.0.0.1 --port 8226
//! ```
//!
//! Or add to Claude Desktop's MCP configuration:
//! ```json
//! {
//!   "mcpServers": {
//!     "dof-sim": {
//!       "command": "dof-mcp",
//!       "env": { "DOF_TIMEOUT_SECS": "120" }
//!     }
//!   }
//! }
//! ```

use anyhow::Result;
use clap::Parser;
use dof_core::ClientConfig;
use dof_core::args::ConnectionArgs;
use rmcp::ServiceExt;
use rmcp::transport::io::stdio;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use dof_mcp::DofMcpService;
use dof_mcp::state::SimState;

#[derive(Parser)]
#[command(name = "dof-mcp")]
#[command(about = "MCP server that drives Isaac Sim through its code-injection bridge", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // CRITICAL: Log to stderr only - stdout is reserved for MCP JSON-RPC
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ClientConfig::from(cli.connection);
    info!(
        "DOF MCP server v{} targeting Isaac Sim at {}",
        env!("CARGO_PKG_VERSION"),
        config.addr()
    );

    let service = DofMcpService::new(SimState::spawn(config));
    let server = service.serve(stdio()).await?;

    info!("Ready. Listening on stdio...");

    // Wait for client to disconnect or error
    server.waiting().await?;

    info!("Client disconnected. Shutting down.");
    Ok(())
}
