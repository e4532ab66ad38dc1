//! openGauss MCP Server - Main entry point.
//!
//! Exposes an openGauss database to MCP clients (typically AI assistants)
//! over stdio, SSE, or streamable HTTP.

use clap::Parser;
use opengauss_mcp_server::config::{Config, EnvConfigProvider, SchemaScope, TransportMode};
use opengauss_mcp_server::mcp::OpenGaussService;
use opengauss_mcp_server::transport::{HttpTransport, SseTransport, StdioTransport, Transport};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// Output goes to stderr: the stdio transport owns stdout for protocol
/// messages. `RUST_LOG` overrides the CLI/LOG_LEVEL setting when present.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.tracing_directive()));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();

    init_tracing(&config);

    // Database parameters are re-resolved per call; only the listing scope
    // policy is fixed at startup.
    let scope = SchemaScope::from_env()?;
    let service = OpenGaussService::new(Arc::new(EnvConfigProvider), scope);

    info!(
        transport = %config.transport,
        "Starting openGauss MCP Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let result = match config.transport {
        TransportMode::Stdio => {
            let transport = StdioTransport::new(service);
            transport.run().await
        }
        TransportMode::Sse => {
            let transport =
                SseTransport::new(service, &config.host, config.port, config.endpoint());
            transport.run().await
        }
        TransportMode::StreamableHttp => {
            let transport =
                HttpTransport::new(service, &config.host, config.port, config.endpoint());
            transport.run().await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
