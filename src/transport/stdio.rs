//! Stdio transport.
//!
//! Reads JSON-RPC messages from stdin and writes responses to stdout for a
//! single peer. Logging goes to stderr so the protocol stream stays clean.

use crate::error::{GatewayError, GatewayResult};
use crate::mcp::OpenGaussService;
use crate::transport::{Transport, wait_for_signal};
use rmcp::{ServiceExt, transport::stdio};
use tracing::info;

pub struct StdioTransport {
    service: OpenGaussService,
}

impl StdioTransport {
    pub fn new(service: OpenGaussService) -> Self {
        Self { service }
    }
}

impl Transport for StdioTransport {
    async fn run(&self) -> GatewayResult<()> {
        info!("Starting MCP server with stdio transport");

        let running_service = self
            .service
            .clone()
            .serve(stdio())
            .await
            .map_err(|e| GatewayError::internal(format!("Failed to start stdio transport: {}", e)))?;

        tokio::select! {
            result = running_service.waiting() => {
                match result {
                    Ok(_quit_reason) => info!("Stdio transport completed normally"),
                    Err(e) => {
                        return Err(GatewayError::internal(format!(
                            "Stdio transport error: {}",
                            e
                        )));
                    }
                }
            }
            _ = wait_for_signal() => {
                info!("Shutdown signal received");
                // tokio::select! cannot interrupt blocking stdin reads, so
                // leave via the process rather than waiting on the peer.
                std::process::exit(0);
            }
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "stdio"
    }
}
