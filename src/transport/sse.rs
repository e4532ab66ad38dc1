//! SSE transport.
//!
//! Legacy HTTP binding: an SSE event stream at the configured path and a
//! companion POST endpoint for client messages. Kept for clients that have
//! not moved to streamable HTTP.

use crate::error::{GatewayError, GatewayResult};
use crate::mcp::OpenGaussService;
use crate::transport::{Transport, wait_for_signal};
use rmcp::transport::sse_server::{SseServer, SseServerConfig};
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;
use tracing::info;

const POST_PATH: &str = "/message";

pub struct SseTransport {
    service: OpenGaussService,
    host: String,
    port: u16,
    sse_path: String,
}

impl SseTransport {
    pub fn new(
        service: OpenGaussService,
        host: impl Into<String>,
        port: u16,
        sse_path: impl Into<String>,
    ) -> Self {
        Self {
            service,
            host: host.into(),
            port,
            sse_path: sse_path.into(),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Transport for SseTransport {
    async fn run(&self) -> GatewayResult<()> {
        let bind_addr = self.bind_addr();
        let bind: SocketAddr = bind_addr.parse().map_err(|e| {
            GatewayError::config(format!("invalid bind address {}: {}", bind_addr, e))
        })?;

        info!("Starting MCP server with SSE transport on {}", bind_addr);

        let config = SseServerConfig {
            bind,
            sse_path: self.sse_path.clone(),
            post_path: POST_PATH.to_string(),
            ct: CancellationToken::new(),
            sse_keep_alive: None,
        };

        let sse_server = SseServer::serve_with_config(config).await.map_err(|e| {
            GatewayError::internal(format!("Failed to start SSE transport: {}", e))
        })?;

        let service = self.service.clone();
        let ct = sse_server.with_service(move || service.clone());

        info!(sse_path = %self.sse_path, "SSE endpoint ready");

        wait_for_signal().await;
        ct.cancel();

        info!("SSE server stopped");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sse"
    }
}
