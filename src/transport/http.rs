//! Streamable HTTP transport.
//!
//! Hosts the MCP service behind an axum router at a configurable endpoint,
//! with streaming responses and per-session state handled by rmcp.

use crate::error::{GatewayError, GatewayResult};
use crate::mcp::OpenGaussService;
use crate::transport::{Transport, wait_for_signal};
use rmcp::transport::streamable_http_server::{
    StreamableHttpService, session::local::LocalSessionManager,
};
use tokio::net::TcpListener;
use tracing::{error, info};

pub struct HttpTransport {
    service: OpenGaussService,
    host: String,
    port: u16,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(
        service: OpenGaussService,
        host: impl Into<String>,
        port: u16,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            service,
            host: host.into(),
            port,
            endpoint: endpoint.into(),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Transport for HttpTransport {
    async fn run(&self) -> GatewayResult<()> {
        let bind_addr = self.bind_addr();
        info!("Starting MCP server with streamable HTTP transport on {}", bind_addr);

        let mcp_service = self.service.clone();
        let service = StreamableHttpService::new(
            move || Ok(mcp_service.clone()),
            LocalSessionManager::default().into(),
            Default::default(),
        );

        // nest_service doesn't support the root path; fall back for "/"
        let app = if self.endpoint == "/" {
            axum::Router::new().fallback_service(service)
        } else {
            axum::Router::new().nest_service(&self.endpoint, service)
        };

        let listener = TcpListener::bind(&bind_addr).await.map_err(|e| {
            GatewayError::internal(format!("Failed to bind to {}: {}", bind_addr, e))
        })?;

        info!(endpoint = %self.endpoint, "MCP endpoint ready");

        let server = axum::serve(listener, app).with_graceful_shutdown(wait_for_signal());
        if let Err(e) = server.await {
            error!(error = %e, "HTTP server error");
            return Err(GatewayError::internal(format!("HTTP server error: {}", e)));
        }

        info!("HTTP server stopped");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "streamable-http"
    }
}
