//! openGauss MCP Server Library
//!
//! Exposes an openGauss database to MCP clients through a fixed set of tools
//! and resources. Each operation resolves its configuration from the
//! environment and runs on its own short-lived connection.

pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod mcp;
pub mod sql;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::GatewayError;
pub use mcp::OpenGaussService;
