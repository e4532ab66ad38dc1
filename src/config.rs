//! Configuration handling for the openGauss MCP gateway.
//!
//! Two layers of configuration live here. Process-level settings (transport,
//! bind address, log level) come from CLI arguments and are fixed for the
//! process lifetime. Database connection parameters come from `OPENGAUSS_*`
//! environment variables and are re-resolved on every single operation, so a
//! fixed environment heals subsequent calls without a restart.

use crate::error::{GatewayError, GatewayResult};
use clap::{Parser, ValueEnum};

pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_PORT: u16 = 5432;

pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
pub const DEFAULT_HTTP_PORT: u16 = 8000;
pub const DEFAULT_SSE_PATH: &str = "/sse";
pub const DEFAULT_MCP_PATH: &str = "/mcp";

pub const ENV_DB_HOST: &str = "OPENGAUSS_HOST";
pub const ENV_DB_PORT: &str = "OPENGAUSS_PORT";
pub const ENV_DB_USER: &str = "OPENGAUSS_USER";
pub const ENV_DB_PASSWORD: &str = "OPENGAUSS_PASSWORD";
pub const ENV_DB_NAME: &str = "OPENGAUSS_DBNAME";
pub const ENV_SCHEMA_SCOPE: &str = "OPENGAUSS_SCHEMA_SCOPE";

/// Transport mode for the MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportMode {
    /// Standard input/output (for single-client embedding)
    #[default]
    Stdio,
    /// HTTP with Server-Sent Events (legacy streaming clients)
    Sse,
    /// Streamable HTTP (current MCP streaming transport)
    StreamableHttp,
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdio => write!(f, "stdio"),
            Self::Sse => write!(f, "sse"),
            Self::StreamableHttp => write!(f, "streamable-http"),
        }
    }
}

/// Which schemas the qualified table listing covers.
///
/// The policy is deliberately explicit configuration rather than a hardcoded
/// choice: deployments differ on whether agents should see only the session's
/// current schema or also everything in `public` and the user's own schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaScope {
    /// Only the session's current schema (default)
    #[default]
    Current,
    /// `public` plus the configured user's own schema
    PublicAndUser,
}

impl SchemaScope {
    /// Parse the scope from `OPENGAUSS_SCHEMA_SCOPE`. Unset means `Current`;
    /// an unrecognized value is a configuration error.
    pub fn resolve_from<F>(lookup: F) -> GatewayResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(ENV_SCHEMA_SCOPE).as_deref() {
            None | Some("") | Some("current") => Ok(Self::Current),
            Some("public-and-user") => Ok(Self::PublicAndUser),
            Some(other) => Err(GatewayError::config(format!(
                "invalid {}: '{}' (expected 'current' or 'public-and-user')",
                ENV_SCHEMA_SCOPE, other
            ))),
        }
    }

    pub fn from_env() -> GatewayResult<Self> {
        Self::resolve_from(|key| std::env::var(key).ok())
    }
}

/// Database connection parameters for one operation.
///
/// Never cached: every handler resolves a fresh copy so each call observes
/// the current environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
}

impl DbConfig {
    /// Resolve connection parameters through an arbitrary lookup function.
    ///
    /// Host and port default to `localhost:5432`; user, password, and dbname
    /// are required and must be non-empty. Tests inject a map-backed lookup
    /// here instead of mutating the process environment.
    pub fn resolve_from<F>(lookup: F) -> GatewayResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(ENV_DB_HOST)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_DB_HOST.to_string());

        let port = match lookup(ENV_DB_PORT).filter(|v| !v.is_empty()) {
            None => DEFAULT_DB_PORT,
            Some(raw) => raw.parse().map_err(|_| {
                GatewayError::config(format!("invalid {}: '{}'", ENV_DB_PORT, raw))
            })?,
        };

        let user = lookup(ENV_DB_USER).filter(|v| !v.is_empty());
        let password = lookup(ENV_DB_PASSWORD).filter(|v| !v.is_empty());
        let dbname = lookup(ENV_DB_NAME).filter(|v| !v.is_empty());

        match (user, password, dbname) {
            (Some(user), Some(password), Some(dbname)) => Ok(Self {
                host,
                port,
                user,
                password,
                dbname,
            }),
            _ => Err(GatewayError::config(
                "missing required database configuration",
            )),
        }
    }

    /// Resolve connection parameters from the process environment.
    pub fn from_env() -> GatewayResult<Self> {
        Self::resolve_from(|key| std::env::var(key).ok())
    }
}

/// Source of per-call database configuration.
///
/// Handlers receive a provider instead of reading the environment directly,
/// so tests can run against fixed or failing configurations.
pub trait ConfigProvider: Send + Sync {
    fn resolve(&self) -> GatewayResult<DbConfig>;
}

/// Production provider: reads `OPENGAUSS_*` from the process environment on
/// every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvConfigProvider;

impl ConfigProvider for EnvConfigProvider {
    fn resolve(&self) -> GatewayResult<DbConfig> {
        DbConfig::from_env()
    }
}

/// Provider returning a fixed configuration. Used by tests and embedders that
/// manage their own configuration lifecycle.
#[derive(Debug, Clone)]
pub struct StaticConfigProvider(pub DbConfig);

impl ConfigProvider for StaticConfigProvider {
    fn resolve(&self) -> GatewayResult<DbConfig> {
        Ok(self.0.clone())
    }
}

/// Configuration for the openGauss MCP gateway process.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "opengauss-mcp-server",
    about = "MCP server exposing an openGauss database to AI assistants",
    version
)]
pub struct Config {
    /// Transport for MCP protocol messages (stdio, sse or streamable-http)
    #[arg(short, long, value_enum, default_value = "stdio")]
    pub transport: TransportMode,

    /// Host to bind to (ignored for stdio transport)
    #[arg(long, default_value = DEFAULT_HTTP_HOST)]
    pub host: String,

    /// Port to listen on (ignored for stdio transport)
    #[arg(long, default_value_t = DEFAULT_HTTP_PORT)]
    pub port: u16,

    /// Endpoint path; defaults to /sse for sse and /mcp for streamable-http
    #[arg(long)]
    pub path: Option<String>,

    /// Log level (debug, info, warning, error, critical)
    #[arg(long, default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,
}

impl Config {
    /// Get the bind address for network transports.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the endpoint path, falling back to the transport's default.
    pub fn endpoint(&self) -> &str {
        match &self.path {
            Some(path) => path,
            None => match self.transport {
                TransportMode::Sse => DEFAULT_SSE_PATH,
                _ => DEFAULT_MCP_PATH,
            },
        }
    }

    /// Map the CLI log level onto a tracing filter directive.
    /// `warning` and `critical` are accepted for parity with common server
    /// CLIs and map onto tracing's `warn`/`error`.
    pub fn tracing_directive(&self) -> &str {
        match self.log_level.to_ascii_lowercase().as_str() {
            "debug" => "debug",
            "warning" | "warn" => "warn",
            "error" | "critical" => "error",
            "trace" => "trace",
            _ => "info",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;

    fn lookup_in(map: &HashMap<&str, &str>) -> impl Fn(&str) -> Option<String> + '_ {
        |key| map.get(key).map(|v| v.to_string())
    }

    fn full_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            (ENV_DB_HOST, "db.internal"),
            (ENV_DB_PORT, "5433"),
            (ENV_DB_USER, "app"),
            (ENV_DB_PASSWORD, "secret"),
            (ENV_DB_NAME, "appdb"),
        ])
    }

    #[test]
    fn test_resolve_full_config() {
        let env = full_env();
        let config = DbConfig::resolve_from(lookup_in(&env)).unwrap();
        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, 5433);
        assert_eq!(config.user, "app");
        assert_eq!(config.dbname, "appdb");
    }

    #[test]
    fn test_resolve_applies_defaults() {
        let env = HashMap::from([
            (ENV_DB_USER, "app"),
            (ENV_DB_PASSWORD, "secret"),
            (ENV_DB_NAME, "appdb"),
        ]);
        let config = DbConfig::resolve_from(lookup_in(&env)).unwrap();
        assert_eq!(config.host, DEFAULT_DB_HOST);
        assert_eq!(config.port, DEFAULT_DB_PORT);
    }

    #[test]
    fn test_resolve_missing_user_fails() {
        let mut env = full_env();
        env.remove(ENV_DB_USER);
        let err = DbConfig::resolve_from(lookup_in(&env)).unwrap_err();
        assert!(matches!(err, GatewayError::Config { .. }));
        assert!(err.to_string().contains("missing required"));
    }

    #[test]
    fn test_resolve_empty_password_fails() {
        let mut env = full_env();
        env.insert(ENV_DB_PASSWORD, "");
        let err = DbConfig::resolve_from(lookup_in(&env)).unwrap_err();
        assert!(matches!(err, GatewayError::Config { .. }));
    }

    #[test]
    fn test_resolve_missing_dbname_fails() {
        let mut env = full_env();
        env.remove(ENV_DB_NAME);
        assert!(DbConfig::resolve_from(lookup_in(&env)).is_err());
    }

    #[test]
    fn test_resolve_invalid_port_fails() {
        let mut env = full_env();
        env.insert(ENV_DB_PORT, "not-a-port");
        let err = DbConfig::resolve_from(lookup_in(&env)).unwrap_err();
        assert!(matches!(err, GatewayError::Config { .. }));
        assert!(err.to_string().contains(ENV_DB_PORT));
    }

    #[test]
    fn test_static_provider_returns_fixed_config() {
        let env = full_env();
        let config = DbConfig::resolve_from(lookup_in(&env)).unwrap();
        let provider = StaticConfigProvider(config.clone());
        assert_eq!(provider.resolve().unwrap(), config);
    }

    #[test]
    fn test_schema_scope_default() {
        let scope = SchemaScope::resolve_from(|_| None).unwrap();
        assert_eq!(scope, SchemaScope::Current);
    }

    #[test]
    fn test_schema_scope_public_and_user() {
        let scope =
            SchemaScope::resolve_from(|_| Some("public-and-user".to_string())).unwrap();
        assert_eq!(scope, SchemaScope::PublicAndUser);
    }

    #[test]
    fn test_schema_scope_invalid_value() {
        let err = SchemaScope::resolve_from(|_| Some("everything".to_string())).unwrap_err();
        assert!(err.to_string().contains(ENV_SCHEMA_SCOPE));
    }

    #[test]
    fn test_cli_defaults() {
        let config = Config::parse_from(["opengauss-mcp-server"]);
        assert_eq!(config.transport, TransportMode::Stdio);
        assert_eq!(config.host, DEFAULT_HTTP_HOST);
        assert_eq!(config.port, DEFAULT_HTTP_PORT);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_cli_transport_values() {
        let config =
            Config::parse_from(["opengauss-mcp-server", "--transport", "streamable-http"]);
        assert_eq!(config.transport, TransportMode::StreamableHttp);
        let config = Config::parse_from(["opengauss-mcp-server", "--transport", "sse"]);
        assert_eq!(config.transport, TransportMode::Sse);
    }

    #[test]
    fn test_endpoint_defaults_per_transport() {
        let sse = Config::parse_from(["opengauss-mcp-server", "--transport", "sse"]);
        assert_eq!(sse.endpoint(), "/sse");
        let http =
            Config::parse_from(["opengauss-mcp-server", "--transport", "streamable-http"]);
        assert_eq!(http.endpoint(), "/mcp");
        let custom = Config::parse_from([
            "opengauss-mcp-server",
            "--transport",
            "streamable-http",
            "--path",
            "/api/mcp",
        ]);
        assert_eq!(custom.endpoint(), "/api/mcp");
    }

    #[test]
    fn test_bind_addr() {
        let config = Config::parse_from([
            "opengauss-mcp-server",
            "--host",
            "127.0.0.1",
            "--port",
            "9000",
        ]);
        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
    }

    #[test]
    fn test_tracing_directive_mapping() {
        let mut config = Config::parse_from(["opengauss-mcp-server"]);
        config.log_level = "warning".to_string();
        assert_eq!(config.tracing_directive(), "warn");
        config.log_level = "critical".to_string();
        assert_eq!(config.tracing_directive(), "error");
        config.log_level = "DEBUG".to_string();
        assert_eq!(config.tracing_directive(), "debug");
        config.log_level = "bogus".to_string();
        assert_eq!(config.tracing_directive(), "info");
    }
}
