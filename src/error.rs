//! Error types for the openGauss MCP gateway.
//!
//! Two failure classes matter to callers: configuration errors (a required
//! connection parameter is missing from the environment) and database errors
//! (anything the driver reports). Configuration is re-resolved on every call,
//! so a configuration error on one call does not poison the next.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {message}")]
    Database {
        message: String,
        /// e.g., "42P01" for undefined table
        sql_state: Option<String>,
    },

    #[error("Invalid identifier '{name}': {reason}")]
    InvalidIdentifier { name: String, reason: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl GatewayError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a database error with optional SQLSTATE code.
    pub fn database(message: impl Into<String>, sql_state: Option<String>) -> Self {
        Self::Database {
            message: message.into(),
            sql_state,
        }
    }

    /// Create an invalid identifier error.
    pub fn invalid_identifier(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// True for failures the database reported (as opposed to bad arguments
    /// or missing configuration). `execute_query` reflects these back to the
    /// caller as a result string instead of raising.
    pub fn is_database(&self) -> bool {
        matches!(self, Self::Database { .. })
    }
}

/// Convert sqlx errors to GatewayError.
impl From<sqlx::Error> for GatewayError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => GatewayError::database(msg.to_string(), None),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                GatewayError::database(db_err.message(), code)
            }
            sqlx::Error::RowNotFound => GatewayError::database("No rows returned", None),
            sqlx::Error::Io(io_err) => {
                GatewayError::database(format!("I/O error: {}", io_err), None)
            }
            sqlx::Error::Tls(tls_err) => {
                GatewayError::database(format!("TLS error: {}", tls_err), None)
            }
            sqlx::Error::Protocol(msg) => {
                GatewayError::database(format!("Protocol error: {}", msg), None)
            }
            sqlx::Error::ColumnNotFound(col) => {
                GatewayError::internal(format!("Column not found: {}", col))
            }
            sqlx::Error::ColumnIndexOutOfBounds { index, len } => GatewayError::internal(format!(
                "Column index {} out of bounds (len: {})",
                index, len
            )),
            sqlx::Error::ColumnDecode { index, source } => {
                GatewayError::internal(format!("Failed to decode column {}: {}", index, source))
            }
            sqlx::Error::Decode(source) => {
                GatewayError::internal(format!("Decode error: {}", source))
            }
            sqlx::Error::WorkerCrashed => GatewayError::internal("Database worker crashed"),
            _ => GatewayError::database(format!("Driver error: {}", err), None),
        }
    }
}

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Convert GatewayError to MCP ErrorData for protocol-level error responses.
///
/// Database errors carry the SQLSTATE in the message so an agent can react to
/// specific failure codes; bad arguments map to invalid_params, everything the
/// caller cannot influence maps to internal_error.
impl From<GatewayError> for rmcp::ErrorData {
    fn from(err: GatewayError) -> Self {
        match &err {
            GatewayError::InvalidIdentifier { .. } | GatewayError::InvalidInput { .. } => {
                rmcp::ErrorData::invalid_params(err.to_string(), None)
            }
            GatewayError::Database { message, sql_state } => {
                let msg = match sql_state {
                    Some(code) => format!("Database error: {} (SQLSTATE: {})", message, code),
                    None => err.to_string(),
                };
                rmcp::ErrorData::invalid_params(msg, None)
            }
            GatewayError::Config { .. } | GatewayError::Internal { .. } => {
                rmcp::ErrorData::internal_error(err.to_string(), None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GatewayError::config("missing required database configuration");
        assert_eq!(
            err.to_string(),
            "Configuration error: missing required database configuration"
        );
    }

    #[test]
    fn test_database_error_display() {
        let err = GatewayError::database("syntax error", Some("42601".to_string()));
        assert!(err.to_string().contains("Database error: syntax error"));
    }

    #[test]
    fn test_is_database() {
        assert!(GatewayError::database("boom", None).is_database());
        assert!(!GatewayError::config("missing").is_database());
        assert!(!GatewayError::invalid_input("empty query").is_database());
    }

    // Tests for From<GatewayError> for rmcp::ErrorData

    #[test]
    fn test_invalid_input_maps_to_invalid_params() {
        let err = GatewayError::invalid_input("bad input");
        let mcp_err: rmcp::ErrorData = err.into();
        // invalid_params uses -32602
        assert_eq!(mcp_err.code.0, -32602);
    }

    #[test]
    fn test_invalid_identifier_maps_to_invalid_params() {
        let err = GatewayError::invalid_identifier("bad;name", "disallowed character");
        let mcp_err: rmcp::ErrorData = err.into();
        assert_eq!(mcp_err.code.0, -32602);
    }

    #[test]
    fn test_config_maps_to_internal_error() {
        let err = GatewayError::config("missing required database configuration");
        let mcp_err: rmcp::ErrorData = err.into();
        // internal_error uses -32603
        assert_eq!(mcp_err.code.0, -32603);
    }

    #[test]
    fn test_database_error_includes_sql_state() {
        let err = GatewayError::database("relation \"t\" does not exist", Some("42P01".into()));
        let mcp_err: rmcp::ErrorData = err.into();
        assert!(mcp_err.message.contains("42P01"));
    }
}
