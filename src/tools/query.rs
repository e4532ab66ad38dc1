//! Generic SQL execution tool.
//!
//! `execute_query` is the arbitrary-statement passthrough: the caller's SQL
//! runs unmodified with the privileges of a direct database session. Because
//! the caller is an automated agent that expects a result value, database
//! failures are reflected back as a textual result rather than raised;
//! configuration failures and malformed arguments still raise.

use crate::config::ConfigProvider;
use crate::db::{column_names, row_to_text, with_connection};
use crate::error::{GatewayError, GatewayResult};
use crate::format::format_rows;
use crate::sql::is_select_statement;
use schemars::JsonSchema;
use serde::Deserialize;
use sqlx::Executor;
use std::sync::Arc;
use tracing::{error, info};

/// Input for the execute_query tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExecuteQueryInput {
    /// SQL command to execute
    pub query: String,
}

/// Handler for the generic execute_query tool.
pub struct QueryToolHandler {
    provider: Arc<dyn ConfigProvider>,
}

impl QueryToolHandler {
    pub fn new(provider: Arc<dyn ConfigProvider>) -> Self {
        Self { provider }
    }

    /// Execute an arbitrary SQL statement.
    ///
    /// SELECT statements return a header line plus comma-joined rows; other
    /// statements report the affected row count. Database errors become the
    /// returned string, never an Err.
    pub async fn execute_query(&self, query: &str) -> GatewayResult<String> {
        if query.trim().is_empty() {
            return Err(GatewayError::invalid_input("query must not be empty"));
        }

        let config = self.provider.resolve()?;
        let sql = query.to_string();

        let outcome = with_connection(&config, move |conn| {
            Box::pin(async move {
                if is_select_statement(&sql) {
                    // Raw (unprepared) execution: arbitrary statements are not
                    // all preparable, and the text wire format decodes evenly.
                    let rows = (&mut *conn).fetch_all(sql.as_str()).await?;
                    let columns = match rows.first() {
                        Some(row) => column_names(row),
                        None => Vec::new(),
                    };
                    let cells: Vec<Vec<String>> = rows.iter().map(row_to_text).collect();
                    Ok(format_rows(&columns, &cells))
                } else {
                    let result = (&mut *conn).execute(sql.as_str()).await?;
                    Ok(format!(
                        "Query executed successfully. Rows affected: {}",
                        result.rows_affected()
                    ))
                }
            })
        })
        .await;

        match outcome {
            Ok(text) => {
                info!("Query executed");
                Ok(text)
            }
            Err(err) if err.is_database() => {
                error!(error = %err, sql = %query, "Error executing SQL");
                Ok(format!("Error executing query: {}", err))
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Provider standing in for a broken environment.
    struct MissingEnvProvider;

    impl ConfigProvider for MissingEnvProvider {
        fn resolve(&self) -> GatewayResult<crate::config::DbConfig> {
            Err(GatewayError::config(
                "missing required database configuration",
            ))
        }
    }

    #[tokio::test]
    async fn test_empty_query_is_invalid_input() {
        let handler = QueryToolHandler::new(Arc::new(MissingEnvProvider));
        let err = handler.execute_query("   ").await.unwrap_err();
        // Rejected before configuration is even resolved.
        assert!(matches!(err, GatewayError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn test_missing_configuration_raises_not_stringifies() {
        let handler = QueryToolHandler::new(Arc::new(MissingEnvProvider));
        let err = handler.execute_query("SELECT 1").await.unwrap_err();
        assert!(matches!(err, GatewayError::Config { .. }));
    }

    #[test]
    fn test_input_deserialization() {
        let input: ExecuteQueryInput =
            serde_json::from_str(r#"{"query": "SELECT 1"}"#).unwrap();
        assert_eq!(input.query, "SELECT 1");
    }
}
