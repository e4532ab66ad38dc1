//! Integration tests for operation handler error semantics.
//!
//! No live database: a failing configuration provider stands in for a broken
//! environment, which is enough to pin down the ordering guarantees (input
//! validation before configuration, configuration before any connection).

use opengauss_mcp_server::config::{ConfigProvider, DbConfig, SchemaScope};
use opengauss_mcp_server::error::{GatewayError, GatewayResult};
use opengauss_mcp_server::tools::{IdentityToolHandler, QueryToolHandler, SchemaToolHandler};
use std::sync::Arc;

struct MissingEnvProvider;

impl ConfigProvider for MissingEnvProvider {
    fn resolve(&self) -> GatewayResult<DbConfig> {
        Err(GatewayError::config(
            "missing required database configuration",
        ))
    }
}

fn provider() -> Arc<dyn ConfigProvider> {
    Arc::new(MissingEnvProvider)
}

/// With missing configuration, every operation fails with a configuration
/// error before any connection attempt (a connection attempt would surface a
/// Database error instead).
#[tokio::test]
async fn test_all_operations_fail_with_configuration_error() {
    let schema = SchemaToolHandler::new(provider(), SchemaScope::Current);
    let identity = IdentityToolHandler::new(provider());
    let query = QueryToolHandler::new(provider());

    let errors = vec![
        schema.list_schemas().await.unwrap_err(),
        schema.list_tables().await.unwrap_err(),
        schema.table_definitions().await.unwrap_err(),
        schema.list_tables_in_current_schema().await.unwrap_err(),
        schema.table_definition("t", "public").await.unwrap_err(),
        identity.current_user_and_schema().await.unwrap_err(),
        query.execute_query("SELECT 1").await.unwrap_err(),
    ];

    for err in errors {
        assert!(
            matches!(err, GatewayError::Config { .. }),
            "expected Config error, got {:?}",
            err
        );
    }
}

/// execute_query raises on configuration failure; only database failures are
/// reflected back as a result string.
#[tokio::test]
async fn test_execute_query_configuration_error_is_raised() {
    let query = QueryToolHandler::new(provider());
    let err = query.execute_query("CREATE TABLE t (x int)").await.unwrap_err();
    assert!(matches!(err, GatewayError::Config { .. }));
}

/// An empty query is rejected as invalid input before anything else runs.
#[tokio::test]
async fn test_execute_query_rejects_empty_query() {
    let query = QueryToolHandler::new(provider());
    for sql in ["", "   ", "\n\t"] {
        let err = query.execute_query(sql).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidInput { .. }));
    }
}

/// Malformed identifiers fail before configuration resolution.
#[tokio::test]
async fn test_table_definition_identifier_validation_first() {
    let schema = SchemaToolHandler::new(provider(), SchemaScope::Current);

    let err = schema
        .table_definition("users; --", "public")
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::InvalidIdentifier { .. }));

    let err = schema
        .table_definition("users", "bad schema")
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::InvalidIdentifier { .. }));
}
