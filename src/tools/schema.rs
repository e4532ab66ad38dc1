//! Schema and table inspection handlers.
//!
//! Backs both resource reads (schema listing, qualified table listing, bulk
//! table definitions) and the structured tools (`list_tables_in_current_schema`,
//! `get_table_definition`). All catalog statements bind caller values through
//! placeholders; caller-supplied names are validated before the round-trip.

use crate::config::{ConfigProvider, SchemaScope};
use crate::db::{row_to_text, with_connection};
use crate::error::GatewayResult;
use crate::format::{format_inline_list, format_line_list};
use crate::sql;
use schemars::JsonSchema;
use serde::Deserialize;
use sqlx::Row;
use std::sync::Arc;

/// Fixed header line of a table definition block.
pub const DEFINITION_HEADER: &str =
    "column_name,data_type,column_default,is_nullable,ordinal_position";

/// Input for the get_table_definition tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TableDefinitionInput {
    /// Table name
    pub table: String,
    /// Schema the table belongs to
    pub schema: String,
}

/// Render one table's definition block: title, header, one line per column.
pub fn definition_block(table: &str, columns: &[Vec<String>]) -> String {
    let mut lines = Vec::with_capacity(columns.len() + 2);
    lines.push(format!("Definition of table {}:", table));
    lines.push(DEFINITION_HEADER.to_string());
    lines.extend(columns.iter().map(|cells| cells.join(",")));
    lines.join("\n")
}

/// Handler for schema and table metadata operations.
pub struct SchemaToolHandler {
    provider: Arc<dyn ConfigProvider>,
    scope: SchemaScope,
}

impl SchemaToolHandler {
    pub fn new(provider: Arc<dyn ConfigProvider>, scope: SchemaScope) -> Self {
        Self { provider, scope }
    }

    /// Schemas visible to the gateway: `public` and the configured user's own.
    pub async fn list_schemas(&self) -> GatewayResult<String> {
        let config = self.provider.resolve()?;
        let user = config.user.clone();
        let names: Vec<String> = with_connection(&config, move |conn| {
            Box::pin(async move {
                let rows = sqlx::query(sql::LIST_SCHEMAS)
                    .bind(user)
                    .fetch_all(&mut *conn)
                    .await?;
                rows.iter()
                    .map(|row| Ok(row.try_get::<String, _>(0)?))
                    .collect()
            })
        })
        .await?;
        Ok(format_inline_list(
            &format!("Schemas in database {}:", config.dbname),
            &names,
        ))
    }

    /// Qualified `schema.table` names, scoped per the configured policy.
    pub async fn list_tables(&self) -> GatewayResult<String> {
        let config = self.provider.resolve()?;
        let user = config.user.clone();
        let scope = self.scope;
        let tables: Vec<String> = with_connection(&config, move |conn| {
            Box::pin(async move {
                let statement = sql::list_tables_statement(scope);
                let query = match scope {
                    SchemaScope::Current => sqlx::query(statement),
                    SchemaScope::PublicAndUser => sqlx::query(statement).bind(user),
                };
                let rows = query.fetch_all(&mut *conn).await?;
                rows.iter()
                    .map(|row| {
                        let schema: String = row.try_get(0)?;
                        let table: String = row.try_get(1)?;
                        Ok(format!("{}.{}", schema, table))
                    })
                    .collect()
            })
        })
        .await?;
        Ok(format_inline_list(
            &format!("Tables in database {}:", config.dbname),
            &tables,
        ))
    }

    /// Bare table names in the session's current schema, one per line.
    pub async fn list_tables_in_current_schema(&self) -> GatewayResult<String> {
        let config = self.provider.resolve()?;
        let names: Vec<String> = with_connection(&config, |conn| {
            Box::pin(async move {
                let rows = sqlx::query(sql::TABLE_NAMES_CURRENT)
                    .fetch_all(&mut *conn)
                    .await?;
                rows.iter()
                    .map(|row| Ok(row.try_get::<String, _>(0)?))
                    .collect()
            })
        })
        .await?;
        Ok(format_line_list("Tables in current schema:", &names))
    }

    /// Column definitions for one caller-named table.
    pub async fn table_definition(&self, table: &str, schema: &str) -> GatewayResult<String> {
        sql::validate_identifier("table", table)?;
        sql::validate_identifier("schema", schema)?;

        let config = self.provider.resolve()?;
        let table_owned = table.to_string();
        let schema_owned = schema.to_string();
        let columns: Vec<Vec<String>> = with_connection(&config, move |conn| {
            Box::pin(async move {
                let rows = sqlx::query(sql::COLUMN_DEFINITIONS)
                    .bind(table_owned)
                    .bind(schema_owned)
                    .fetch_all(&mut *conn)
                    .await?;
                Ok(rows.iter().map(row_to_text).collect())
            })
        })
        .await?;
        Ok(definition_block(table, &columns))
    }

    /// Definition blocks for every table in the current schema, newline-joined.
    pub async fn table_definitions(&self) -> GatewayResult<String> {
        let config = self.provider.resolve()?;
        with_connection(&config, |conn| {
            Box::pin(async move {
                let tables: Vec<String> = {
                    let rows = sqlx::query(sql::TABLE_NAMES_CURRENT)
                        .fetch_all(&mut *conn)
                        .await?;
                    rows.iter()
                        .map(|row| Ok(row.try_get::<String, _>(0)?))
                        .collect::<GatewayResult<_>>()?
                };

                let mut blocks = Vec::with_capacity(tables.len());
                for table in &tables {
                    let rows = sqlx::query(sql::COLUMN_DEFINITIONS_CURRENT)
                        .bind(table)
                        .fetch_all(&mut *conn)
                        .await?;
                    let columns: Vec<Vec<String>> = rows.iter().map(row_to_text).collect();
                    blocks.push(definition_block(table, &columns));
                }
                Ok(blocks.join("\n"))
            })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DbConfig;
    use crate::error::GatewayError;

    struct MissingEnvProvider;

    impl ConfigProvider for MissingEnvProvider {
        fn resolve(&self) -> GatewayResult<DbConfig> {
            Err(GatewayError::config(
                "missing required database configuration",
            ))
        }
    }

    fn failing_handler() -> SchemaToolHandler {
        SchemaToolHandler::new(Arc::new(MissingEnvProvider), SchemaScope::Current)
    }

    #[test]
    fn test_definition_block_single_column() {
        let columns = vec![vec![
            "x".to_string(),
            "integer".to_string(),
            String::new(),
            "YES".to_string(),
            "1".to_string(),
        ]];
        assert_eq!(
            definition_block("t", &columns),
            "Definition of table t:\n\
             column_name,data_type,column_default,is_nullable,ordinal_position\n\
             x,integer,,YES,1"
        );
    }

    #[test]
    fn test_definition_block_no_columns() {
        assert_eq!(
            definition_block("missing", &[]),
            format!("Definition of table missing:\n{}", DEFINITION_HEADER)
        );
    }

    #[tokio::test]
    async fn test_configuration_error_precedes_connection() {
        // With no resolvable configuration every operation fails with the
        // configuration error, never a connection attempt.
        let handler = failing_handler();
        assert!(matches!(
            handler.list_schemas().await.unwrap_err(),
            GatewayError::Config { .. }
        ));
        assert!(matches!(
            handler.list_tables_in_current_schema().await.unwrap_err(),
            GatewayError::Config { .. }
        ));
        assert!(matches!(
            handler.table_definition("t", "public").await.unwrap_err(),
            GatewayError::Config { .. }
        ));
    }

    #[tokio::test]
    async fn test_table_definition_validates_identifiers_first() {
        let handler = failing_handler();
        let err = handler
            .table_definition("t; DROP TABLE x", "public")
            .await
            .unwrap_err();
        // Identifier validation runs before configuration resolution.
        assert!(matches!(err, GatewayError::InvalidIdentifier { .. }));
    }

    #[test]
    fn test_table_definition_input_deserialization() {
        let input: TableDefinitionInput =
            serde_json::from_str(r#"{"table": "urls", "schema": "app"}"#).unwrap();
        assert_eq!(input.table, "urls");
        assert_eq!(input.schema, "app");
    }
}
