//! MCP service implementation using rmcp.
//!
//! The dispatch surface: four tools registered through the rmcp tool router
//! and three read-only resources served from `ServerHandler`. The operation
//! set is fixed at construction; nothing is registered after startup.

use crate::config::{ConfigProvider, SchemaScope};
use crate::tools::query::ExecuteQueryInput;
use crate::tools::schema::TableDefinitionInput;
use crate::tools::{IdentityToolHandler, QueryToolHandler, SchemaToolHandler};
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{
        AnnotateAble, CallToolResult, Content, Implementation, ListResourcesResult,
        PaginatedRequestParam, ProtocolVersion, RawResource, ReadResourceRequestParam,
        ReadResourceResult, Resource, ResourceContents, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// URI of the schema listing resource.
pub const SCHEMAS_URI: &str = "opengauss://schemas";
/// URI of the qualified table listing resource.
pub const TABLES_URI: &str = "opengauss://tables";
/// URI of the bulk table definition resource.
pub const TABLE_DEFINITIONS_URI: &str = "opengauss://table_definitions";

#[derive(Clone)]
pub struct OpenGaussService {
    /// Per-call database configuration source
    provider: Arc<dyn ConfigProvider>,
    /// Scope policy for the qualified table listing
    scope: SchemaScope,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

impl OpenGaussService {
    /// Create a new service. The tool router and resource catalog are built
    /// here, once, and stay immutable for the process lifetime.
    pub fn new(provider: Arc<dyn ConfigProvider>, scope: SchemaScope) -> Self {
        Self {
            provider,
            scope,
            tool_router: Self::tool_router(),
        }
    }

    fn schema_handler(&self) -> SchemaToolHandler {
        SchemaToolHandler::new(self.provider.clone(), self.scope)
    }

    /// The fixed set of readable resources.
    pub fn resource_catalog() -> Vec<Resource> {
        let mut schemas = RawResource::new(SCHEMAS_URI, "ListSchemas");
        schemas.description = Some("Get all schemas of the database.".to_string());
        schemas.mime_type = Some("text/plain".to_string());

        let mut tables = RawResource::new(TABLES_URI, "ListTables");
        tables.description = Some(
            "Get qualified table names of the form <schema_name>.<table_name>.".to_string(),
        );
        tables.mime_type = Some("text/plain".to_string());

        let mut definitions = RawResource::new(TABLE_DEFINITIONS_URI, "TableDefinitions");
        definitions.description =
            Some("Get column definitions for every table in the current schema.".to_string());
        definitions.mime_type = Some("text/plain".to_string());

        vec![
            schemas.no_annotation(),
            tables.no_annotation(),
            definitions.no_annotation(),
        ]
    }
}

#[tool_router]
impl OpenGaussService {
    #[tool(
        description = "Execute an SQL command on the openGauss server.\nSELECT statements return a comma-separated header line and one line per row; other statements report the affected row count.\nThis tool carries the privileges of a direct database session; database errors are returned as a text result."
    )]
    async fn execute_query(
        &self,
        Parameters(input): Parameters<ExecuteQueryInput>,
    ) -> Result<CallToolResult, McpError> {
        let handler = QueryToolHandler::new(self.provider.clone());
        let text = handler.execute_query(&input.query).await?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        description = "List table names in the current schema on the openGauss server, one per line."
    )]
    async fn list_tables_in_current_schema(&self) -> Result<CallToolResult, McpError> {
        let text = self.schema_handler().list_tables_in_current_schema().await?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        description = "Get the column definitions of a table: name, data type, default, nullability and ordinal position."
    )]
    async fn get_table_definition(
        &self,
        Parameters(input): Parameters<TableDefinitionInput>,
    ) -> Result<CallToolResult, McpError> {
        let text = self
            .schema_handler()
            .table_definition(&input.table, &input.schema)
            .await?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Get the session's current user and current schema.")]
    async fn get_current_user_and_schema(&self) -> Result<CallToolResult, McpError> {
        let handler = IdentityToolHandler::new(self.provider.clone());
        let text = handler.current_user_and_schema().await?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[tool_handler]
impl ServerHandler for OpenGaussService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "opengauss-mcp-server".to_owned(),
                title: Some("openGauss MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Tools and resources for inspecting and querying an openGauss database.\n\
                \n\
                - `execute_query` runs arbitrary SQL and returns text: a comma-separated\n\
                  header and rows for SELECT, an affected-row count otherwise. Database\n\
                  errors come back as the result text.\n\
                - `list_tables_in_current_schema`, `get_table_definition` and\n\
                  `get_current_user_and_schema` answer structured catalog questions.\n\
                - Resources `opengauss://schemas`, `opengauss://tables` and\n\
                  `opengauss://table_definitions` are readable snapshots of the catalog.\n\
                \n\
                Connection parameters come from OPENGAUSS_* environment variables and\n\
                are re-read on every call; each call runs on its own connection."
                    .to_string(),
            ),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult {
            resources: Self::resource_catalog(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let text = match request.uri.as_str() {
            SCHEMAS_URI => self.schema_handler().list_schemas().await?,
            TABLES_URI => self.schema_handler().list_tables().await?,
            TABLE_DEFINITIONS_URI => self.schema_handler().table_definitions().await?,
            other => {
                return Err(McpError::resource_not_found(
                    format!("Unknown resource URI: {}", other),
                    None,
                ));
            }
        };

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, request.uri)],
        })
    }
}
