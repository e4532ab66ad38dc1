//! SQL statement shapes and input validation.
//!
//! Every statement the gateway issues is one of six fixed shapes. Caller
//! values (table name, schema name, user name) are always bound through `$n`
//! placeholders; nothing caller-supplied is ever spliced into statement text
//! except the `execute_query` passthrough, which is the tool's entire point.

use crate::config::SchemaScope;
use crate::error::{GatewayError, GatewayResult};

/// Longest identifier the server accepts (NAMEDATALEN - 1).
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Namespaces visible to the schema listing: `public` plus the configured
/// user's own schema (bound as `$1`).
pub const LIST_SCHEMAS: &str =
    "SELECT nspname FROM pg_namespace WHERE nspname IN ('public', $1)";

/// Qualified schema/table pairs, restricted to the session's current schema.
pub const LIST_TABLES_CURRENT: &str =
    "SELECT schemaname, tablename FROM pg_tables WHERE schemaname = current_schema()";

/// Qualified schema/table pairs across `public` and the user's schema (`$1`).
pub const LIST_TABLES_PUBLIC_AND_USER: &str =
    "SELECT schemaname, tablename FROM pg_tables WHERE schemaname IN ('public', $1)";

/// Bare table names in the current schema.
pub const TABLE_NAMES_CURRENT: &str =
    "SELECT tablename FROM pg_tables WHERE schemaname = current_schema()";

/// Column metadata for one table; `$1` = table name, `$2` = schema name.
pub const COLUMN_DEFINITIONS: &str = "SELECT column_name, data_type, column_default, \
     is_nullable, ordinal_position \
     FROM information_schema.columns \
     WHERE table_name = $1 AND table_schema = $2";

/// Column metadata for a table in the session's current schema; `$1` = table.
pub const COLUMN_DEFINITIONS_CURRENT: &str = "SELECT column_name, data_type, column_default, \
     is_nullable, ordinal_position \
     FROM information_schema.columns \
     WHERE table_name = $1 AND table_schema = current_schema()";

/// Session identity as a single row.
pub const CURRENT_IDENTITY: &str = "SELECT current_user, current_schema";

/// Select the qualified table listing for the configured scope policy.
pub fn list_tables_statement(scope: SchemaScope) -> &'static str {
    match scope {
        SchemaScope::Current => LIST_TABLES_CURRENT,
        SchemaScope::PublicAndUser => LIST_TABLES_PUBLIC_AND_USER,
    }
}

/// Validate a caller-supplied table or schema name.
///
/// Accepts `[A-Za-z_][A-Za-z0-9_$]*` up to 63 bytes. The names are only ever
/// bound as query values, but rejecting malformed names here fails the call
/// before a database round-trip and keeps the accepted character set
/// explicit.
pub fn validate_identifier(kind: &str, name: &str) -> GatewayResult<()> {
    if name.is_empty() {
        return Err(GatewayError::invalid_identifier(
            name,
            format!("{} name must not be empty", kind),
        ));
    }
    if name.len() > MAX_IDENTIFIER_LEN {
        return Err(GatewayError::invalid_identifier(
            name,
            format!("{} name exceeds {} bytes", kind, MAX_IDENTIFIER_LEN),
        ));
    }
    let mut chars = name.chars();
    let first = chars.next().unwrap();
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(GatewayError::invalid_identifier(
            name,
            format!("{} name must start with a letter or underscore", kind),
        ));
    }
    if let Some(bad) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '$')) {
        return Err(GatewayError::invalid_identifier(
            name,
            format!("{} name contains disallowed character '{}'", kind, bad),
        ));
    }
    Ok(())
}

/// Whether a statement is a plain read: its first token is `SELECT`.
///
/// Token-based rather than prefix-based so `SELECTED_COLS ...` is not treated
/// as a read while `select*from t` is.
pub fn is_select_statement(sql: &str) -> bool {
    let trimmed = sql.trim_start();
    let token_len = trimmed
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    trimmed[..token_len].eq_ignore_ascii_case("select")
}
