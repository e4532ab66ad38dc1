//! Session identity lookup.

use crate::config::ConfigProvider;
use crate::db::{row_to_text, with_connection};
use crate::error::GatewayResult;
use crate::sql;
use std::sync::Arc;

/// Handler for the get_current_user_and_schema tool.
pub struct IdentityToolHandler {
    provider: Arc<dyn ConfigProvider>,
}

impl IdentityToolHandler {
    pub fn new(provider: Arc<dyn ConfigProvider>) -> Self {
        Self { provider }
    }

    /// Report the session's user and current schema as a single line.
    pub async fn current_user_and_schema(&self) -> GatewayResult<String> {
        let config = self.provider.resolve()?;
        with_connection(&config, |conn| {
            Box::pin(async move {
                let row = sqlx::query(sql::CURRENT_IDENTITY)
                    .fetch_one(&mut *conn)
                    .await?;
                let cells = row_to_text(&row);
                let user = cells.first().cloned().unwrap_or_default();
                let schema = cells.get(1).cloned().unwrap_or_default();
                Ok(format!(
                    "current user is {}, current schema is {}",
                    user, schema
                ))
            })
        })
        .await
    }
}
