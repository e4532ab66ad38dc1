//! Per-call connection lifecycle.
//!
//! The gateway holds no pool and no shared state: every operation opens one
//! connection, uses it, and closes it on the way out. Statements run in
//! autocommit outside explicit transactions, so mutating work is committed
//! when the body returns and the server aborts anything in flight when a
//! failed call's connection closes.

use crate::config::DbConfig;
use crate::error::GatewayResult;
use futures_util::future::BoxFuture;
use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, PgConnection};
use tracing::{debug, warn};

/// Open a single connection using the resolved configuration.
pub async fn open(config: &DbConfig) -> GatewayResult<PgConnection> {
    let options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.dbname);

    debug!(
        host = %config.host,
        port = config.port,
        dbname = %config.dbname,
        "Opening database connection"
    );

    let conn = PgConnection::connect_with(&options).await?;
    Ok(conn)
}

/// Run `body` against a freshly opened connection, closing it on every exit
/// path. Exactly one open/close pair per invocation; the connection never
/// outlives the call.
pub async fn with_connection<T, F>(config: &DbConfig, body: F) -> GatewayResult<T>
where
    F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, GatewayResult<T>>,
{
    let mut conn = open(config).await?;
    let result = body(&mut conn).await;
    match result {
        Ok(value) => {
            if let Err(e) = conn.close().await {
                warn!(error = %e, "Error closing database connection");
            }
            Ok(value)
        }
        Err(err) => {
            if let Err(e) = conn.close().await {
                warn!(error = %e, "Error closing database connection after failure");
            }
            Err(err)
        }
    }
}
