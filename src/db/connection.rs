use std::time::Duration;

use anyhow::Context;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::info;

use super::{queries::QueryStore, todo_repo};
use crate::config::DatabaseConfig;

/// Opens the single connection shared by every request and makes sure the
/// `todos` table exists.
pub async fn connect(
    cfg: &DatabaseConfig,
    queries: &QueryStore,
) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(cfg.url.clone());
    // One connection for the process lifetime; SQLite serializes writes on it.
    options
        .max_connections(1)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .with_context(|| format!("failed to open database {}", cfg.url))?;
    db.execute_unprepared(&format!("PRAGMA busy_timeout = {}", cfg.busy_timeout_ms))
        .await
        .context("failed to configure sqlite busy timeout")?;

    info!("ensuring todos table exists");
    todo_repo::create_table(&db, queries)
        .await
        .context("failed to create todos table")?;
    Ok(db)
}

pub async fn close(db: DatabaseConnection) -> anyhow::Result<()> {
    db.close().await.context("failed to close database")?;
    info!("database connection closed");
    Ok(())
}
