use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use axum::Router;
use sea_orm::DatabaseConnection;

use crate::{
    config::AppConfig,
    db::{QueryStore, connection},
    routes::app,
    state::AppState,
};

pub fn sql_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("sql")
}

pub fn test_config() -> AppConfig {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut cfg = AppConfig::default();
    cfg.database.url = "sqlite::memory:".to_string();
    cfg.paths.sql_dir = sql_dir();
    cfg.paths.public_dir = manifest_dir.join("public");
    cfg
}

/// A fresh in-memory SQLite store with the todos table created.
pub async fn memory_db(queries: &QueryStore) -> DatabaseConnection {
    connection::connect(&test_config().database, queries)
        .await
        .expect("open in-memory sqlite")
}

pub async fn memory_state() -> Arc<AppState> {
    let cfg = test_config();
    let queries = QueryStore::load(&cfg.paths.sql_dir).expect("load shipped sql");
    let db = memory_db(&queries).await;
    AppState::new(cfg, db, queries)
}

/// State over an arbitrary connection, usually a `MockDatabase`.
pub fn mock_state(db: DatabaseConnection) -> Arc<AppState> {
    let cfg = test_config();
    let queries = QueryStore::load(&cfg.paths.sql_dir).expect("load shipped sql");
    AppState::new(cfg, db, queries)
}

pub fn test_app(state: Arc<AppState>) -> Router {
    app(state)
}
