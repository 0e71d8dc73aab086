use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{config::AppConfig, db::QueryStore};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DatabaseConnection,
    pub queries: QueryStore,
}

impl AppState {
    pub fn new(config: AppConfig, db: DatabaseConnection, queries: QueryStore) -> Arc<Self> {
        Arc::new(Self {
            config,
            db,
            queries,
        })
    }
}
