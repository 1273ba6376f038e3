use sqlx::SqlitePool;
use std::sync::Arc;

use crate::{config::Config, db, errors::AppError};

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
}

impl AppState {
    /// Opens the store and makes sure the schema exists.
    pub async fn new(config: Config) -> Result<Self, AppError> {
        let pool = db::connect(&config.database_url, config.db_max_connections).await?;
        db::init_schema(&pool).await?;

        Ok(Self {
            db: pool,
            config: Arc::new(config),
        })
    }
}

pub type DbPool = SqlitePool;
