use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::sync::Arc;
use tracing::info;

use crate::storage::{SqliteStore, StorageError};

pub type DbPool = SqlitePool;

/// Application state shared by the command layer
pub struct AppState {
  pub store: Arc<SqliteStore>,
}

/// Open the connection pool and run migrations
pub async fn initialize_db(database_url: &str) -> Result<DbPool, StorageError> {
  info!(database_url, "Initializing database");

  // In-memory databases are per-connection; keep them on one.
  let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

  let pool = SqlitePoolOptions::new()
    .max_connections(max_connections)
    .connect(database_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  info!("Database initialized successfully");

  Ok(pool)
}

impl AppState {
  pub async fn open(database_url: &str) -> Result<Self, StorageError> {
    let pool = initialize_db(database_url).await?;
    Ok(Self {
      store: Arc::new(SqliteStore::new(pool)),
    })
  }
}
