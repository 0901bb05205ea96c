use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::cafe::repository::{CafeRepository, InMemoryCafeRepository, PostgresCafeRepository};
use crate::config::DatabaseConfig;
use crate::user::{InMemoryUserRepository, PostgresUserRepository, UserRepository};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to connect to database: {0}")]
    Connect(#[from] sqlx::Error),

    #[error("Failed to apply migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Backing store selected at startup; owns the connection pool when there is one
pub enum Storage {
    Postgres(PgPool),
    InMemory,
}

impl Storage {
    /// Connects and migrates when a database is configured, otherwise falls back to memory
    #[instrument(skip(config))]
    pub async fn connect(config: Option<&DatabaseConfig>) -> Result<Self, StorageError> {
        let Some(config) = config else {
            warn!("DATABASE_URL not set, using in-memory storage; data is lost on restart");
            return Ok(Storage::InMemory);
        };

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(&config.url)
            .await?;
        info!(max_connections = config.max_connections, "Connected to database");

        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Database migrations applied");

        Ok(Storage::Postgres(pool))
    }

    pub fn repositories(
        &self,
    ) -> (
        Arc<dyn UserRepository + Send + Sync>,
        Arc<dyn CafeRepository + Send + Sync>,
    ) {
        match self {
            Storage::Postgres(pool) => (
                Arc::new(PostgresUserRepository::new(pool.clone())),
                Arc::new(PostgresCafeRepository::new(pool.clone())),
            ),
            Storage::InMemory => (
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryCafeRepository::new()),
            ),
        }
    }

    /// Releases pooled connections
    pub async fn close(self) {
        if let Storage::Postgres(pool) = self {
            pool.close().await;
            info!("Database pool closed");
        }
    }
}
