pub mod models;
pub mod queries;

pub use queries::MovieQueries;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use std::str::FromStr;
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::database::MovieStore;
use crate::database::postgres::models::Movie;
use crate::{RecsError, Result};

/// Postgres-backed movie store with a pgvector embedding column.
///
/// Connections always use TLS and verify the server against the configured
/// trust-anchor certificate. A pool is shared across concurrent request
/// handlers; individual connections are acquired per query and released on
/// every exit path.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    #[inline]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        if !config.ca_cert.exists() {
            return Err(RecsError::StoreConnect(format!(
                "CA certificate not found at {}",
                config.ca_cert.display()
            )));
        }

        let options = PgConnectOptions::from_str(&config.url)
            .map_err(|e| RecsError::StoreConnect(format!("Invalid connection string: {e}")))?
            .ssl_mode(PgSslMode::VerifyCa)
            .ssl_root_cert(&config.ca_cert);

        debug!("Connecting to Postgres");

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await
            .map_err(|e| RecsError::StoreConnect(format!("Failed to connect: {e}")))?;

        info!("Connected to Postgres");
        Ok(Self { pool })
    }

    #[inline]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Ensure the pgvector extension and the movie table exist.
    ///
    /// The vector column width is fixed at creation, so the dimension comes
    /// from the embedding provider in use. A pre-existing table is left
    /// untouched.
    #[inline]
    pub async fn prepare_schema(&self, dimension: usize) -> Result<()> {
        sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                RecsError::StoreQuery(format!("Failed to ensure pgvector extension: {e}"))
            })?;

        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                title TEXT NOT NULL,
                director TEXT NOT NULL,
                plot TEXT NOT NULL,
                year INTEGER NOT NULL,
                wiki TEXT PRIMARY KEY,
                \"cast\" TEXT,
                genre TEXT NOT NULL,
                embedding VECTOR({dimension}) NOT NULL
            )",
            queries::TABLE_NAME
        );

        sqlx::query(&ddl)
            .execute(&self.pool)
            .await
            .map_err(|e| RecsError::StoreQuery(format!("Failed to create table: {e}")))?;

        debug!("Schema ready with {dimension}-dimensional embedding column");
        Ok(())
    }

    /// Total number of stored records.
    #[inline]
    pub async fn count(&self) -> Result<i64> {
        MovieQueries::count(&self.pool).await
    }
}

#[async_trait]
impl MovieStore for Database {
    #[inline]
    async fn insert(&self, movies: &[Movie]) -> Result<u64> {
        MovieQueries::insert_batch(&self.pool, movies).await
    }

    #[inline]
    async fn nearest(&self, embedding: &[f32], limit: usize) -> Result<Vec<Movie>> {
        MovieQueries::nearest(&self.pool, embedding, limit).await
    }
}
