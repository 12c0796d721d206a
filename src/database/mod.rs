// Database module
// This module handles the vector-store contract and its Postgres/pgvector
// implementation

pub mod postgres;

pub use postgres::models::{Movie, SourceMovie};
pub use postgres::{Database, MovieQueries};

use async_trait::async_trait;

use crate::Result;

/// Storage contract for movie records with plot embeddings.
///
/// Abstracts the underlying store so the pipeline and the recommendation
/// service can be exercised against an in-memory double in tests.
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Bulk-write all records as a unit. No partial-success semantics: either
    /// every record is persisted or none are. Returns the number written.
    async fn insert(&self, movies: &[Movie]) -> Result<u64>;

    /// The `limit` stored records closest to `embedding`, ordered
    /// nearest-first. Tie order between equidistant records is
    /// store-defined.
    async fn nearest(&self, embedding: &[f32], limit: usize) -> Result<Vec<Movie>>;
}
