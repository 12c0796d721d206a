// Recommendation service
// Embeds a free-text query and returns the nearest stored movies


use std::sync::Arc;
use tracing::debug;

use crate::database::{Movie, MovieStore};
use crate::embeddings::EmbeddingProvider;
use crate::{RecsError, Result};

pub const DEFAULT_LIMIT: usize = 5;

/// Queries beyond this are almost certainly not search text, and there is no
/// point shipping them to the embedding model.
const MAX_QUERY_BYTES: usize = 8 * 1024;

/// Online query path: validate, embed, nearest-neighbor lookup.
///
/// Stateless apart from the shared provider handle and the store, so it is
/// safe to call from concurrent request handlers.
pub struct RecommendationService<S: MovieStore> {
    provider: Arc<dyn EmbeddingProvider>,
    store: S,
}

impl<S: MovieStore> RecommendationService<S> {
    #[inline]
    pub fn new(provider: Arc<dyn EmbeddingProvider>, store: S) -> Self {
        Self { provider, store }
    }

    /// Return the `limit` movies whose plots are closest to `query`,
    /// nearest first.
    ///
    /// Input is validated before any I/O: an empty or oversized query fails
    /// fast with `InvalidInput` and never reaches the provider or the store.
    #[inline]
    pub async fn recommend(&self, query: &str, limit: usize) -> Result<Vec<Movie>> {
        let query = query.trim();

        if query.is_empty() {
            return Err(RecsError::InvalidInput(
                "Query text must not be empty".to_string(),
            ));
        }

        if query.len() > MAX_QUERY_BYTES {
            return Err(RecsError::InvalidInput(format!(
                "Query text too long: {} bytes (limit {MAX_QUERY_BYTES})",
                query.len()
            )));
        }

        let limit = limit.max(1);

        debug!("Recommending {} movies for query ({} bytes)", limit, query.len());

        let embedding = self.provider.embed(query)?;
        let results = self.store.nearest(&embedding, limit).await?;

        debug!("Store returned {} results", results.len());
        Ok(results)
    }
}
