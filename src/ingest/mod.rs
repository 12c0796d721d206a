// Ingestion pipeline
// Reads source records, embeds plot texts in fixed-size batches, and
// bulk-writes the enriched records in one transaction

#[cfg(test)]
mod tests;

use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::database::{MovieStore, SourceMovie};
use crate::embeddings::EmbeddingProvider;
use crate::{RecsError, Result};

/// Offline pipeline that populates the movie store.
///
/// Batches are embedded sequentially; the whole enriched set is written in a
/// single atomic insert at the end, so a failed run persists nothing and can
/// simply be repeated.
pub struct IngestionPipeline<S: MovieStore> {
    provider: Arc<dyn EmbeddingProvider>,
    store: S,
    batch_size: usize,
}

impl<S: MovieStore> IngestionPipeline<S> {
    #[inline]
    pub fn new(provider: Arc<dyn EmbeddingProvider>, store: S, batch_size: usize) -> Self {
        Self {
            provider,
            store,
            batch_size: batch_size.max(1),
        }
    }

    /// Run the pipeline over `movies`, returning the number of records
    /// written.
    ///
    /// The full input is held in memory, which is fine at demo scale; a
    /// large corpus would need a streaming reader instead.
    #[inline]
    pub async fn ingest(&self, movies: &[SourceMovie]) -> Result<u64> {
        if movies.is_empty() {
            info!("No records to ingest");
            return Ok(0);
        }

        for (index, movie) in movies.iter().enumerate() {
            movie.validate().map_err(|msg| {
                RecsError::InvalidInput(format!("Record {index} ({:?}): {msg}", movie.title))
            })?;
        }

        info!(
            "Ingesting {} records in batches of {}",
            movies.len(),
            self.batch_size
        );

        let bar = if console::user_attended_stderr() {
            ProgressBar::new(movies.len() as u64).with_style(
                ProgressStyle::with_template("{spinner} [{pos}/{len}] Embedding plots")
                    .expect("style template is valid"),
            )
        } else {
            ProgressBar::hidden()
        };

        let mut enriched = Vec::with_capacity(movies.len());

        for (batch_index, batch) in movies.chunks(self.batch_size).enumerate() {
            let texts: Vec<String> = batch.iter().map(|m| m.plot.clone()).collect();

            let vectors = self.provider.embed_batch(&texts).map_err(|e| match e {
                RecsError::Embedding(msg) => {
                    RecsError::Embedding(format!("Batch {batch_index}: {msg}"))
                }
                other => other,
            })?;

            // The provider promises one vector per text in order; a mismatch
            // here would silently mispair records below.
            if vectors.len() != batch.len() {
                return Err(RecsError::Embedding(format!(
                    "Batch {batch_index}: expected {} vectors, got {}",
                    batch.len(),
                    vectors.len()
                )));
            }

            for (movie, embedding) in batch.iter().zip(vectors) {
                enriched.push(movie.clone().into_movie(embedding));
            }

            bar.inc(batch.len() as u64);
            debug!(
                "Processed {} of {} records",
                enriched.len(),
                movies.len()
            );
        }

        bar.finish_and_clear();

        let inserted = self.store.insert(&enriched).await?;
        info!("Ingestion complete, {} records written", inserted);

        Ok(inserted)
    }
}

/// Load source records from a JSON file (an array of dataset records).
#[inline]
pub fn load_movies<P: AsRef<Path>>(path: P) -> Result<Vec<SourceMovie>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;

    let movies: Vec<SourceMovie> = serde_json::from_str(&content).map_err(|e| {
        RecsError::InvalidInput(format!("Failed to parse {}: {e}", path.display()))
    })?;

    debug!("Loaded {} records from {}", movies.len(), path.display());
    Ok(movies)
}
