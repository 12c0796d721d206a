// Embeddings module
// This module handles the embedding-provider contract and the Ollama client

pub mod ollama;

pub use ollama::OllamaClient;

use crate::Result;

/// Stable interface to a pretrained sentence-embedding model.
///
/// Implementations map text to fixed-length vectors. For a fixed model
/// version the mapping is deterministic modulo floating-point noise from the
/// numeric backend, so stored vectors and query vectors stay comparable as
/// long as they come from the same provider and model.
pub trait EmbeddingProvider: Send + Sync {
    /// Model identifier, e.g. "nomic-embed-text:latest".
    fn model(&self) -> &str;

    /// Output vector width. Every vector returned by this provider has
    /// exactly this many components.
    fn dimension(&self) -> usize;

    /// Embed a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed multiple texts, one output vector per input text, same order.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}
