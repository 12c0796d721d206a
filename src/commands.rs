use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::database::Database;
use crate::embeddings::{EmbeddingProvider, OllamaClient};
use crate::ingest::{IngestionPipeline, load_movies};
use crate::recommend::RecommendationService;
use crate::server;

/// Run the offline ingestion pipeline over a JSON dataset
#[inline]
pub async fn run_ingest(input: &Path) -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    let client = OllamaClient::new(&config.ollama).context("Failed to create Ollama client")?;
    client
        .health_check()
        .context("Embedding model is not available")?;

    let database = Database::connect(&config.database)
        .await
        .context("Failed to connect to the movie store")?;
    database
        .prepare_schema(config.ollama.embedding_dimension as usize)
        .await
        .context("Failed to prepare the movie store schema")?;

    let movies = load_movies(input)
        .with_context(|| format!("Failed to load records from {}", input.display()))?;
    println!("Loaded {} records from {}", movies.len(), input.display());

    let provider: Arc<dyn EmbeddingProvider> = Arc::new(client);
    let pipeline = IngestionPipeline::new(provider, database, config.ollama.batch_size as usize);

    let inserted = pipeline.ingest(&movies).await.context("Ingestion failed")?;
    println!("Ingestion complete: {} records written", inserted);

    Ok(())
}

/// Print recommendations for a free-text query
#[inline]
pub async fn run_recommend(query: &str, limit: usize) -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    let client = OllamaClient::new(&config.ollama).context("Failed to create Ollama client")?;
    let database = Database::connect(&config.database)
        .await
        .context("Failed to connect to the movie store")?;

    let service = RecommendationService::new(Arc::new(client), database);
    let movies = service.recommend(query, limit).await?;

    if movies.is_empty() {
        println!("No recommendations found. Has the store been ingested?");
        return Ok(());
    }

    for (rank, movie) in movies.iter().enumerate() {
        println!("{}. {} ({})", rank + 1, movie.title, movie.year);
        println!("   Genre: {}", movie.genre);
        println!("   Director: {}", movie.director);
        println!("   {}", movie.wiki);
    }

    Ok(())
}

/// Start the recommendation HTTP API
#[inline]
pub async fn run_serve(port: u16) -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    // Verify the embedding model before accepting traffic; a dead provider
    // at startup is fatal, per-request failures later are not.
    let client = OllamaClient::new(&config.ollama).context("Failed to create Ollama client")?;
    client
        .health_check()
        .context("Embedding model is not available")?;
    info!(
        "Ollama connected at {}:{} with model {}",
        config.ollama.host, config.ollama.port, config.ollama.model
    );

    let database = Database::connect(&config.database)
        .await
        .context("Failed to connect to the movie store")?;

    let service = RecommendationService::new(Arc::new(client), database);

    println!("Starting recommendation API on port {port}");
    println!("POST /api/recommendations with {{\"search\": \"...\"}} to query");
    println!("Press Ctrl+C to stop");

    server::serve(service, port)
        .await
        .context("Server failed")?;

    Ok(())
}

/// Show connectivity and store status
#[inline]
pub async fn run_status() -> Result<()> {
    println!("Movie-Recs Status");
    println!("{}", "=".repeat(40));

    let config = match Config::from_env() {
        Ok(config) => {
            println!("✅ Configuration loaded");
            config
        }
        Err(e) => {
            println!("❌ Configuration: {e}");
            return Ok(());
        }
    };

    println!("Embedding provider:");
    match OllamaClient::new(&config.ollama) {
        Ok(client) => match client.health_check() {
            Ok(()) => {
                println!(
                    "   ✅ Ollama connected ({}:{})",
                    config.ollama.host, config.ollama.port
                );
                println!("   Model: {}", config.ollama.model);
                println!("   Dimension: {}", config.ollama.embedding_dimension);
                println!("   Batch size: {}", config.ollama.batch_size);
            }
            Err(e) => println!("   ⚠️  Ollama reachable but unhealthy: {e}"),
        },
        Err(e) => println!("   ❌ Ollama: {e}"),
    }

    println!("Movie store:");
    match Database::connect(&config.database).await {
        Ok(database) => {
            println!("   ✅ Postgres connected");
            match database.count().await {
                Ok(count) => println!("   Stored records: {count}"),
                Err(e) => println!("   ⚠️  Could not count records: {e}"),
            }
        }
        Err(e) => println!("   ❌ Postgres: {e}"),
    }

    Ok(())
}
