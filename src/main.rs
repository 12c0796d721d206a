use clap::{Parser, Subcommand};
use movie_recs::Result;
use movie_recs::commands::{run_ingest, run_recommend, run_serve, run_status};
use movie_recs::recommend::DEFAULT_LIMIT;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Movie recommendations from plot embeddings and nearest-neighbor search")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed a movie-plot dataset and load it into the store
    Ingest {
        /// Path to the JSON dataset
        #[arg(long, env = "MOVIE_RECS_INPUT", default_value = "plots.json")]
        input: PathBuf,
    },
    /// Print recommendations for a free-text query
    Recommend {
        /// Free-text description of what to watch
        query: String,
        /// Number of recommendations to return
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },
    /// Start the recommendation HTTP API
    Serve {
        /// Port to listen on
        #[arg(long, env = "MOVIE_RECS_PORT", default_value_t = 3000)]
        port: u16,
    },
    /// Show connectivity and store status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest { input } => {
            run_ingest(&input).await?;
        }
        Commands::Recommend { query, limit } => {
            run_recommend(&query, limit).await?;
        }
        Commands::Serve { port } => {
            run_serve(port).await?;
        }
        Commands::Status => {
            run_status().await?;
        }
    }

    Ok(())
}
