use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{info, warn};

use kreide::analysis::Analysis;
use kreide::config::Config;
use kreide::model::embedder::QueryEmbedder;
use kreide::model::search::{search_topics, EmbeddingMatcher, KeywordMatcher, TopicMatcher};

/// Kreide: topic-model dashboard backend for German CS curricula.
///
/// Loads the saved topic-model artifacts and serves the aggregated views
/// (distributions, level focus, region heatmap, search) as JSON.
#[derive(Parser)]
#[command(name = "kreide", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the dashboard API server
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8080")]
        port: u16,

        /// Address to bind to
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
    },

    /// Print the topic table with distribution bars
    Topics,

    /// Map a free-text query to the nearest topics
    Search {
        /// The query, e.g. "Künstliche Intelligenz"
        query: String,

        /// Only show topics with similarity strictly above this
        #[arg(long, default_value = "0.5")]
        threshold: f64,
    },

    /// Write the topic table JSON to a file
    Export {
        /// Output path
        #[arg(long, default_value = "output/topics.json")]
        out: PathBuf,
    },

    /// Show artifact presence, corpus counts, and data quality
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("kreide=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, bind } => {
            let config = Config::load()?;
            let analysis = Arc::new(Analysis::load(&config)?);
            let matcher = create_matcher(&config, &analysis);

            kreide::web::run_server(analysis, matcher, port, &bind).await?;
        }

        Commands::Topics => {
            let config = Config::load()?;
            let analysis = Analysis::load(&config)?;

            kreide::output::terminal::display_topic_table(
                analysis.topic_table(),
                analysis.overall_distribution(),
            );
        }

        Commands::Search { query, threshold } => {
            let config = Config::load()?;
            let analysis = Analysis::load(&config)?;
            let matcher = create_matcher(&config, &analysis);

            let hits =
                search_topics(matcher.as_ref(), analysis.artifact(), &query, threshold).await?;

            kreide::output::terminal::display_search_hits(&query, &hits);
        }

        Commands::Export { out } => {
            let config = Config::load()?;
            let analysis = Analysis::load(&config)?;

            if let Some(parent) = out.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create directory for {}", out.display())
                    })?;
                }
            }

            let json = serde_json::to_vec_pretty(analysis.topic_table())?;
            std::fs::write(&out, json)
                .with_context(|| format!("Failed to write {}", out.display()))?;

            println!(
                "{}",
                format!("Topic table saved to: {}", out.display()).bold()
            );
        }

        Commands::Status => {
            let config = Config::load()?;
            kreide::status::show(&config)?;
        }
    }

    Ok(())
}

/// Pick the search backend: the embedding model when its files are on
/// disk, the keyword fallback otherwise. Search quality degrades but the
/// dashboard stays usable either way.
fn create_matcher(config: &Config, analysis: &Analysis) -> Arc<dyn TopicMatcher> {
    if config.embedding_files_present() {
        match QueryEmbedder::load(&config.embedding_dir()) {
            Ok(embedder) => {
                info!("Using embedding search backend");
                return Arc::new(EmbeddingMatcher::new(embedder, analysis.artifact()));
            }
            Err(e) => {
                warn!("Failed to load embedding model, falling back to keyword search: {e}");
            }
        }
    } else {
        info!("No embedding model on disk; using keyword search backend");
    }
    Arc::new(KeywordMatcher::new(analysis.artifact()))
}
