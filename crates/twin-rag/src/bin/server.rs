//! Digital twin server binary
//!
//! Run with: cargo run -p twin-rag --bin twin-rag-server -- serve

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use twin_rag::{
    config::TwinConfig,
    ingestion,
    server::{state::AppState, TwinServer},
    types::query::validate_question,
    Audience,
};

/// Green Hill Canarias digital twin
#[derive(Parser)]
#[command(name = "twin-rag-server")]
#[command(about = "Digital twin Q&A service for Green Hill Canarias", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML configuration file (environment variables override it)
    #[arg(long, short = 'c', value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Add files to the vector store, one document per file
    Ingest {
        /// Text files to ingest
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },
    /// Answer one question and exit
    Ask {
        /// The question
        #[arg(value_name = "QUESTION")]
        question: String,
        /// Audience: public, investor or boardroom
        #[arg(long, short = 'a', default_value = "public")]
        audience: String,
        /// Use only the local retrieval pipeline, skipping the backend chain
        #[arg(long)]
        local: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "twin_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = TwinConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Vector store: {}", config.vector_db.storage_dir.display());
    tracing::info!("  - Collection: {}", config.vector_db.collection);
    tracing::info!("  - Embedding model: {}", config.embeddings.model);
    tracing::info!("  - LLM model: {}", config.llm.generate_model);
    tracing::info!("  - Retrieval top_k: {}", config.retrieval.top_k);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Ingest { files } => ingest(config, files).await,
        Commands::Ask {
            question,
            audience,
            local,
        } => ask(config, &question, &audience, local).await,
    }
}

async fn serve(config: TwinConfig) -> anyhow::Result<()> {
    if config.server.ingest_token.is_none() {
        tracing::warn!("INGEST_AUTH_TOKEN is not set; ingestion requests will be rejected");
    }

    let server = TwinServer::new(config).await?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/twin/query        - Ask the local pipeline");
    println!("  POST /api/ask               - Ask via the backend chain");
    println!("  POST /api/twin/ingest_texts - Add texts (token required)");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;
    Ok(())
}

async fn ingest(config: TwinConfig, files: Vec<PathBuf>) -> anyhow::Result<()> {
    let mut texts = Vec::with_capacity(files.len());
    for path in &files {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if text.trim().is_empty() {
            tracing::warn!("Skipping empty file {}", path.display());
            continue;
        }
        texts.push(text);
    }

    let state = AppState::new(config).await?;
    let response = ingestion::ingest_texts(state.store(), &texts).await?;
    println!("{}", response.message);
    Ok(())
}

async fn ask(config: TwinConfig, question: &str, audience: &str, local: bool) -> anyhow::Result<()> {
    let audience: Audience = audience.parse()?;
    let question = validate_question(question)?;
    let state = AppState::new(config).await?;

    if local {
        let result = state.pipeline().run(question, audience).await;
        println!("{}", result.final_answer());
        if let Some(error) = result.error() {
            eprintln!("\n[degraded: {}]", error);
        }
    } else {
        let result = state.chain().answer(question, audience).await?;
        println!("{}", result.answer);
        eprintln!("\n[answered by {}]", result.backend);
    }

    Ok(())
}
