//! Guideline assistant server binary
//!
//! Run with: cargo run -p guideline-rag --bin guideline-rag-server -- --corpus chunks.json

use clap::Parser;
use guideline_rag::{config::AssistantConfig, generation::OllamaClient, server::GuidelineServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "guideline-rag-server", version, about = "RBI guideline assistant API server")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pre-chunked JSON corpus (overrides retrieval.corpus_path)
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Listen port (overrides server.port)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "guideline_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                  RBI Guideline Assistant                  ║
║        Risk-Management Q&A with Source Citations          ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    let mut config = match &args.config {
        Some(path) => AssistantConfig::from_file(path)?,
        None => AssistantConfig::default(),
    };
    if let Some(corpus) = args.corpus {
        config.retrieval.corpus_path = Some(corpus);
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - LLM model: {}", config.llm.model);
    tracing::info!("  - Top k: {} (MMR lambda {})", config.retrieval.top_k, config.retrieval.mmr_lambda);
    tracing::info!("  - Topics: {}", config.scope.topics.len());

    // Check Ollama
    tracing::info!("Checking Ollama at {}...", config.llm.base_url);
    let client = OllamaClient::new(&config.llm)?;
    if client.health_check().await? {
        tracing::info!("Ollama is running");
    } else {
        tracing::warn!("Ollama not available at {}", config.llm.base_url);
        tracing::warn!("Please start Ollama:");
        tracing::warn!("  1. Start: ollama serve");
        tracing::warn!("  2. Pull the model: ollama pull {}", config.llm.model);
    }

    let server = GuidelineServer::new(config).await?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST   /api/ask                  - Ask a question");
    println!("  GET    /api/suggestions          - Quick questions");
    println!("  GET    /api/sessions/:id/summary - Session statistics");
    println!("  DELETE /api/sessions/:id         - Clear chat");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
