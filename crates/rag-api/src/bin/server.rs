//! RAG API server binary
//!
//! Run with: cargo run -p rag-api --bin rag-api-server -- --config rag-api.toml

use clap::Parser;
use rag_api::{config::RagApiConfig, server::RagApiServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Document ingestion and question answering API
#[derive(Debug, Parser)]
#[command(name = "rag-api-server", version, about)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "RAG_API_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen host
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rag_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                         RAG API                           ║
║          Document Ingestion & Question Answering          ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    // Load configuration
    let mut config = RagApiConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Memory service: {}", config.memory.service_url);
    tracing::info!("  - Vector store: {}", config.backend.qdrant.host);
    tracing::info!("  - LLM model: {}", config.backend.ollama.model);
    tracing::info!("  - Embedding model: {}", config.backend.ollama.embedding_model);
    tracing::info!("  - Document storage: {}", config.backend.storage_dir.display());

    check_backends(&config).await;

    let server = RagApiServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /ask     - Ask a question");
    println!("  POST /upload  - Upload a document");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}

/// Warn about unreachable backing services; the server starts regardless
async fn check_backends(config: &RagApiConfig) {
    let client = reqwest::Client::new();
    let checks = [
        ("Memory service", format!("{}/health", config.memory.service_url)),
        ("Qdrant", format!("{}/healthz", config.backend.qdrant.host)),
        ("Ollama", format!("{}/api/tags", config.backend.ollama.service_url)),
    ];

    for (name, url) in checks {
        tracing::info!("Checking {} at {}...", name, url);
        match client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => {
                tracing::info!("{} is running", name);
            }
            _ => {
                tracing::warn!("{} not available at {}", name, url);
            }
        }
    }
}
