//! Document Q&A server binary
//!
//! Run with: cargo run -p docchat-rag --bin docchat-rag-server

use docchat_rag::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docchat_rag=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from DOCCHAT_RAG_CONFIG if set, defaults otherwise
    let config = match std::env::var("DOCCHAT_RAG_CONFIG") {
        Ok(path) => {
            tracing::info!("Loading configuration from {}", path);
            RagConfig::load(&path)?
        }
        Err(_) => RagConfig::default(),
    };

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - Generation model: {}", config.llm.generate_model);
    tracing::info!("  - Chunk size: {}", config.chunking.chunk_size);
    tracing::info!("  - Chunk overlap: {}", config.chunking.chunk_overlap);

    // Check Ollama availability up front; the server still starts without
    // it, queries just degrade.
    let client = reqwest::Client::new();
    match client
        .get(format!("{}/api/tags", config.llm.base_url))
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!("Ollama is running at {}", config.llm.base_url);
        }
        _ => {
            tracing::warn!("Ollama not available at {}", config.llm.base_url);
            tracing::warn!("Start it with: ollama serve");
            tracing::warn!(
                "Then pull models: ollama pull {} && ollama pull {}",
                config.llm.embed_model,
                config.llm.generate_model
            );
        }
    }

    let server = RagServer::new(config)?;

    tracing::info!("Endpoints:");
    tracing::info!("  POST /upload/pdf              - Upload a PDF");
    tracing::info!("  POST /chat                    - Ask a question");
    tracing::info!("  GET  /chat/conversation/:id   - One conversation's messages");
    tracing::info!("  GET  /chat/conversations      - Conversation summaries");
    tracing::info!("  GET  /health                  - Health check");

    server.start().await?;

    Ok(())
}
