//! PDF chat backend binary
//!
//! Run with: cargo run --bin pdf-rag-server

use pdf_rag::{Config, Server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.mistral.embed_model);
    tracing::info!("  - Chat model: {}", config.mistral.chat_model);
    tracing::info!(
        "  - Chunk size: {} (overlap {})",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );
    tracing::info!("  - Upload dir: {}", config.storage.upload_dir.display());

    // Create and start server
    let server = Server::new(config)?;
    tracing::info!("Listening on http://{}", server.address());

    server.start().await?;

    Ok(())
}
