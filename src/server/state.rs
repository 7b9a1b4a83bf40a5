//! Application state for the HTTP server

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::providers::{
    EmbeddingProvider, LlmProvider, MistralChat, MistralEmbedder, PineconeIndex,
    VectorIndexProvider,
};
use crate::storage::Database;

/// Shared application state: configuration, the document store, and the
/// external service clients, all constructed once per process
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    database: Database,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
    index: Arc<dyn VectorIndexProvider>,
}

impl AppState {
    /// Create state with the real Mistral and Pinecone clients
    pub fn new(config: Config) -> Result<Self> {
        if let Some(parent) = config.storage.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::create_dir_all(&config.storage.upload_dir)?;

        let database = Database::open(&config.storage.database_path)?;
        tracing::info!("Document store initialized");

        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(MistralEmbedder::new(&config.mistral));
        let llm: Arc<dyn LlmProvider> = Arc::new(MistralChat::new(&config.mistral));
        let index: Arc<dyn VectorIndexProvider> = Arc::new(PineconeIndex::new(&config.pinecone));
        tracing::info!(
            "Service clients initialized (embeddings: {}, llm: {}, index: {})",
            embedder.name(),
            llm.name(),
            index.name()
        );

        Ok(Self::with_providers(config, database, embedder, llm, index))
    }

    /// Create state from explicit parts; lets tests substitute fakes
    pub fn with_providers(
        config: Config,
        database: Database,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        index: Arc<dyn VectorIndexProvider>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                database,
                embedder,
                llm,
                index,
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the document store
    pub fn database(&self) -> &Database {
        &self.inner.database
    }

    /// Get the embedding provider
    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.inner.embedder
    }

    /// Get the LLM provider
    pub fn llm(&self) -> &Arc<dyn LlmProvider> {
        &self.inner.llm
    }

    /// Get the vector index provider
    pub fn index(&self) -> &Arc<dyn VectorIndexProvider> {
        &self.inner.index
    }
}
