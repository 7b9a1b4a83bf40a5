//! Environment-driven configuration

use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Main backend configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Local storage configuration
    pub storage: StorageConfig,
    /// Text chunking configuration
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Mistral API configuration
    pub mistral: MistralConfig,
    /// Pinecone index configuration
    pub pinecone: PineconeConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5050,
            max_upload_size: 50 * 1024 * 1024, // 50MB
        }
    }
}

/// Local storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory uploaded files are written to
    pub upload_dir: PathBuf,
    /// Path of the SQLite document store
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("./assets"),
            database_path: PathBuf::from("./data/pdf-rag.db"),
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between adjacent chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 100,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Number of chunks retrieved per question
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

/// Mistral API configuration (embeddings + chat completions)
#[derive(Debug, Clone)]
pub struct MistralConfig {
    /// API key
    pub api_key: String,
    /// API base URL
    pub base_url: String,
    /// Embedding model name
    pub embed_model: String,
    /// Chat model name
    pub chat_model: String,
}

impl Default for MistralConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.mistral.ai".to_string(),
            embed_model: "mistral-embed".to_string(),
            chat_model: "mistral-small-latest".to_string(),
        }
    }
}

/// Pinecone index configuration
#[derive(Debug, Clone, Default)]
pub struct PineconeConfig {
    /// API key
    pub api_key: String,
    /// Data-plane URL of the index
    pub index_host: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let server = ServerConfig {
            host: env::var("HOST").unwrap_or_else(|_| ServerConfig::default().host),
            port: match env::var("PORT") {
                Ok(raw) => raw
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid PORT: {}", raw)))?,
                Err(_) => ServerConfig::default().port,
            },
            max_upload_size: ServerConfig::default().max_upload_size,
        };

        let storage = StorageConfig {
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| StorageConfig::default().upload_dir),
            database_path: env::var("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| StorageConfig::default().database_path),
        };

        let mistral = MistralConfig {
            api_key: require("MISTRAL_API_KEY")?,
            base_url: env::var("MISTRAL_BASE_URL")
                .unwrap_or_else(|_| MistralConfig::default().base_url),
            embed_model: env::var("MISTRAL_EMBED_MODEL")
                .unwrap_or_else(|_| MistralConfig::default().embed_model),
            chat_model: env::var("MISTRAL_CHAT_MODEL")
                .unwrap_or_else(|_| MistralConfig::default().chat_model),
        };

        let pinecone = PineconeConfig {
            api_key: require("PINECONE_API_KEY")?,
            index_host: require("PINECONE_INDEX_HOST")?,
        };

        Ok(Self {
            server,
            storage,
            chunking: ChunkingConfig::default(),
            retrieval: RetrievalConfig::default(),
            mistral,
            pinecone,
        })
    }
}

fn require(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("{} is not set", name)))
}
