//! Error types for the backend

use thiserror::Error;

/// Result type alias for backend operations
pub type Result<T> = std::result::Result<T, Error>;

/// Backend errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// PDF text extraction error
    #[error("Failed to extract PDF text: {0}")]
    PdfParse(String),

    /// Embedding service error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Vector index error
    #[error("Vector index error: {0}")]
    VectorIndex(String),

    /// Language model error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Document store error
    #[error("Store error: {0}")]
    Store(String),

    /// Multipart body error
    #[error("Multipart error: {0}")]
    Multipart(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
