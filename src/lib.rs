//! pdf-rag: a thin HTTP backend for chatting with uploaded PDFs
//!
//! Uploaded PDFs are chunked and embedded into a per-user namespace of an
//! external vector index; chat requests retrieve the most similar chunks and
//! ground an external language model's answer on them. The backend itself is
//! a stateless orchestrator over the document store and the two services.

pub mod config;
pub mod error;
pub mod ingestion;
pub mod providers;
pub mod server;
pub mod storage;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use server::Server;
