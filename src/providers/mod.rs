//! Provider abstractions for embeddings, chat completion, and vector storage
//!
//! The trait seams let handler flows swap the real Mistral and Pinecone
//! clients for fakes in tests.

pub mod embedding;
pub mod llm;
pub mod mistral;
pub mod pinecone;
pub mod vector_index;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use mistral::{MistralChat, MistralEmbedder};
pub use pinecone::PineconeIndex;
pub use vector_index::VectorIndexProvider;
