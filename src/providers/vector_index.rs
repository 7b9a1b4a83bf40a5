//! Vector index provider trait and record types
//!
//! The index is partitioned into namespaces; every operation is scoped to
//! one namespace so that users' chunks never mix.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::Result;

/// Metadata stored alongside each vector
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorMetadata {
    /// Chunk text, used to rebuild retrieval context
    pub text: String,
    /// Storage filename the chunk came from
    pub source: String,
    /// Position of the chunk within its document
    pub chunk_index: u32,
}

/// A vector ready for upsert
#[derive(Debug, Clone)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: VectorMetadata,
}

/// One retrieved nearest-neighbor chunk
#[derive(Debug, Clone)]
pub struct ChunkMatch {
    pub id: String,
    /// Similarity score, higher is more similar
    pub score: f32,
    pub metadata: VectorMetadata,
}

/// Per-namespace statistics
#[derive(Debug, Clone, Default)]
pub struct NamespaceStats {
    pub vector_count: u64,
}

/// Global index statistics
#[derive(Debug, Clone, Default)]
pub struct IndexStats {
    /// Known namespaces, keyed by namespace name
    pub namespaces: HashMap<String, NamespaceStats>,
}

/// Namespaced vector index operations
#[async_trait]
pub trait VectorIndexProvider: Send + Sync {
    /// Upsert vectors into a namespace
    async fn upsert(&self, namespace: &str, vectors: &[VectorRecord]) -> Result<()>;

    /// Query the `top_k` nearest chunks in a namespace. An unknown or empty
    /// namespace yields no matches rather than an error.
    async fn query(
        &self,
        namespace: &str,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<ChunkMatch>>;

    /// Delete every vector in a namespace
    async fn delete_all(&self, namespace: &str) -> Result<()>;

    /// Global index statistics, including the known namespace keys
    async fn describe_stats(&self) -> Result<IndexStats>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
