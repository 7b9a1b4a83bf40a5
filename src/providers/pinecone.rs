//! Pinecone data-plane client
//!
//! Talks to a single index over its data-plane host: upserts, similarity
//! queries, namespace purges, and index statistics.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::PineconeConfig;
use crate::error::{Error, Result};

use super::vector_index::{
    ChunkMatch, IndexStats, NamespaceStats, VectorIndexProvider, VectorMetadata, VectorRecord,
};

/// REST client for one Pinecone index
pub struct PineconeIndex {
    client: Client,
    config: PineconeConfig,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: Vec<WireVector<'a>>,
    namespace: &'a str,
}

#[derive(Serialize)]
struct WireVector<'a> {
    id: &'a str,
    values: &'a [f32],
    metadata: &'a VectorMetadata,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    namespace: &'a str,
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<WireMatch>,
}

#[derive(Deserialize)]
struct WireMatch {
    id: String,
    #[serde(default)]
    score: f32,
    metadata: Option<VectorMetadata>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteRequest<'a> {
    delete_all: bool,
    namespace: &'a str,
}

#[derive(Deserialize)]
struct StatsResponse {
    #[serde(default)]
    namespaces: HashMap<String, WireNamespaceStats>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireNamespaceStats {
    #[serde(default)]
    vector_count: u64,
}

impl PineconeIndex {
    /// Create a new client for the configured index host
    pub fn new(config: &PineconeConfig) -> Self {
        Self {
            client: Client::new(),
            config: config.clone(),
        }
    }

    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.config.index_host.trim_end_matches('/'), path);

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::VectorIndex(format!("Index request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::VectorIndex(format!(
                "Index request failed ({}): {}",
                status, body
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl VectorIndexProvider for PineconeIndex {
    async fn upsert(&self, namespace: &str, vectors: &[VectorRecord]) -> Result<()> {
        if vectors.is_empty() {
            return Ok(());
        }

        // batch upserts, 100 vectors per request
        for batch in vectors.chunks(100) {
            let request = UpsertRequest {
                vectors: batch
                    .iter()
                    .map(|v| WireVector {
                        id: &v.id,
                        values: &v.values,
                        metadata: &v.metadata,
                    })
                    .collect(),
                namespace,
            };

            self.post_json("/vectors/upsert", &request).await?;
        }

        Ok(())
    }

    async fn query(
        &self,
        namespace: &str,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<ChunkMatch>> {
        let request = QueryRequest {
            namespace,
            vector,
            top_k,
            include_metadata: true,
        };

        let response = self.post_json("/query", &request).await?;

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| Error::VectorIndex(format!("Failed to parse query response: {}", e)))?;

        Ok(parsed
            .matches
            .into_iter()
            .map(|m| ChunkMatch {
                id: m.id,
                score: m.score,
                metadata: m.metadata.unwrap_or_default(),
            })
            .collect())
    }

    async fn delete_all(&self, namespace: &str) -> Result<()> {
        let request = DeleteRequest {
            delete_all: true,
            namespace,
        };

        self.post_json("/vectors/delete", &request).await?;
        Ok(())
    }

    async fn describe_stats(&self) -> Result<IndexStats> {
        let response = self
            .post_json("/describe_index_stats", &serde_json::json!({}))
            .await?;

        let parsed: StatsResponse = response
            .json()
            .await
            .map_err(|e| Error::VectorIndex(format!("Failed to parse stats response: {}", e)))?;

        Ok(IndexStats {
            namespaces: parsed
                .namespaces
                .into_iter()
                .map(|(name, stats)| {
                    (
                        name,
                        NamespaceStats {
                            vector_count: stats.vector_count,
                        },
                    )
                })
                .collect(),
        })
    }

    fn name(&self) -> &str {
        "pinecone"
    }
}
