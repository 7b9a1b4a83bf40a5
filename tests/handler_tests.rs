//! Smoke tests for the HTTP handlers, run against fake service providers.
//!
//! Each route gets at least one test covering its documented success and
//! failure shapes: envelope vs. plain-text bodies, status codes, and the
//! side effects on the document store and the (fake) vector index.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use pdf_rag::{
    config::Config,
    error::Result,
    providers::{
        vector_index::{ChunkMatch, IndexStats, NamespaceStats, VectorMetadata, VectorRecord},
        EmbeddingProvider, LlmProvider, VectorIndexProvider,
    },
    server::{state::AppState, Server},
    storage::Database,
    types::{ChatMessage, FileRecord, Sender},
};

// ── fakes ──

/// Embedder that maps any text to a tiny fixed-size vector
struct FakeEmbedder;

#[async_trait]
impl EmbeddingProvider for FakeEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(vec![text.len() as f32, 1.0, 0.0])
    }

    fn name(&self) -> &str {
        "fake-embedder"
    }
}

/// LLM that records the prompts it was called with and returns a canned reply
#[derive(Default)]
struct FakeLlm {
    calls: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl LlmProvider for FakeLlm {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.calls
            .lock()
            .push((system_prompt.to_string(), user_prompt.to_string()));
        Ok("canned answer".to_string())
    }

    fn name(&self) -> &str {
        "fake-llm"
    }
}

/// In-memory namespaced vector index
#[derive(Default)]
struct FakeIndex {
    namespaces: Mutex<HashMap<String, Vec<VectorRecord>>>,
}

#[async_trait]
impl VectorIndexProvider for FakeIndex {
    async fn upsert(&self, namespace: &str, vectors: &[VectorRecord]) -> Result<()> {
        self.namespaces
            .lock()
            .entry(namespace.to_string())
            .or_default()
            .extend_from_slice(vectors);
        Ok(())
    }

    async fn query(
        &self,
        namespace: &str,
        _vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<ChunkMatch>> {
        let namespaces = self.namespaces.lock();
        let records = match namespaces.get(namespace) {
            Some(records) => records,
            None => return Ok(Vec::new()),
        };

        Ok(records
            .iter()
            .take(top_k)
            .map(|r| ChunkMatch {
                id: r.id.clone(),
                score: 1.0,
                metadata: r.metadata.clone(),
            })
            .collect())
    }

    async fn delete_all(&self, namespace: &str) -> Result<()> {
        self.namespaces.lock().remove(namespace);
        Ok(())
    }

    async fn describe_stats(&self) -> Result<IndexStats> {
        Ok(IndexStats {
            namespaces: self
                .namespaces
                .lock()
                .iter()
                .map(|(name, records)| {
                    (
                        name.clone(),
                        NamespaceStats {
                            vector_count: records.len() as u64,
                        },
                    )
                })
                .collect(),
        })
    }

    fn name(&self) -> &str {
        "fake-index"
    }
}

// ── harness ──

/// Self-contained app with fake providers and a fresh temp directory
struct Harness {
    app: Router,
    db: Database,
    llm: Arc<FakeLlm>,
    index: Arc<FakeIndex>,
    _dir: TempDir,
}

impl Harness {
    fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");

        let mut config = Config::default();
        config.storage.upload_dir = dir.path().join("assets");
        config.storage.database_path = dir.path().join("pdf-rag.db");
        std::fs::create_dir_all(&config.storage.upload_dir).expect("create upload dir");

        let db = Database::in_memory().expect("open database");
        let llm = Arc::new(FakeLlm::default());
        let index = Arc::new(FakeIndex::default());

        let state = AppState::with_providers(
            config.clone(),
            db.clone(),
            Arc::new(FakeEmbedder),
            llm.clone(),
            index.clone(),
        );
        let app = Server::build_router(state, config.server.max_upload_size);

        Self {
            app,
            db,
            llm,
            index,
            _dir: dir,
        }
    }
}

fn seed_vector(text: &str, source: &str) -> VectorRecord {
    VectorRecord {
        id: uuid::Uuid::new_v4().to_string(),
        values: vec![1.0, 0.0, 0.0],
        metadata: VectorMetadata {
            text: text.to_string(),
            source: source.to_string(),
            chunk_index: 0,
        },
    }
}

// ── request helpers ──

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.expect("send request");
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes()
        .to_vec();
    (status, body)
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("build request")
}

fn multipart_request(uri: &str, field_name: &str, filename: &str, data: &[u8]) -> Request<Body> {
    const BOUNDARY: &str = "test-boundary";

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field_name, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/pdf\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .expect("build request")
}

fn parse_envelope(body: &[u8]) -> Value {
    serde_json::from_slice(body).expect("parse envelope")
}

// ── chat ──

#[tokio::test]
async fn chat_without_documents_answers_with_empty_context() {
    let h = Harness::new();

    let (status, body) = send(
        &h.app,
        json_request(Method::POST, "/chat/u1", json!({"content": "What is X?"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let envelope = parse_envelope(&body);
    assert_eq!(envelope["success"], json!(true));
    assert_eq!(envelope["message"], json!("Chat created"));
    assert_eq!(envelope["data"]["sender"], json!("ai"));
    assert_eq!(envelope["data"]["content"], json!("canned answer"));
    assert_eq!(envelope["data"]["userId"], json!("u1"));

    // the model still ran, with an empty context block
    let calls = h.llm.calls.lock();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].0.contains("helpful assistant"));
    assert_eq!(calls[0].1, "Context from PDF:\n\n\nQuestion: What is X?");
    drop(calls);

    // both sides of the conversation were persisted
    let chats = h.db.find_chats("u1").unwrap();
    assert_eq!(chats.len(), 2);
    assert_eq!(chats[0].sender, Sender::User);
    assert_eq!(chats[0].content, "What is X?");
    assert_eq!(chats[1].sender, Sender::Ai);
}

#[tokio::test]
async fn chat_context_joins_retrieved_chunks() {
    let h = Harness::new();
    h.index
        .upsert(
            "u1",
            &[
                seed_vector("first chunk", "doc-1.pdf"),
                seed_vector("second chunk", "doc-1.pdf"),
            ],
        )
        .await
        .unwrap();

    let (status, _) = send(
        &h.app,
        json_request(Method::POST, "/chat/u1", json!({"content": "q"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let calls = h.llm.calls.lock();
    assert_eq!(
        calls[0].1,
        "Context from PDF:\nfirst chunk\n\nsecond chunk\n\nQuestion: q"
    );
}

#[tokio::test]
async fn retrieval_is_scoped_to_the_requesting_user() {
    let h = Harness::new();
    h.index
        .upsert("alice", &[seed_vector("alpha secret", "doc.pdf")])
        .await
        .unwrap();

    let (status, _) = send(
        &h.app,
        json_request(Method::POST, "/chat/bob", json!({"content": "q"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &h.app,
        json_request(Method::POST, "/chat/alice", json!({"content": "q"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let calls = h.llm.calls.lock();
    assert!(!calls[0].1.contains("alpha secret"));
    assert!(calls[1].1.contains("alpha secret"));
}

#[tokio::test]
async fn chat_history_lists_messages_in_insertion_order() {
    let h = Harness::new();

    let (status, _) = send(
        &h.app,
        json_request(Method::POST, "/chat/u1", json!({"content": "first question"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&h.app, empty_request(Method::GET, "/chat/u1")).await;
    assert_eq!(status, StatusCode::OK);

    let envelope = parse_envelope(&body);
    assert_eq!(envelope["message"], json!("Chat found"));
    let data = envelope["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["sender"], json!("user"));
    assert_eq!(data[0]["content"], json!("first question"));
    assert_eq!(data[1]["sender"], json!("ai"));
}

#[tokio::test]
async fn chat_history_for_unknown_user_is_an_empty_list() {
    let h = Harness::new();

    let (status, body) = send(&h.app, empty_request(Method::GET, "/chat/nobody")).await;

    assert_eq!(status, StatusCode::OK);
    let envelope = parse_envelope(&body);
    assert_eq!(envelope["data"], json!([]));
}

// ── upload ──

#[tokio::test]
async fn upload_without_pdf_field_is_rejected() {
    let h = Harness::new();

    let (status, body) = send(
        &h.app,
        multipart_request("/uploadFile/u1", "other-field", "doc.pdf", b"whatever"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, b"No file uploaded");
    assert!(h.db.find_files("u1").unwrap().is_empty());
}

#[tokio::test]
async fn upload_of_unparseable_pdf_fails_after_recording_metadata() {
    let h = Harness::new();

    let (status, body) = send(
        &h.app,
        multipart_request("/uploadFile/u1", "pdf-file", "report.pdf", b"not a pdf"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, b"Error uploading file");

    // metadata is committed before extraction runs, and is not rolled back
    let files = h.db.find_files("u1").unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].name.starts_with("report-"));
    assert!(files[0].name.ends_with(".pdf"));
    assert_eq!(files[0].size, 9);
    assert_eq!(files[0].mime_type, "application/pdf");
}

#[tokio::test]
async fn file_listing_for_unknown_user_is_an_empty_list() {
    let h = Harness::new();

    let (status, body) = send(&h.app, empty_request(Method::GET, "/uploadFile/u1")).await;

    assert_eq!(status, StatusCode::OK);
    let envelope = parse_envelope(&body);
    assert_eq!(envelope["success"], json!(true));
    assert_eq!(envelope["data"], json!([]));
}

#[tokio::test]
async fn file_listing_returns_only_the_users_records() {
    let h = Harness::new();
    h.db.insert_file(&FileRecord::new("a-1.pdf", 10, "application/pdf", "u1"))
        .unwrap();
    h.db.insert_file(&FileRecord::new("b-2.pdf", 20, "application/pdf", "u2"))
        .unwrap();

    let (status, body) = send(&h.app, empty_request(Method::GET, "/uploadFile/u1")).await;

    assert_eq!(status, StatusCode::OK);
    let envelope = parse_envelope(&body);
    let data = envelope["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["name"], json!("a-1.pdf"));
    assert_eq!(data[0]["type"], json!("application/pdf"));
}

// ── deletion ──

#[tokio::test]
async fn delete_for_user_without_namespace_is_not_found() {
    let h = Harness::new();
    h.db.insert_chat(&ChatMessage::new("keep me", Sender::User, "u1"))
        .unwrap();

    let (status, body) = send(&h.app, empty_request(Method::DELETE, "/deleteFile/u1")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, b"Namespace not found");
    // nothing was touched
    assert_eq!(h.db.find_chats("u1").unwrap().len(), 1);
}

#[tokio::test]
async fn delete_purges_vectors_files_and_chats() {
    let h = Harness::new();
    h.index
        .upsert("u1", &[seed_vector("chunk", "doc-1.pdf")])
        .await
        .unwrap();
    h.db.insert_file(&FileRecord::new("doc-1.pdf", 10, "application/pdf", "u1"))
        .unwrap();
    h.db.insert_chat(&ChatMessage::new("hi", Sender::User, "u1"))
        .unwrap();

    let (status, body) = send(&h.app, empty_request(Method::DELETE, "/deleteFile/u1")).await;

    assert_eq!(status, StatusCode::OK);
    let envelope = parse_envelope(&body);
    assert_eq!(envelope["success"], json!(true));
    assert_eq!(envelope["data"], Value::Null);
    assert_eq!(envelope["message"], json!("File data deleted successfully"));

    assert!(h.db.find_files("u1").unwrap().is_empty());
    assert!(h.db.find_chats("u1").unwrap().is_empty());
    assert!(h.index.describe_stats().await.unwrap().namespaces.is_empty());
}

#[tokio::test]
async fn second_delete_returns_not_found() {
    let h = Harness::new();
    h.index
        .upsert("u1", &[seed_vector("chunk", "doc-1.pdf")])
        .await
        .unwrap();

    let (status, _) = send(&h.app, empty_request(Method::DELETE, "/deleteFile/u1")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&h.app, empty_request(Method::DELETE, "/deleteFile/u1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, b"Namespace not found");
}

// ── health ──

#[tokio::test]
async fn health_check_is_ok() {
    let h = Harness::new();

    let (status, body) = send(&h.app, empty_request(Method::GET, "/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}
