//! File upload, listing, and user-data deletion endpoints

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::ingestion::{PdfParser, TextChunker};
use crate::providers::vector_index::{VectorMetadata, VectorRecord};
use crate::server::state::AppState;
use crate::types::{response::ApiResponse, FileRecord};

/// POST /uploadFile/:userId - ingest one PDF for a user
pub async fn upload_file(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    multipart: Multipart,
) -> Response {
    let upload = match read_pdf_field(multipart).await {
        Ok(Some(upload)) => upload,
        Ok(None) => return (StatusCode::BAD_REQUEST, "No file uploaded").into_response(),
        Err(e) => {
            tracing::error!("Failed to read upload for '{}': {}", user_id, e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error uploading file").into_response();
        }
    };

    match ingest_upload(&state, &user_id, upload).await {
        Ok(()) => (StatusCode::OK, "File uploaded successfully").into_response(),
        Err(e) => {
            tracing::error!("Upload failed for '{}': {}", user_id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error uploading file").into_response()
        }
    }
}

/// One file pulled out of the multipart body
struct PdfUpload {
    original_name: String,
    mime_type: String,
    data: Vec<u8>,
}

/// Pull the `pdf-file` field out of the multipart body
async fn read_pdf_field(mut multipart: Multipart) -> Result<Option<PdfUpload>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Multipart(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some("pdf-file") {
            continue;
        }

        let original_name = field.file_name().unwrap_or("document.pdf").to_string();
        let mime_type = field.content_type().map(|m| m.to_string()).unwrap_or_else(|| {
            mime_guess::from_path(&original_name)
                .first_or_octet_stream()
                .to_string()
        });
        let data = field
            .bytes()
            .await
            .map_err(|e| Error::Multipart(format!("Failed to read file: {}", e)))?;

        return Ok(Some(PdfUpload {
            original_name,
            mime_type,
            data: data.to_vec(),
        }));
    }

    Ok(None)
}

/// Storage filename: original base name, upload-millis suffix, extension.
/// The suffix keeps repeated uploads of the same file from colliding.
fn storage_filename(original: &str, now_millis: i64) -> String {
    let path = std::path::Path::new(original);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");

    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}-{}.{}", stem, now_millis, ext),
        None => format!("{}-{}", stem, now_millis),
    }
}

/// Ingestion pipeline: save the file, record metadata, extract text, chunk,
/// embed, and upsert into the user's namespace. Steps already committed are
/// not rolled back when a later step fails.
async fn ingest_upload(state: &AppState, user_id: &str, upload: PdfUpload) -> Result<()> {
    let name = storage_filename(&upload.original_name, chrono::Utc::now().timestamp_millis());

    let dest = state.config().storage.upload_dir.join(&name);
    tokio::fs::write(&dest, &upload.data).await?;

    let record = FileRecord::new(
        name.clone(),
        upload.data.len() as u64,
        upload.mime_type,
        user_id,
    );
    state.database().insert_file(&record)?;

    let content = PdfParser::extract(&upload.data)?;

    let chunking = &state.config().chunking;
    let chunker = TextChunker::new(chunking.chunk_size, chunking.chunk_overlap);
    let chunks = chunker.split(&content);
    tracing::info!("Extracted {} chunks from '{}'", chunks.len(), name);

    let embeddings = state.embedder().embed_batch(&chunks).await?;

    let vectors: Vec<VectorRecord> = chunks
        .into_iter()
        .zip(embeddings)
        .enumerate()
        .map(|(i, (text, values))| VectorRecord {
            id: Uuid::new_v4().to_string(),
            values,
            metadata: VectorMetadata {
                text,
                source: name.clone(),
                chunk_index: i as u32,
            },
        })
        .collect();

    state.index().upsert(user_id, &vectors).await?;

    Ok(())
}

/// GET /uploadFile/:userId - list a user's file records
pub async fn list_files(State(state): State<AppState>, Path(user_id): Path<String>) -> Response {
    match state.database().find_files(&user_id) {
        Ok(files) => (
            StatusCode::OK,
            Json(ApiResponse::success(files, "File found", 200)),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to list files for '{}': {}", user_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Error fetching files", 500)),
            )
                .into_response()
        }
    }
}

/// DELETE /deleteFile/:userId - purge a user's vectors, files, and chats
pub async fn delete_user_data(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Response {
    match purge_user(&state, &user_id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(ApiResponse::empty("File data deleted successfully", 200)),
        )
            .into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Namespace not found").into_response(),
        Err(e) => {
            tracing::error!("Failed to delete data for '{}': {}", user_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Error deleting user data", 500)),
            )
                .into_response()
        }
    }
}

/// Returns false when the user has no namespace in the index. The three
/// deletes run in a fixed order with no surrounding transaction.
async fn purge_user(state: &AppState, user_id: &str) -> Result<bool> {
    let stats = state.index().describe_stats().await?;
    if !stats.namespaces.contains_key(user_id) {
        return Ok(false);
    }

    state.index().delete_all(user_id).await?;
    let files = state.database().delete_files(user_id)?;
    let chats = state.database().delete_chats(user_id)?;
    tracing::info!(
        "Deleted namespace '{}' ({} file records, {} chat records)",
        user_id,
        files,
        chats
    );

    Ok(true)
}
