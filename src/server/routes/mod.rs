//! API routes

pub mod chat;
pub mod files;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::server::state::AppState;

/// Build the route table
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Ingestion - with larger body limit for file uploads
        .route(
            "/uploadFile/:userId",
            post(files::upload_file).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/uploadFile/:userId", get(files::list_files))
        // Chat
        .route("/chat/:userId", post(chat::create_chat))
        .route("/chat/:userId", get(chat::list_chats))
        // User data deletion
        .route("/deleteFile/:userId", delete(files::delete_user_data))
}
