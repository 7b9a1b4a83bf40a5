//! Chat endpoints: grounded question answering and history

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{response::ApiResponse, ChatMessage, Sender};

/// System instruction for every chat completion
const SYSTEM_PROMPT: &str = "You are a helpful assistant answering questions from a PDF.";

/// Request body for POST /chat/:userId
#[derive(Debug, Deserialize)]
pub struct CreateChatRequest {
    pub content: String,
}

/// POST /chat/:userId - answer a question grounded on the user's documents
pub async fn create_chat(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<CreateChatRequest>,
) -> Response {
    match answer_question(&state, &user_id, &request.content).await {
        Ok(reply) => (
            StatusCode::OK,
            Json(ApiResponse::success(reply, "Chat created", 200)),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Chat failed for '{}': {}", user_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Chat not created", 500)),
            )
                .into_response()
        }
    }
}

/// Retrieval-augmented answer flow; returns the persisted assistant message.
/// The incoming question is persisted before retrieval, so it survives even
/// when no reply follows.
async fn answer_question(state: &AppState, user_id: &str, content: &str) -> Result<ChatMessage> {
    let question = ChatMessage::new(content, Sender::User, user_id);
    state.database().insert_chat(&question)?;

    let query_embedding = state.embedder().embed(content).await?;
    let matches = state
        .index()
        .query(user_id, &query_embedding, state.config().retrieval.top_k)
        .await?;
    tracing::info!("Retrieved {} chunks for '{}'", matches.len(), user_id);

    let context = matches
        .iter()
        .map(|m| m.metadata.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    let answer = state
        .llm()
        .generate(SYSTEM_PROMPT, &build_user_prompt(&context, content))
        .await?;

    let reply = ChatMessage::new(answer, Sender::Ai, user_id);
    state.database().insert_chat(&reply)?;

    Ok(reply)
}

/// Compose the grounded user turn: retrieved context first, question after
fn build_user_prompt(context: &str, question: &str) -> String {
    format!("Context from PDF:\n{}\n\nQuestion: {}", context, question)
}

/// GET /chat/:userId - full chat history for a user
pub async fn list_chats(State(state): State<AppState>, Path(user_id): Path<String>) -> Response {
    match state.database().find_chats(&user_id) {
        Ok(chats) => (
            StatusCode::OK,
            Json(ApiResponse::success(chats, "Chat found", 200)),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to list chats for '{}': {}", user_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Chat not found", 500)),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_prompt_places_context_before_question() {
        let prompt = build_user_prompt("chunk a\n\nchunk b", "What is X?");

        assert!(prompt.starts_with("Context from PDF:\nchunk a"));
        assert!(prompt.ends_with("Question: What is X?"));
    }

    #[test]
    fn user_prompt_with_empty_context_keeps_the_question() {
        let prompt = build_user_prompt("", "What is X?");
        assert_eq!(prompt, "Context from PDF:\n\n\nQuestion: What is X?");
    }
}
