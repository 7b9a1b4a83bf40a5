//! Persistence record types
//!
//! Both record types are created once, never mutated, and deleted only in
//! bulk when a user's data is purged. Wire format is camelCase to match the
//! envelope.

pub mod response;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The human asking questions
    User,
    /// The assistant's generated reply
    Ai,
}

impl Sender {
    /// Stable string form, also used as the stored column value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Ai => "ai",
        }
    }
}

/// A single chat turn, scoped to its owning user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Unique message ID
    pub id: Uuid,
    /// Message text
    pub content: String,
    /// Message author
    pub sender: Sender,
    /// Opaque owner key
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a new message with fresh timestamps
    pub fn new(
        content: impl Into<String>,
        sender: Sender,
        user_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            sender,
            user_id: user_id.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Metadata for one uploaded file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Unique record ID
    pub id: Uuid,
    /// Storage filename: original base name, upload-millis suffix, extension
    pub name: String,
    /// File size in bytes as reported by the upload
    pub size: u64,
    /// MIME type as reported by the upload
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Opaque owner key
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FileRecord {
    /// Create a new record with fresh timestamps
    pub fn new(
        name: impl Into<String>,
        size: u64,
        mime_type: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            size,
            mime_type: mime_type.into(),
            user_id: user_id.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_message_serializes_camel_case() {
        let msg = ChatMessage::new("hi", Sender::Ai, "u1");
        let value = serde_json::to_value(&msg).unwrap();

        assert_eq!(value["sender"], serde_json::json!("ai"));
        assert_eq!(value["userId"], serde_json::json!("u1"));
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
    }

    #[test]
    fn file_record_uses_type_key() {
        let record = FileRecord::new("report-1700000000000.pdf", 3, "application/pdf", "u1");
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["type"], serde_json::json!("application/pdf"));
        assert_eq!(value["size"], serde_json::json!(3));
        assert_eq!(value["name"], serde_json::json!("report-1700000000000.pdf"));
    }
}
