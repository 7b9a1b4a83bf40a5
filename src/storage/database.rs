//! SQLite document store for the `chats` and `files` collections
//!
//! Every record carries `user_id` as its scoping key; reads and bulk deletes
//! are always per user. Rows are returned in insertion order.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::{ChatMessage, FileRecord, Sender};

/// SQLite-backed document store
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Create or open the database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(|e| Error::Store(format!("Failed to open database: {}", e)))?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.migrate()?;
        Ok(db)
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::Store(format!("Failed to open in-memory database: {}", e)))?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.migrate()?;
        Ok(db)
    }

    /// Run database migrations
    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock();

        // WAL mode for better concurrent write behavior
        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
        "#,
        )
        .map_err(|e| Error::Store(format!("Failed to set pragmas: {}", e)))?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS chats (
                id TEXT PRIMARY KEY,
                content TEXT NOT NULL,
                sender TEXT NOT NULL,
                user_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_chats_user_id ON chats(user_id);

            CREATE TABLE IF NOT EXISTS files (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                size INTEGER NOT NULL,
                mime_type TEXT NOT NULL,
                user_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_files_user_id ON files(user_id);
        "#,
        )
        .map_err(|e| Error::Store(format!("Failed to run migrations: {}", e)))?;

        tracing::debug!("Database migrations complete");
        Ok(())
    }

    // ==================== Chats ====================

    /// Insert a chat message
    pub fn insert_chat(&self, chat: &ChatMessage) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute(
            "INSERT INTO chats (id, content, sender, user_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                chat.id.to_string(),
                chat.content,
                chat.sender.as_str(),
                chat.user_id,
                chat.created_at,
                chat.updated_at,
            ],
        )
        .map_err(|e| Error::Store(format!("Failed to insert chat: {}", e)))?;

        Ok(())
    }

    /// All chat messages for a user, in insertion order
    pub fn find_chats(&self, user_id: &str) -> Result<Vec<ChatMessage>> {
        let conn = self.conn.lock();

        let mut stmt = conn
            .prepare(
                "SELECT id, content, sender, user_id, created_at, updated_at
                 FROM chats WHERE user_id = ?1",
            )
            .map_err(|e| Error::Store(format!("Failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map(params![user_id], row_to_chat)
            .map_err(|e| Error::Store(format!("Failed to query chats: {}", e)))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::Store(format!("Failed to read chat row: {}", e)))
    }

    /// Delete all chat messages for a user, returning the deleted count
    pub fn delete_chats(&self, user_id: &str) -> Result<usize> {
        let conn = self.conn.lock();

        conn.execute("DELETE FROM chats WHERE user_id = ?1", params![user_id])
            .map_err(|e| Error::Store(format!("Failed to delete chats: {}", e)))
    }

    // ==================== Files ====================

    /// Insert a file record
    pub fn insert_file(&self, record: &FileRecord) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute(
            "INSERT INTO files (id, name, size, mime_type, user_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.id.to_string(),
                record.name,
                record.size as i64,
                record.mime_type,
                record.user_id,
                record.created_at,
                record.updated_at,
            ],
        )
        .map_err(|e| Error::Store(format!("Failed to insert file record: {}", e)))?;

        Ok(())
    }

    /// All file records for a user, in insertion order
    pub fn find_files(&self, user_id: &str) -> Result<Vec<FileRecord>> {
        let conn = self.conn.lock();

        let mut stmt = conn
            .prepare(
                "SELECT id, name, size, mime_type, user_id, created_at, updated_at
                 FROM files WHERE user_id = ?1",
            )
            .map_err(|e| Error::Store(format!("Failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map(params![user_id], row_to_file)
            .map_err(|e| Error::Store(format!("Failed to query file records: {}", e)))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::Store(format!("Failed to read file row: {}", e)))
    }

    /// Delete all file records for a user, returning the deleted count
    pub fn delete_files(&self, user_id: &str) -> Result<usize> {
        let conn = self.conn.lock();

        conn.execute("DELETE FROM files WHERE user_id = ?1", params![user_id])
            .map_err(|e| Error::Store(format!("Failed to delete file records: {}", e)))
    }
}

fn row_to_chat(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChatMessage> {
    let id: String = row.get(0)?;
    let sender: String = row.get(2)?;
    let created_at: DateTime<Utc> = row.get(4)?;
    let updated_at: DateTime<Utc> = row.get(5)?;

    Ok(ChatMessage {
        id: parse_uuid(0, &id)?,
        content: row.get(1)?,
        // only values written through Sender::as_str reach this column
        sender: match sender.as_str() {
            "ai" => Sender::Ai,
            _ => Sender::User,
        },
        user_id: row.get(3)?,
        created_at,
        updated_at,
    })
}

fn row_to_file(row: &rusqlite::Row<'_>) -> rusqlite::Result<FileRecord> {
    let id: String = row.get(0)?;
    let size: i64 = row.get(2)?;
    let created_at: DateTime<Utc> = row.get(5)?;
    let updated_at: DateTime<Utc> = row.get(6)?;

    Ok(FileRecord {
        id: parse_uuid(0, &id)?,
        name: row.get(1)?,
        size: size as u64,
        mime_type: row.get(3)?,
        user_id: row.get(4)?,
        created_at,
        updated_at,
    })
}

fn parse_uuid(column: usize, raw: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
    })
}
