//! SQLite transcript store implementation.
//!
//! Implements `TranscriptStore` from `reverie-core` using sqlx with split
//! read/write pools. Persists the per-session ordered message log so a
//! session survives restarts.

use chrono::Utc;
use sqlx::Row;

use reverie_core::memory::transcript::TranscriptStore;
use reverie_types::error::PersistenceError;
use reverie_types::message::{Role, TranscriptMessage};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `TranscriptStore`.
pub struct SqliteTranscriptStore {
    pool: DatabasePool,
}

impl SqliteTranscriptStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Internal row type
// ---------------------------------------------------------------------------

struct TranscriptRow {
    role: String,
    content: String,
    sequence: i64,
}

impl TranscriptRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            sequence: row.try_get("sequence")?,
        })
    }

    fn into_message(self) -> Result<TranscriptMessage, PersistenceError> {
        let role: Role = self
            .role
            .parse()
            .map_err(|_| PersistenceError::Query(format!("unknown role: {}", self.role)))?;
        Ok(TranscriptMessage {
            role,
            content: self.content,
            sequence: self.sequence as u64,
        })
    }
}

// ---------------------------------------------------------------------------
// TranscriptStore impl
// ---------------------------------------------------------------------------

impl TranscriptStore for SqliteTranscriptStore {
    async fn append(
        &self,
        session_id: &str,
        message: &TranscriptMessage,
    ) -> Result<(), PersistenceError> {
        sqlx::query(
            r#"INSERT INTO transcript_messages (session_id, sequence, role, content, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(session_id)
        .bind(message.sequence as i64)
        .bind(message.role.to_string())
        .bind(&message.content)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| PersistenceError::Query(e.to_string()))?;

        Ok(())
    }

    async fn load(&self, session_id: &str) -> Result<Vec<TranscriptMessage>, PersistenceError> {
        let rows = sqlx::query(
            r#"SELECT role, content, sequence FROM transcript_messages
               WHERE session_id = ?
               ORDER BY sequence ASC"#,
        )
        .bind(session_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| PersistenceError::Query(e.to_string()))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let r =
                TranscriptRow::from_row(row).map_err(|e| PersistenceError::Query(e.to_string()))?;
            messages.push(r.into_message()?);
        }
        Ok(messages)
    }

    async fn clear(&self, session_id: &str) -> Result<(), PersistenceError> {
        sqlx::query("DELETE FROM transcript_messages WHERE session_id = ?")
            .bind(session_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| PersistenceError::Query(e.to_string()))?;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
