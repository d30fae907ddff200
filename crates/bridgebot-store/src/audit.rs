use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::debug;

use bridgebot_core::audit::{AuditRecord, AuditStore};
use bridgebot_core::errors::AuditError;

use crate::error::StoreError;
use crate::schema;

/// SQLite audit sink. Holds only a path: every write opens a fresh
/// connection, so no lock discipline is needed across worker threads. The
/// per-write open cost is accepted; audit volume is one row per incoming
/// message.
pub struct SqliteAuditStore {
    path: PathBuf,
}

impl SqliteAuditStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<Connection, StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::Io(format!("create dir: {e}")))?;
            }
        }

        let conn = Connection::open(&self.path)?;
        conn.execute_batch(schema::PRAGMAS)
            .map_err(|e| StoreError::Database(format!("pragmas: {e}")))?;
        conn.execute_batch(schema::CREATE_TABLES)
            .map_err(|e| StoreError::Database(format!("schema: {e}")))?;
        Ok(conn)
    }

    fn insert(&self, record: &AuditRecord) -> Result<(), StoreError> {
        let conn = self.open()?;
        conn.execute(
            "INSERT INTO messages (message_id, sender_id, sender_screen_name, received_at, text)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                record.message_id,
                record.sender_id,
                record.sender_screen_name,
                record.timestamp,
                record.text,
            ],
        )?;
        debug!(message_id = record.message_id, "audit row written");
        Ok(())
    }

    /// Most recent rows, newest first.
    pub fn recent(&self, limit: u32) -> Result<Vec<AuditRecord>, StoreError> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(
            "SELECT message_id, sender_id, sender_screen_name, received_at, text
             FROM messages ORDER BY rowid DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map([limit], |row| {
            Ok(AuditRecord {
                message_id: row.get(0)?,
                sender_id: row.get(1)?,
                sender_screen_name: row.get(2)?,
                timestamp: row.get(3)?,
                text: row.get(4)?,
            })
        })?;
        rows.collect::<Result<_, _>>().map_err(StoreError::from)
    }

    pub fn count(&self) -> Result<i64, StoreError> {
        let conn = self.open()?;
        conn.query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))
            .map_err(StoreError::from)
    }
}

impl AuditStore for SqliteAuditStore {
    fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
        self.insert(record).map_err(|e| AuditError::Write(e.to_string()))
    }
}
