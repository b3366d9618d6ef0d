//! Extension-local key-value storage.
//!
//! Every window agent reads and writes the same keys. A `set` replaces the
//! whole value of one key atomically; there is no merge, lock or version check.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};
use serde_json::Value;

use crate::database::connection::Database;
use crate::types::errors::StorageError;

/// Persisted key-value substrate shared by all window agents.
#[async_trait(?Send)]
pub trait KeyValueStore {
    /// Returns the value stored under `key`, or `None` if it was never set.
    ///
    /// A stored value that is not valid JSON yields `StorageError::SerializationError`.
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Replaces the value stored under `key`.
    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;
}

/// Key-value store backed by the `storage_local` SQLite table.
#[derive(Clone)]
pub struct SqliteStorage {
    db: Arc<Database>,
}

impl SqliteStorage {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Writes raw text under `key` without JSON validation.
    pub fn set_raw(&self, key: &str, raw: &str) -> Result<(), StorageError> {
        self.upsert(key, raw)
    }

    fn upsert(&self, key: &str, text: &str) -> Result<(), StorageError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;
        self.db
            .connection()
            .execute(
                "INSERT INTO storage_local (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, text, now],
            )
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

#[async_trait(?Send)]
impl KeyValueStore for SqliteStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let raw: Option<String> = self
            .db
            .connection()
            .query_row(
                "SELECT value FROM storage_local WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;

        match raw {
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| StorageError::SerializationError(format!("{}: {}", key, e))),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let text = serde_json::to_string(&value)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        self.upsert(key, &text)
    }
}
