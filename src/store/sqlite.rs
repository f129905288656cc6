// src/store/sqlite.rs
//! SQLite-backed document store: one `documents` table keyed by
//! (collection, id), payloads stored as JSON text.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

use super::{Document, DocumentStore, Fields, StoreError};

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(database_path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(classify)?;
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Fresh throwaway store for tests. One pooled connection only: each
    /// `:memory:` connection would otherwise be its own database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(classify)?;
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query("PRAGMA journal_mode = WAL")
            .execute(&self.pool)
            .await
            .map_err(classify)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL CHECK(length(collection) > 0),
                id TEXT NOT NULL CHECK(length(id) > 0),
                data TEXT NOT NULL,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL,
                PRIMARY KEY (collection, id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents (collection, created_at)",
        )
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        Ok(())
    }
}

fn encode_fields(fields: &Fields) -> Result<String, StoreError> {
    serde_json::to_string(&Value::Object(fields.clone()))
        .map_err(|e| StoreError::Unknown(format!("failed to encode document: {}", e)))
}

fn decode_fields(collection: &str, id: &str, data: &str) -> Result<Fields, StoreError> {
    match serde_json::from_str::<Value>(data) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(StoreError::Unknown(format!(
            "document '{}' in '{}' is not a flat record",
            id, collection
        ))),
        Err(e) => Err(StoreError::Unknown(format!(
            "document '{}' in '{}' holds invalid JSON: {}",
            id, collection, e
        ))),
    }
}

/// Map backend failures onto the store taxonomy; nothing sqlx-specific may
/// escape this module.
fn classify(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::RowNotFound => StoreError::NotFound("row not found".to_string()),
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StoreError::Unavailable(err.to_string()),
        _ => StoreError::Unknown(err.to_string()),
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT id, data FROM documents WHERE collection = ? ORDER BY created_at, id")
                .bind(collection)
                .fetch_all(&self.pool)
                .await
                .map_err(classify)?;

        rows.into_iter()
            .map(|(id, data)| {
                let fields = decode_fields(collection, &id, &data)?;
                Ok(Document { id, fields })
            })
            .collect()
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Document, StoreError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT data FROM documents WHERE collection = ? AND id = ?")
                .bind(collection)
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(classify)?;

        match row {
            Some((data,)) => Ok(Document {
                id: id.to_string(),
                fields: decode_fields(collection, id, &data)?,
            }),
            None => Err(StoreError::document_not_found(collection, id)),
        }
    }

    async fn create(&self, collection: &str, fields: Fields) -> Result<Document, StoreError> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let data = encode_fields(&fields)?;

        sqlx::query(
            r#"INSERT INTO documents (collection, id, data, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(collection)
        .bind(&id)
        .bind(&data)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        Ok(Document { id, fields })
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        let data = encode_fields(&fields)?;
        let result = sqlx::query(
            "UPDATE documents SET data = ?, updated_at = ? WHERE collection = ? AND id = ?",
        )
        .bind(&data)
        .bind(Utc::now())
        .bind(collection)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::document_not_found(collection, id));
        }
        Ok(())
    }

    async fn put(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        let data = encode_fields(&fields)?;
        let now = Utc::now();
        sqlx::query(
            r#"INSERT INTO documents (collection, id, data, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT (collection, id)
               DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at"#,
        )
        .bind(collection)
        .bind(id)
        .bind(&data)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(classify)?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::document_not_found(collection, id));
        }
        Ok(())
    }
}

// ==================== TESTS ====================
