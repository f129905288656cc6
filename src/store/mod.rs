// src/store/mod.rs
//! The document store boundary: flat key-value records grouped into named
//! collections, reached only through the [`DocumentStore`] trait.
//!
//! Backend failures never cross this boundary raw; they are classified into
//! [`StoreError`] so callers can react without knowing the backend.

pub mod codec;
pub mod sqlite;

pub use sqlite::SqliteStore;

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;

/// Flat field map of one document (no nesting beyond JSON values).
pub type Fields = Map<String, Value>;

#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

// ==================== COLLECTIONS ====================

pub mod collections {
    pub const INVENTORY: &str = "inventory";
    pub const EMPLOYEES: &str = "employees";
    pub const TASKS: &str = "tasks";
    pub const ACTIVITY_LOGS: &str = "activity_logs";
    pub const USERS: &str = "users";
}

// ==================== ERROR CLASSIFICATION ====================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound(String),
    PermissionDenied(String),
    Unavailable(String),
    Unknown(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StoreError::NotFound(msg) => write!(f, "not found: {}", msg),
            StoreError::PermissionDenied(msg) => write!(f, "permission denied: {}", msg),
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {}", msg),
            StoreError::Unknown(msg) => write!(f, "store error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl StoreError {
    pub fn document_not_found(collection: &str, id: &str) -> Self {
        StoreError::NotFound(format!("no document '{}' in collection '{}'", id, collection))
    }

    pub fn malformed(collection: &str, field: &str, reason: &str) -> Self {
        StoreError::Unknown(format!(
            "malformed document in '{}': field '{}' {}",
            collection, field, reason
        ))
    }
}

// ==================== STORE TRAIT ====================

/// One collection per entity type; documents are flat field maps.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Document, StoreError>;

    /// Persists the fields under a store-assigned id and returns the stored
    /// document.
    async fn create(&self, collection: &str, fields: Fields) -> Result<Document, StoreError>;

    /// Full replace of the document's fields.
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Creates or fully replaces the document under a caller-chosen id.
    /// Used where the id comes from outside the store (the `users`
    /// collection is keyed by the identity provider's user id).
    async fn put(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}
