// src/repo.rs
//! Typed adapters between entities and store documents.
//!
//! Each entity declares its collection and its field codec; `Collection<T>`
//! wraps the store handle with typed CRUD. Adapter calls never touch caller
//! state: a failed call leaves every in-memory collection exactly as it was.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::models::{ActivityLog, Employee, InventoryItem, Task, User};
use crate::store::codec::{
    opt_map, opt_str, put_opt_map, put_opt_str, put_str, put_timestamp, put_u32, req_enum,
    req_str, req_timestamp, req_u32,
};
use crate::store::{collections, Document, DocumentStore, Fields, StoreError};

// ==================== CODEC TRAIT ====================

/// Translation between one entity type and its flat document shape.
/// `encode` never includes the id: the store owns id assignment.
pub trait DocumentCodec: Sized + Clone + Send + Sync {
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
    fn with_id(self, id: String) -> Self;
    fn encode(&self) -> Fields;
    fn decode(doc: &Document) -> Result<Self, StoreError>;
}

// ==================== TYPED COLLECTION ====================

pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    _entity: PhantomData<T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

impl<T: DocumentCodec> Collection<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    pub async fn list(&self) -> Result<Vec<T>, StoreError> {
        let documents = self.store.list(T::COLLECTION).await?;
        documents.iter().map(T::decode).collect()
    }

    pub async fn get(&self, id: &str) -> Result<T, StoreError> {
        let document = self.store.get(T::COLLECTION, id).await?;
        T::decode(&document)
    }

    /// Persists a record whose id is not yet assigned and returns it with
    /// the store-assigned id filled in.
    pub async fn create(&self, record: T) -> Result<T, StoreError> {
        let document = self.store.create(T::COLLECTION, record.encode()).await?;
        Ok(record.with_id(document.id))
    }

    pub async fn update(&self, record: &T) -> Result<(), StoreError> {
        self.store
            .update(T::COLLECTION, record.id(), record.encode())
            .await
    }

    /// Create-or-replace under the record's own id (externally keyed
    /// collections only).
    pub async fn put(&self, record: &T) -> Result<(), StoreError> {
        self.store
            .put(T::COLLECTION, record.id(), record.encode())
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete(T::COLLECTION, id).await
    }
}

// ==================== INVENTORY ====================

impl DocumentCodec for InventoryItem {
    const COLLECTION: &'static str = collections::INVENTORY;

    fn id(&self) -> &str {
        &self.id
    }

    fn with_id(mut self, id: String) -> Self {
        self.id = id;
        self
    }

    fn encode(&self) -> Fields {
        let mut fields = Fields::new();
        put_str(&mut fields, "name", &self.name);
        put_str(&mut fields, "category", &self.category);
        put_u32(&mut fields, "quantity", self.quantity);
        put_timestamp(&mut fields, "expiration_date", self.expiration_date);
        put_str(&mut fields, "status", self.status.as_str());
        put_opt_str(&mut fields, "barcode", self.barcode.as_deref());
        fields
    }

    fn decode(doc: &Document) -> Result<Self, StoreError> {
        let c = Self::COLLECTION;
        Ok(InventoryItem {
            id: doc.id.clone(),
            name: req_str(c, &doc.fields, "name")?,
            category: req_str(c, &doc.fields, "category")?,
            quantity: req_u32(c, &doc.fields, "quantity")?,
            expiration_date: req_timestamp(c, &doc.fields, "expiration_date")?,
            status: req_enum(c, &doc.fields, "status")?,
            barcode: opt_str(c, &doc.fields, "barcode")?,
        })
    }
}

// ==================== EMPLOYEES ====================

impl DocumentCodec for Employee {
    const COLLECTION: &'static str = collections::EMPLOYEES;

    fn id(&self) -> &str {
        &self.id
    }

    fn with_id(mut self, id: String) -> Self {
        self.id = id;
        self
    }

    fn encode(&self) -> Fields {
        let mut fields = Fields::new();
        put_str(&mut fields, "name", &self.name);
        put_str(&mut fields, "role", &self.role);
        put_str(&mut fields, "email", &self.email);
        put_opt_str(&mut fields, "avatar_url", self.avatar_url.as_deref());
        fields
    }

    fn decode(doc: &Document) -> Result<Self, StoreError> {
        let c = Self::COLLECTION;
        Ok(Employee {
            id: doc.id.clone(),
            name: req_str(c, &doc.fields, "name")?,
            role: req_str(c, &doc.fields, "role")?,
            email: req_str(c, &doc.fields, "email")?,
            avatar_url: opt_str(c, &doc.fields, "avatar_url")?,
        })
    }
}

// ==================== TASKS ====================

impl DocumentCodec for Task {
    const COLLECTION: &'static str = collections::TASKS;

    fn id(&self) -> &str {
        &self.id
    }

    fn with_id(mut self, id: String) -> Self {
        self.id = id;
        self
    }

    fn encode(&self) -> Fields {
        let mut fields = Fields::new();
        put_str(&mut fields, "title", &self.title);
        put_opt_str(&mut fields, "description", self.description.as_deref());
        put_timestamp(&mut fields, "due_date", self.due_date);
        put_str(&mut fields, "priority", self.priority.as_str());
        put_str(&mut fields, "status", self.status.as_str());
        put_opt_str(&mut fields, "assigned_to", self.assigned_to.as_deref());
        fields
    }

    fn decode(doc: &Document) -> Result<Self, StoreError> {
        let c = Self::COLLECTION;
        Ok(Task {
            id: doc.id.clone(),
            title: req_str(c, &doc.fields, "title")?,
            description: opt_str(c, &doc.fields, "description")?,
            due_date: req_timestamp(c, &doc.fields, "due_date")?,
            priority: req_enum(c, &doc.fields, "priority")?,
            status: req_enum(c, &doc.fields, "status")?,
            assigned_to: opt_str(c, &doc.fields, "assigned_to")?,
        })
    }
}

// ==================== ACTIVITY LOGS ====================

impl DocumentCodec for ActivityLog {
    const COLLECTION: &'static str = collections::ACTIVITY_LOGS;

    fn id(&self) -> &str {
        &self.id
    }

    fn with_id(mut self, id: String) -> Self {
        self.id = id;
        self
    }

    fn encode(&self) -> Fields {
        let mut fields = Fields::new();
        put_str(&mut fields, "user", &self.user);
        put_str(&mut fields, "action", &self.action);
        put_timestamp(&mut fields, "timestamp", self.timestamp);
        put_opt_map(&mut fields, "details", self.details.as_ref());
        fields
    }

    fn decode(doc: &Document) -> Result<Self, StoreError> {
        let c = Self::COLLECTION;
        Ok(ActivityLog {
            id: doc.id.clone(),
            user: req_str(c, &doc.fields, "user")?,
            action: req_str(c, &doc.fields, "action")?,
            timestamp: req_timestamp(c, &doc.fields, "timestamp")?,
            details: opt_map(c, &doc.fields, "details")?,
        })
    }
}

// ==================== USERS (role lookup) ====================

impl DocumentCodec for User {
    const COLLECTION: &'static str = collections::USERS;

    fn id(&self) -> &str {
        &self.id
    }

    fn with_id(mut self, id: String) -> Self {
        self.id = id;
        self
    }

    fn encode(&self) -> Fields {
        let mut fields = Fields::new();
        put_str(&mut fields, "email", &self.email);
        put_str(&mut fields, "display_name", &self.display_name);
        put_opt_str(&mut fields, "photo_url", self.photo_url.as_deref());
        put_str(&mut fields, "role", self.role.as_str());
        fields
    }

    fn decode(doc: &Document) -> Result<Self, StoreError> {
        let c = Self::COLLECTION;
        Ok(User {
            id: doc.id.clone(),
            email: req_str(c, &doc.fields, "email")?,
            display_name: req_str(c, &doc.fields, "display_name")?,
            photo_url: opt_str(c, &doc.fields, "photo_url")?,
            role: req_enum(c, &doc.fields, "role")?,
        })
    }
}

// ==================== TESTS ====================
