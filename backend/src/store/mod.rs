//! Persistent document store collaborator
//!
//! Persistence and realtime sync are delegated to a hosted document
//! database. The engine only ever talks to the [`DocumentStore`] trait; the
//! hosted client lives outside this repository. [`MemoryStore`] backs tests
//! and local development.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Errors surfaced by a document store implementation
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document {id} not found in {path}")]
    DocumentNotFound { path: String, id: Uuid },

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Serialize a record into a document body, dropping the store-assigned
/// `id` field
pub fn document_body<T: serde::Serialize>(record: &T) -> Result<Value, StoreError> {
    let mut value = serde_json::to_value(record)?;
    if let Value::Object(map) = &mut value {
        map.remove("id");
    }
    Ok(value)
}

/// A stored document: opaque id plus its JSON body
#[derive(Debug, Clone)]
pub struct Document {
    pub id: Uuid,
    pub data: Value,
}

impl Document {
    /// Deserialize the document body into `T`, injecting the document id
    /// into the body's `id` field first.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T, StoreError> {
        let mut data = self.data.clone();
        if let Value::Object(map) = &mut data {
            map.insert("id".to_string(), Value::String(self.id.to_string()));
        }
        Ok(serde_json::from_value(data)?)
    }
}

/// A change notification for one collection
#[derive(Debug, Clone)]
pub struct StoreEvent {
    pub path: String,
    pub id: Uuid,
    pub kind: ChangeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Updated,
    Deleted,
}

/// A tenant- and user-scoped collection path
///
/// Collections follow the hosted layout
/// `artifacts/{app_id}/users/{uid}/{collection}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath(String);

impl CollectionPath {
    pub fn new(app_id: &str, uid: &str, collection: &str) -> Self {
        Self(format!("artifacts/{}/users/{}/{}", app_id, uid, collection))
    }

    pub fn materials(app_id: &str, uid: &str) -> Self {
        Self::new(app_id, uid, "materials")
    }

    pub fn products(app_id: &str, uid: &str) -> Self {
        Self::new(app_id, uid, "products")
    }

    pub fn drugs(app_id: &str, uid: &str) -> Self {
        Self::new(app_id, uid, "drugs")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Abstract persistent document store
///
/// `update` applies a shallow top-level field merge, matching the hosted
/// store's partial-update semantics. `subscribe` delivers a notification
/// after every successful mutation of the collection.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Append a new document, returning its assigned id
    async fn add(&self, path: &CollectionPath, value: Value) -> Result<Uuid, StoreError>;

    /// Merge `patch`'s top-level fields into an existing document
    async fn update(&self, path: &CollectionPath, id: Uuid, patch: Value) -> Result<(), StoreError>;

    /// Fetch every document in the collection, in insertion order
    async fn get_all(&self, path: &CollectionPath) -> Result<Vec<Document>, StoreError>;

    /// Remove a document
    async fn delete(&self, path: &CollectionPath, id: Uuid) -> Result<(), StoreError>;

    /// Live-query subscription for the collection
    async fn subscribe(&self, path: &CollectionPath) -> broadcast::Receiver<StoreEvent>;
}
