//! In-memory document store
//!
//! Backs tests and local development. Documents are kept per collection in
//! insertion order; the ledger projection's tie-break depends on that order
//! being stable.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use super::{ChangeKind, CollectionPath, Document, DocumentStore, StoreError, StoreEvent};

const CHANNEL_CAPACITY: usize = 64;

#[derive(Default)]
struct Collection {
    documents: Vec<Document>,
}

/// In-memory [`DocumentStore`] implementation
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
    channels: RwLock<HashMap<String, broadcast::Sender<StoreEvent>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            channels: RwLock::new(HashMap::new()),
        }
    }

    async fn notify(&self, path: &CollectionPath, id: Uuid, kind: ChangeKind) {
        let channels = self.channels.read().await;
        if let Some(sender) = channels.get(path.as_str()) {
            // Nobody listening is fine
            let _ = sender.send(StoreEvent {
                path: path.as_str().to_string(),
                id,
                kind,
            });
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn add(&self, path: &CollectionPath, value: Value) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        {
            let mut collections = self.collections.write().await;
            let collection = collections.entry(path.as_str().to_string()).or_default();
            collection.documents.push(Document { id, data: value });
        }
        self.notify(path, id, ChangeKind::Added).await;
        Ok(id)
    }

    async fn update(&self, path: &CollectionPath, id: Uuid, patch: Value) -> Result<(), StoreError> {
        {
            let mut collections = self.collections.write().await;
            let collection = collections.get_mut(path.as_str()).ok_or_else(|| {
                StoreError::DocumentNotFound {
                    path: path.as_str().to_string(),
                    id,
                }
            })?;
            let document = collection
                .documents
                .iter_mut()
                .find(|d| d.id == id)
                .ok_or_else(|| StoreError::DocumentNotFound {
                    path: path.as_str().to_string(),
                    id,
                })?;

            match (&mut document.data, patch) {
                (Value::Object(existing), Value::Object(fields)) => {
                    for (key, value) in fields {
                        existing.insert(key, value);
                    }
                }
                (data, patch) => *data = patch,
            }
        }
        self.notify(path, id, ChangeKind::Updated).await;
        Ok(())
    }

    async fn get_all(&self, path: &CollectionPath) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(path.as_str())
            .map(|c| c.documents.clone())
            .unwrap_or_default())
    }

    async fn delete(&self, path: &CollectionPath, id: Uuid) -> Result<(), StoreError> {
        {
            let mut collections = self.collections.write().await;
            let collection = collections.get_mut(path.as_str()).ok_or_else(|| {
                StoreError::DocumentNotFound {
                    path: path.as_str().to_string(),
                    id,
                }
            })?;
            let before = collection.documents.len();
            collection.documents.retain(|d| d.id != id);
            if collection.documents.len() == before {
                return Err(StoreError::DocumentNotFound {
                    path: path.as_str().to_string(),
                    id,
                });
            }
        }
        self.notify(path, id, ChangeKind::Deleted).await;
        Ok(())
    }

    async fn subscribe(&self, path: &CollectionPath) -> broadcast::Receiver<StoreEvent> {
        let mut channels = self.channels.write().await;
        channels
            .entry(path.as_str().to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }
}
