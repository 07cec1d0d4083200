use std::{
    collections::HashMap,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::database::{
    store::{
        ChangeEvent, CREATED_AT_FIELD, Document, DocumentStore, Query, StoreError,
        UPDATED_AT_FIELD, apply_ordering, strip_id, with_id,
    },
    utils::{new_document_id, timestamp_now},
};

type Collections = HashMap<String, Vec<(String, Document)>>;

/// In-process document store. Collections keep insertion order.
pub struct MemoryDocumentStore {
    collections: RwLock<Collections>,
    changes: broadcast::Sender<ChangeEvent>,
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(256);
        Self {
            collections: RwLock::new(HashMap::new()),
            changes,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Collections> {
        self.collections
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Collections> {
        self.collections
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn notify(&self, collection: &str) {
        // No receivers is fine.
        let _ = self.changes.send(ChangeEvent {
            collection: collection.to_string(),
        });
    }
}

fn stamp(mut data: Document, field: &str, now: &str) -> Document {
    data.insert(field.to_string(), Value::String(now.to_string()));
    data
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        let collections = self.read();
        let mut documents: Vec<Document> = collections
            .get(collection)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|(_, data)| query.matches(data))
                    .map(|(id, data)| with_id(data.clone(), id))
                    .collect()
            })
            .unwrap_or_default();

        apply_ordering(&mut documents, query);
        Ok(documents)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.read();
        Ok(collections.get(collection).and_then(|entries| {
            entries
                .iter()
                .find(|(entry_id, _)| entry_id == id)
                .map(|(entry_id, data)| with_id(data.clone(), entry_id))
        }))
    }

    async fn add(&self, collection: &str, data: Document) -> Result<Document, StoreError> {
        let id = new_document_id();
        let data = stamp(strip_id(data), CREATED_AT_FIELD, &timestamp_now());
        {
            let mut collections = self.write();
            collections
                .entry(collection.to_string())
                .or_default()
                .push((id.clone(), data.clone()));
        }
        self.notify(collection);
        Ok(with_id(data, &id))
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        data: Document,
    ) -> Result<Document, StoreError> {
        let now = timestamp_now();
        let mut data = strip_id(data);
        let stored = {
            let mut collections = self.write();
            let entries = collections.entry(collection.to_string()).or_default();
            match entries.iter_mut().find(|(entry_id, _)| entry_id == id) {
                Some((_, existing)) => {
                    let created = existing
                        .get(CREATED_AT_FIELD)
                        .cloned()
                        .unwrap_or_else(|| Value::String(now.clone()));
                    data.entry(CREATED_AT_FIELD.to_string()).or_insert(created);
                    data.insert(UPDATED_AT_FIELD.to_string(), Value::String(now));
                    *existing = data.clone();
                }
                None => {
                    data.entry(CREATED_AT_FIELD.to_string())
                        .or_insert(Value::String(now));
                    entries.push((id.to_string(), data.clone()));
                }
            }
            data
        };
        self.notify(collection);
        Ok(with_id(stored, id))
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Document,
    ) -> Result<Option<Document>, StoreError> {
        let patch = stamp(strip_id(patch), UPDATED_AT_FIELD, &timestamp_now());
        let updated = {
            let mut collections = self.write();
            collections
                .get_mut(collection)
                .and_then(|entries| entries.iter_mut().find(|(entry_id, _)| entry_id == id))
                .map(|(_, existing)| {
                    for (field, value) in patch {
                        existing.insert(field, value);
                    }
                    existing.clone()
                })
        };

        match updated {
            Some(document) => {
                self.notify(collection);
                Ok(Some(with_id(document, id)))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let removed = {
            let mut collections = self.write();
            match collections.get_mut(collection) {
                Some(entries) => {
                    let before = entries.len();
                    entries.retain(|(entry_id, _)| entry_id != id);
                    entries.len() != before
                }
                None => false,
            }
        };
        if removed {
            self.notify(collection);
        }
        Ok(removed)
    }

    async fn batch_add(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<Vec<Document>, StoreError> {
        let now = timestamp_now();
        let prepared: Vec<(String, Document)> = documents
            .into_iter()
            .map(|data| (new_document_id(), stamp(strip_id(data), CREATED_AT_FIELD, &now)))
            .collect();
        {
            let mut collections = self.write();
            collections
                .entry(collection.to_string())
                .or_default()
                .extend(prepared.iter().cloned());
        }
        self.notify(collection);
        Ok(prepared
            .into_iter()
            .map(|(id, data)| with_id(data, &id))
            .collect())
    }

    fn watch(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }
}
