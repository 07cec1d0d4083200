use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

pub mod memory;
pub mod models;
pub mod postgres;
pub mod repositories;
pub mod store;
pub mod subscription;
pub mod utils;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;
pub use store::{CREATED_AT_FIELD, Direction, Document, DocumentStore, Query, StoreError};
pub use subscription::Subscription;

pub mod collections {
    pub const USERS: &str = "users";
    pub const CREDENTIALS: &str = "credentials";
    pub const EMAIL_VERIFICATIONS: &str = "email_verifications";
    pub const MESSAGES: &str = "messages";
    pub const RESOURCES: &str = "resources";
    pub const TEAM_MEMBERS: &str = "team_members";
    pub const SETTINGS: &str = "settings";
    pub const EVENTS: &str = "events";

    pub fn registrations(event_id: &str) -> String {
        format!("{}/{}/registrations", EVENTS, event_id)
    }

    pub fn feedback(event_id: &str) -> String {
        format!("{}/{}/feedback", EVENTS, event_id)
    }
}

/// The document database client. Constructed once at startup and shared.
#[derive(Clone)]
pub struct Database {
    store: Arc<dyn DocumentStore>,
}

pub async fn init_database(database_url: &str) -> Result<Database, StoreError> {
    if database_url.starts_with("memory:") {
        log::warn!("Using in-memory document store; data will not survive a restart");
        return Ok(Database::memory());
    }

    let store = PgDocumentStore::connect(database_url).await?;
    Ok(Database::new(Arc::new(store)))
}

pub fn to_document<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::InvalidDocument(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

pub fn from_document<T: DeserializeOwned>(document: Document) -> Result<T, StoreError> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

/// Decode a batch, skipping (and logging) documents that do not fit `T`.
pub fn decode_documents<T: DeserializeOwned>(collection: &str, documents: Vec<Document>) -> Vec<T> {
    documents
        .into_iter()
        .filter_map(|document| match from_document(document) {
            Ok(item) => Some(item),
            Err(e) => {
                log::warn!("Skipping malformed document in {}: {}", collection, e);
                None
            }
        })
        .collect()
}

impl Database {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryDocumentStore::new()))
    }

    pub fn store(&self) -> Arc<dyn DocumentStore> {
        Arc::clone(&self.store)
    }

    pub async fn list<T: DeserializeOwned>(
        &self,
        collection: &str,
        query: &Query,
    ) -> Result<Vec<T>, StoreError> {
        let documents = self.store.query(collection, query).await?;
        Ok(decode_documents(collection, documents))
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<T>, StoreError> {
        self.store
            .get(collection, id)
            .await?
            .map(from_document)
            .transpose()
    }

    pub async fn add<T, I>(&self, collection: &str, input: &I) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
        I: Serialize,
    {
        let created = self.store.add(collection, to_document(input)?).await?;
        from_document(created)
    }

    pub async fn set<T, I>(&self, collection: &str, id: &str, input: &I) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
        I: Serialize,
    {
        let stored = self.store.set(collection, id, to_document(input)?).await?;
        from_document(stored)
    }

    /// Partial merge: every field `patch` serializes is overwritten, nothing else.
    pub async fn update<T, P>(
        &self,
        collection: &str,
        id: &str,
        patch: &P,
    ) -> Result<Option<T>, StoreError>
    where
        T: DeserializeOwned,
        P: Serialize,
    {
        self.store
            .update(collection, id, to_document(patch)?)
            .await?
            .map(from_document)
            .transpose()
    }

    pub async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        self.store.delete(collection, id).await
    }

    pub async fn batch_add<T, I>(&self, collection: &str, inputs: &[I]) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned,
        I: Serialize,
    {
        let documents = inputs
            .iter()
            .map(to_document)
            .collect::<Result<Vec<_>, _>>()?;
        let inserted = self.store.batch_add(collection, documents).await?;
        inserted.into_iter().map(from_document).collect()
    }

    pub async fn count(&self, collection: &str, query: &Query) -> Result<usize, StoreError> {
        self.store.count(collection, query).await
    }

    pub fn subscribe<T, F>(
        &self,
        collection: impl Into<String>,
        query: Query,
        callback: F,
    ) -> Subscription
    where
        T: DeserializeOwned + Send + 'static,
        F: FnMut(Vec<T>) + Send + 'static,
    {
        subscription::subscribe(self.store(), collection.into(), query, callback)
    }
}
