use std::cmp::Ordering;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::broadcast;

pub type Document = Map<String, Value>;

pub const ID_FIELD: &str = "id";
pub const CREATED_AT_FIELD: &str = "createdAt";
pub const UPDATED_AT_FIELD: &str = "updatedAt";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("invalid document: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Equality filters, an optional ordering field and an optional limit.
///
/// Documents missing the ordering field sort last in either direction; ties
/// keep insertion order.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub filters: Vec<(String, Value)>,
    pub order_by: Option<(String, Direction)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some((field.into(), direction));
        self
    }

    pub fn newest_first() -> Self {
        Self::new().order_by(CREATED_AT_FIELD, Direction::Desc)
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, document: &Document) -> bool {
        self.filters
            .iter()
            .all(|(field, expected)| document.get(field) == Some(expected))
    }
}

/// Published whenever a document in `collection` is written or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub collection: String,
}

/// A collection/document database.
///
/// Documents handed out always carry their id under [`ID_FIELD`]; the id is
/// never persisted inside the document body.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Insert with a generated id, stamping [`CREATED_AT_FIELD`].
    async fn add(&self, collection: &str, data: Document) -> Result<Document, StoreError>;

    /// Create or replace the document at `id`. Keeps an existing creation stamp.
    async fn set(&self, collection: &str, id: &str, data: Document)
    -> Result<Document, StoreError>;

    /// Shallow merge of `patch` into an existing document, stamping [`UPDATED_AT_FIELD`].
    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Document,
    ) -> Result<Option<Document>, StoreError>;

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError>;

    /// Insert all documents atomically.
    async fn batch_add(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<Vec<Document>, StoreError>;

    async fn count(&self, collection: &str, query: &Query) -> Result<usize, StoreError> {
        Ok(self.query(collection, query).await?.len())
    }

    fn watch(&self) -> broadcast::Receiver<ChangeEvent>;
}

pub(crate) fn with_id(mut document: Document, id: &str) -> Document {
    document.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    document
}

pub(crate) fn strip_id(mut document: Document) -> Document {
    document.remove(ID_FIELD);
    document
}

fn type_rank(value: &Value) -> u8 {
    // Mirrors jsonb ordering across types.
    match value {
        Value::Null => 0,
        Value::String(_) => 1,
        Value::Number(_) => 2,
        Value::Bool(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

pub(crate) fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => {
            let a = a.as_f64().unwrap_or_default();
            let b = b.as_f64().unwrap_or_default();
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => type_rank(left).cmp(&type_rank(right)),
    }
}

/// Order `documents` in place according to `query`, then apply its limit.
pub(crate) fn apply_ordering(documents: &mut Vec<Document>, query: &Query) {
    if let Some((field, direction)) = &query.order_by {
        documents.sort_by(|a, b| match (a.get(field), b.get(field)) {
            (Some(a), Some(b)) => match direction {
                Direction::Asc => compare_values(a, b),
                Direction::Desc => compare_values(b, a),
            },
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
    }

    if let Some(limit) = query.limit {
        documents.truncate(limit);
    }
}
