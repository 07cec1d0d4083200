use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{
    PgPool,
    postgres::{PgListener, PgPoolOptions},
    types::Json,
};
use tokio::sync::broadcast;

use crate::database::{
    store::{
        ChangeEvent, CREATED_AT_FIELD, Direction, Document, DocumentStore, Query, StoreError,
        UPDATED_AT_FIELD, strip_id, with_id,
    },
    utils::{new_document_id, sql, timestamp_now},
};

const CHANGES_CHANNEL: &str = "document_changes";

#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: String,
    data: Json<Document>,
}

impl DocumentRow {
    fn into_document(self) -> Document {
        with_id(self.data.0, &self.id)
    }
}

/// Document store on a single postgres `documents` table (JSONB bodies).
///
/// Change notifications come from a table trigger (`pg_notify`) and are fanned
/// out to in-process watchers.
pub struct PgDocumentStore {
    pool: PgPool,
    changes: broadcast::Sender<ChangeEvent>,
}

impl PgDocumentStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        log::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&pool).await?;
        log::info!("Migrations completed successfully");

        let (changes, _) = broadcast::channel(256);
        Self::spawn_listener(pool.clone(), changes.clone());

        Ok(Self { pool, changes })
    }

    fn spawn_listener(pool: PgPool, changes: broadcast::Sender<ChangeEvent>) {
        tokio::spawn(async move {
            let mut listener = match PgListener::connect_with(&pool).await {
                Ok(listener) => listener,
                Err(e) => {
                    log::error!("Failed to start change listener: {}", e);
                    return;
                }
            };

            if let Err(e) = listener.listen(CHANGES_CHANNEL).await {
                log::error!("Failed to listen on {}: {}", CHANGES_CHANNEL, e);
                return;
            }

            loop {
                match listener.recv().await {
                    Ok(notification) => {
                        let _ = changes.send(ChangeEvent {
                            collection: notification.payload().to_string(),
                        });
                    }
                    Err(e) => {
                        log::error!("Change listener error: {}", e);
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        });
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        let mut text = String::from("SELECT id, data FROM documents WHERE collection = ?");
        for _ in &query.filters {
            text.push_str(" AND data -> ? = ?");
        }
        match &query.order_by {
            Some((_, Direction::Asc)) => text.push_str(" ORDER BY data -> ? ASC NULLS LAST, seq ASC"),
            Some((_, Direction::Desc)) => {
                text.push_str(" ORDER BY data -> ? DESC NULLS LAST, seq ASC")
            }
            None => text.push_str(" ORDER BY seq ASC"),
        }
        if let Some(limit) = query.limit {
            text.push_str(&format!(" LIMIT {}", limit));
        }

        let text = sql(&text);
        let mut statement = sqlx::query_as::<_, DocumentRow>(&text).bind(collection);
        for (field, value) in &query.filters {
            statement = statement.bind(field.as_str()).bind(Json(value.clone()));
        }
        if let Some((field, _)) = &query.order_by {
            statement = statement.bind(field.as_str());
        }

        let rows = statement.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(DocumentRow::into_document).collect())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query_as::<_, DocumentRow>(&sql(r#"
            SELECT
                id,
                data
            FROM
                documents
            WHERE
                collection = ?
                AND id = ?
        "#))
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(DocumentRow::into_document))
    }

    async fn add(&self, collection: &str, data: Document) -> Result<Document, StoreError> {
        let mut data = strip_id(data);
        data.insert(CREATED_AT_FIELD.to_string(), Value::String(timestamp_now()));

        let row = sqlx::query_as::<_, DocumentRow>(&sql(r#"
            INSERT INTO
                documents (collection, id, data)
            VALUES
                (?, ?, ?)
            RETURNING
                id,
                data
        "#))
        .bind(collection)
        .bind(new_document_id())
        .bind(Json(data))
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_document())
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        data: Document,
    ) -> Result<Document, StoreError> {
        let now = timestamp_now();
        let mut data = strip_id(data);
        data.entry(CREATED_AT_FIELD.to_string())
            .or_insert(Value::String(now));

        // An existing creation stamp wins over the one in the new body.
        let row = sqlx::query_as::<_, DocumentRow>(&sql(r#"
            INSERT INTO
                documents (collection, id, data)
            VALUES
                (?, ?, ?)
            ON CONFLICT (collection, id) DO UPDATE
            SET
                data = EXCLUDED.data
                    || jsonb_build_object(
                        'createdAt',
                        COALESCE(documents.data -> 'createdAt', EXCLUDED.data -> 'createdAt')
                    )
                    || jsonb_build_object('updatedAt', to_jsonb(?::text)),
                updated_at = NOW()
            RETURNING
                id,
                data
        "#))
        .bind(collection)
        .bind(id)
        .bind(Json(data))
        .bind(timestamp_now())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_document())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Document,
    ) -> Result<Option<Document>, StoreError> {
        let mut patch = strip_id(patch);
        patch.insert(UPDATED_AT_FIELD.to_string(), Value::String(timestamp_now()));

        let row = sqlx::query_as::<_, DocumentRow>(&sql(r#"
            UPDATE
                documents
            SET
                data = data || ?,
                updated_at = NOW()
            WHERE
                collection = ?
                AND id = ?
            RETURNING
                id,
                data
        "#))
        .bind(Json(patch))
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(DocumentRow::into_document))
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(&sql(
            "DELETE FROM documents WHERE collection = ? AND id = ?",
        ))
        .bind(collection)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn batch_add(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<Vec<Document>, StoreError> {
        let now = timestamp_now();
        let insert = sql(r#"
            INSERT INTO
                documents (collection, id, data)
            VALUES
                (?, ?, ?)
            RETURNING
                id,
                data
        "#);

        let mut tx = self.pool.begin().await?;
        let mut inserted = Vec::with_capacity(documents.len());
        for data in documents {
            let mut data = strip_id(data);
            data.insert(CREATED_AT_FIELD.to_string(), Value::String(now.clone()));

            let row = sqlx::query_as::<_, DocumentRow>(&insert)
                .bind(collection)
                .bind(new_document_id())
                .bind(Json(data))
                .fetch_one(&mut *tx)
                .await?;
            inserted.push(row.into_document());
        }
        tx.commit().await?;

        Ok(inserted)
    }

    async fn count(&self, collection: &str, query: &Query) -> Result<usize, StoreError> {
        let mut text = String::from("SELECT COUNT(*) FROM documents WHERE collection = ?");
        for _ in &query.filters {
            text.push_str(" AND data -> ? = ?");
        }

        let text = sql(&text);
        let mut statement = sqlx::query_scalar::<_, i64>(&text).bind(collection);
        for (field, value) in &query.filters {
            statement = statement.bind(field.as_str()).bind(Json(value.clone()));
        }

        let count = statement.fetch_one(&self.pool).await?;
        Ok(count.max(0) as usize)
    }

    fn watch(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }
}
