use crate::database::{
    Database, Query, StoreError, collections,
    models::{EventFeedback, FeedbackInput},
};

use super::or_empty;

#[derive(Clone)]
pub struct FeedbackRepository {
    db: Database,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct NewFeedback<'a> {
    event_id: &'a str,
    user_id: &'a str,
    rating: u8,
    comments: Option<&'a str>,
}

impl FeedbackRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list_for_event(&self, event_id: &str) -> Vec<EventFeedback> {
        let collection = collections::feedback(event_id);
        or_empty(
            &collection,
            self.db.list(&collection, &Query::newest_first()).await,
        )
    }

    pub async fn find(
        &self,
        event_id: &str,
        user_id: &str,
    ) -> Result<Option<EventFeedback>, StoreError> {
        self.db.get(&collections::feedback(event_id), user_id).await
    }

    pub async fn submit(
        &self,
        event_id: &str,
        user_id: &str,
        input: &FeedbackInput,
    ) -> Result<EventFeedback, StoreError> {
        let feedback = NewFeedback {
            event_id,
            user_id,
            rating: input.rating,
            comments: input
                .comments
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty()),
        };
        self.db
            .set(&collections::feedback(event_id), user_id, &feedback)
            .await
    }
}
