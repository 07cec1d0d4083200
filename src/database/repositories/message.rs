use crate::database::{
    Database, Query, StoreError, Subscription, collections,
    models::{ContactMessage, ContactMessageInput, MessageReadInput},
};

use super::or_empty;

#[derive(Clone)]
pub struct MessageRepository {
    db: Database,
}

#[derive(serde::Serialize)]
struct NewMessage<'a> {
    name: &'a str,
    email: &'a str,
    subject: Option<&'a str>,
    message: &'a str,
    read: bool,
}

impl MessageRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list_messages(&self) -> Vec<ContactMessage> {
        or_empty(
            collections::MESSAGES,
            self.db
                .list(collections::MESSAGES, &Query::newest_first())
                .await,
        )
    }

    pub async fn create_message(
        &self,
        input: &ContactMessageInput,
    ) -> Result<ContactMessage, StoreError> {
        let message = NewMessage {
            name: input.name.trim(),
            email: input.email.trim(),
            subject: input.subject.as_deref().map(str::trim),
            message: input.message.trim(),
            read: false,
        };
        self.db.add(collections::MESSAGES, &message).await
    }

    pub async fn set_read(
        &self,
        id: &str,
        read: bool,
    ) -> Result<Option<ContactMessage>, StoreError> {
        self.db
            .update(collections::MESSAGES, id, &MessageReadInput { read })
            .await
    }

    pub async fn delete_message(&self, id: &str) -> Result<bool, StoreError> {
        self.db.delete(collections::MESSAGES, id).await
    }

    pub async fn count_unread(&self) -> Result<usize, StoreError> {
        self.db
            .count(collections::MESSAGES, &Query::new().filter("read", false))
            .await
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(Vec<ContactMessage>) + Send + 'static,
    {
        self.db
            .subscribe(collections::MESSAGES, Query::newest_first(), callback)
    }
}
