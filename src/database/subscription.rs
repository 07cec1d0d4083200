use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::{sync::broadcast::error::RecvError, task::JoinHandle};

use crate::database::{
    decode_documents,
    store::{DocumentStore, Query},
};

/// Handle to a live collection subscription.
///
/// The callback keeps firing until [`Subscription::unsubscribe`] is called or
/// the handle is dropped.
pub struct Subscription {
    handle: JoinHandle<()>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        self.handle.abort();
    }

    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Deliver the full, current result of `query` to `callback` now and after
/// every change to `collection`. Each delivery replaces the previous one.
pub fn subscribe<T, F>(
    store: Arc<dyn DocumentStore>,
    collection: String,
    query: Query,
    mut callback: F,
) -> Subscription
where
    T: DeserializeOwned + Send + 'static,
    F: FnMut(Vec<T>) + Send + 'static,
{
    // Watch before the first snapshot so no write slips between the two.
    let mut changes = store.watch();

    let handle = tokio::spawn(async move {
        deliver(&*store, &collection, &query, &mut callback).await;

        loop {
            match changes.recv().await {
                Ok(event) if event.collection == collection => {
                    deliver(&*store, &collection, &query, &mut callback).await;
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!(
                        "Subscription on {} lagged by {} changes, resyncing",
                        collection,
                        skipped
                    );
                    deliver(&*store, &collection, &query, &mut callback).await;
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    Subscription { handle }
}

async fn deliver<T, F>(store: &dyn DocumentStore, collection: &str, query: &Query, callback: &mut F)
where
    T: DeserializeOwned,
    F: FnMut(Vec<T>),
{
    match store.query(collection, query).await {
        Ok(documents) => callback(decode_documents(collection, documents)),
        Err(e) => log::error!("Subscription snapshot for {} failed: {}", collection, e),
    }
}
