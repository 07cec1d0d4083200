use std::convert::Infallible;

use actix_web::{
    HttpResponse,
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    web::Bytes,
};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::database::Subscription;

/// Serve a live subscription as Server-Sent Events. Every event carries the
/// full current list; the subscription ends when the client disconnects.
pub fn snapshot_stream<T, F>(subscribe: F) -> HttpResponse
where
    T: Serialize + Send + 'static,
    F: FnOnce(mpsc::UnboundedSender<Vec<T>>) -> Subscription,
{
    let (tx, rx) = mpsc::unbounded_channel::<Vec<T>>();
    let subscription = subscribe(tx);

    let events = futures::stream::unfold((rx, subscription), |(mut rx, subscription)| async move {
        let snapshot = rx.recv().await?;
        let data = serde_json::to_string(&snapshot).unwrap_or_else(|e| {
            log::error!("Failed to encode subscription snapshot: {}", e);
            "[]".to_string()
        });
        let event = Bytes::from(format!("data: {}\n\n", data));
        Some((Ok::<_, Infallible>(event), (rx, subscription)))
    });

    HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, "text/event-stream"))
        .insert_header((CACHE_CONTROL, "no-cache"))
        .streaming(events)
}
