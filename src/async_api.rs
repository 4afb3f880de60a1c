//! Async page loading.
//!
//! The feed request is the only suspension point of a page load. The blocking
//! fetch runs on a dedicated worker thread and its result comes back over a
//! oneshot channel, so callers on a tokio runtime never block an executor
//! thread. Building the DOM afterwards is synchronous.

use crate::controller::{PageController, PageState};
use crate::dom::Document;
use crate::feed::{FeedSnapshot, FeedSource};
use crate::{Error, Result};
use std::sync::Arc;
use std::thread;
use tokio::sync::oneshot;

/// Fetch the feed from `source` without blocking the calling task.
///
/// There is no cancellation: once started the fetch runs to completion (or
/// to the client timeout) even if the returned future is dropped.
pub async fn fetch_feed(source: Arc<dyn FeedSource>) -> Result<FeedSnapshot> {
    let (tx, rx) = oneshot::channel();
    thread::Builder::new()
        .name("livetiles-fetch".into())
        .spawn(move || {
            let _ = tx.send(source.fetch());
        })
        .map_err(|e| Error::NetworkError(format!("Failed to start fetch worker: {}", e)))?;

    rx.await
        .map_err(|e| Error::NetworkError(format!("Fetch canceled: {}", e)))?
}

impl PageController {
    /// Async counterpart of [`PageController::load`]
    pub async fn load_async(
        &self,
        source: Arc<dyn FeedSource>,
        doc: &mut Document,
    ) -> Result<PageState> {
        log::debug!("fetching feed from {} (async)", source.describe());
        let fetched = fetch_feed(source).await;
        self.finish_load(fetched, doc)
    }
}
