//! Shared handle that drives a [`ListingAccumulator`] from a [`PageSource`].
//!
//! The accumulator lock is never held across the network await; the
//! accumulator's own in-flight flag is what keeps a second trigger from
//! issuing a duplicate request. Every fetch runs on its own task, so a
//! caller that stops awaiting never leaves a page claimed but unresolved.

use super::{
    accumulator::{ListingAccumulator, ListingStatus},
    source::PageSource,
};
use crate::{catalog::models::Product, error::AppError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::task::JoinHandle;
use tracing::debug;

pub struct ListingFeed<S> {
    source: Arc<S>,
    state: Arc<Mutex<ListingAccumulator>>,
}

impl<S> Clone for ListingFeed<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: PageSource + 'static> ListingFeed<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            state: Arc::new(Mutex::new(ListingAccumulator::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ListingAccumulator> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Visibility signal: fetch the next page if one is wanted and none is
    /// in flight. Returns `false` when the trigger was ignored, including
    /// after a failure; see [`ListingFeed::retry`].
    pub async fn trigger(&self) -> bool {
        let claimed = self.lock().begin_fetch();
        self.drive(claimed).await
    }

    /// Re-requests the page that failed. Ignored unless the feed is in
    /// `Error`.
    pub async fn retry(&self) -> bool {
        let claimed = self.lock().retry();
        self.drive(claimed).await
    }

    /// Like [`ListingFeed::trigger`], but does not wait for the fetch. If
    /// every handle to this feed is dropped before the fetch resolves, the
    /// result is discarded.
    pub fn spawn_trigger(&self) -> Option<JoinHandle<()>> {
        let page = self.lock().begin_fetch()?;
        Some(self.spawn_fetch(page))
    }

    async fn drive(&self, claimed: Option<u32>) -> bool {
        let Some(page) = claimed else {
            debug!("Trigger ignored");
            return false;
        };

        if let Err(e) = self.spawn_fetch(page).await {
            self.lock().complete(
                page,
                Err(AppError::NetworkFailure(format!("listing fetch task failed: {e}"))),
            );
        }
        true
    }

    fn spawn_fetch(&self, page: u32) -> JoinHandle<()> {
        let source = Arc::clone(&self.source);
        let state: Weak<Mutex<ListingAccumulator>> = Arc::downgrade(&self.state);

        tokio::spawn(async move {
            let result = source.fetch_page(page).await;
            match state.upgrade() {
                Some(state) => {
                    state
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .complete(page, result);
                }
                None => debug!(page, "Listing dropped, discarding fetched page"),
            }
        })
    }

    /// Fetches pages until the listing reports no more or a fetch fails.
    pub async fn load_all(&self) -> Vec<Product> {
        while self.trigger().await {
            if !self.lock().wants_next_page() {
                break;
            }
        }
        self.products()
    }

    pub fn products(&self) -> Vec<Product> {
        self.lock().products().into_iter().cloned().collect()
    }

    pub fn status(&self) -> ListingStatus {
        self.lock().status().clone()
    }

    pub fn has_more(&self) -> bool {
        self.lock().has_more()
    }

    pub fn is_fetching(&self) -> bool {
        self.lock().is_fetching()
    }

    pub fn pages_loaded(&self) -> usize {
        self.lock().pages().len()
    }
}
