//! Paginated listing accumulator.
//!
//! Retains fetched pages in order and derives a deduplicated product view.
//! The machine is driven in two steps: [`ListingAccumulator::begin_fetch`]
//! claims the next page number (or refuses), and
//! [`ListingAccumulator::complete`] applies the outcome. Between the two
//! the accumulator is "in flight" and refuses any further fetch. A failed
//! fetch parks the machine in `Error` until [`ListingAccumulator::retry`].

use crate::catalog::models::{ListingPage, Product, ProductId};
use crate::error::AppError;
use indexmap::IndexMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingStatus {
    /// No fetch ever issued.
    Idle,
    /// First page in flight.
    Loading,
    /// At least one page retained, nothing in flight.
    Ready,
    /// A later page in flight; earlier pages retained.
    LoadingMore,
    /// Last fetch failed. Retained pages are kept.
    Error(String),
}

#[derive(Debug, Clone)]
pub struct ListingAccumulator {
    pages: Vec<ListingPage>,
    status: ListingStatus,
    has_more: bool,
    last_fetched_page: u32,
    in_flight: Option<u32>,
}

impl Default for ListingAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingAccumulator {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            status: ListingStatus::Idle,
            has_more: false,
            last_fetched_page: 0,
            in_flight: None,
        }
    }

    /// Claims the next page to fetch, moving to `Loading`/`LoadingMore`.
    ///
    /// Returns `None` when a fetch is already in flight, the listing is
    /// exhausted or the last fetch failed, so repeated triggers are harmless.
    pub fn begin_fetch(&mut self) -> Option<u32> {
        let (status, page) = match self.status {
            ListingStatus::Idle => (ListingStatus::Loading, 1),
            ListingStatus::Ready if self.has_more => {
                (ListingStatus::LoadingMore, self.last_fetched_page + 1)
            }
            _ => return None,
        };
        self.claim(status, page)
    }

    /// Leaves `Error` by re-requesting the page that failed. Does nothing in
    /// any other state.
    pub fn retry(&mut self) -> Option<u32> {
        if !matches!(self.status, ListingStatus::Error(_)) {
            return None;
        }

        if self.pages.is_empty() {
            self.claim(ListingStatus::Loading, 1)
        } else {
            self.claim(ListingStatus::LoadingMore, self.last_fetched_page + 1)
        }
    }

    fn claim(&mut self, status: ListingStatus, page: u32) -> Option<u32> {
        debug!(page, "Listing fetch started");
        self.status = status;
        self.in_flight = Some(page);
        Some(page)
    }

    /// Applies the outcome of the fetch for `page`.
    ///
    /// Returns `false` (and changes nothing) if `page` is not the fetch
    /// currently in flight.
    pub fn complete(&mut self, page: u32, result: Result<ListingPage, AppError>) -> bool {
        if self.in_flight != Some(page) {
            warn!(page, in_flight = ?self.in_flight, "Ignoring result for a fetch not in flight");
            return false;
        }
        self.in_flight = None;

        match result {
            Ok(listing) => {
                // An empty page ends the listing whatever the reported bounds say.
                self.has_more =
                    !listing.data.is_empty() && listing.current_page < listing.last_page;
                self.last_fetched_page = page;
                self.pages.push(listing);
                self.status = ListingStatus::Ready;
                debug!(page, has_more = self.has_more, "Listing page retained");
            }
            Err(e) => {
                warn!(page, "Listing fetch failed: {e}");
                self.status = ListingStatus::Error(e.public_message());
            }
        }
        true
    }

    pub fn status(&self) -> &ListingStatus {
        &self.status
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// True when a visibility trigger should request the next page now.
    pub fn wants_next_page(&self) -> bool {
        self.status == ListingStatus::Ready && self.has_more
    }

    pub fn pages(&self) -> &[ListingPage] {
        &self.pages
    }

    pub fn last_fetched_page(&self) -> u32 {
        self.last_fetched_page
    }

    /// All retained products in page order, each id once (first occurrence).
    pub fn products(&self) -> Vec<&Product> {
        let mut seen: IndexMap<ProductId, &Product> = IndexMap::new();
        for product in self.pages.iter().flat_map(|p| p.data.iter()) {
            seen.entry(product.id).or_insert(product);
        }
        seen.into_values().collect()
    }
}
