//! Paginated Listing Module
//!
//! Accumulates listing pages fetched one at a time into a deduplicated
//! product view, for infinite-scroll style consumers.

pub mod accumulator;
pub mod feed;
pub mod source;

pub use accumulator::{ListingAccumulator, ListingStatus};
pub use feed::ListingFeed;
pub use source::{PageSource, ScopedListing};
