//! Storage backend abstraction.
//!
//! This module defines the [`ListingStore`] trait that abstracts over different
//! persistence backends. Each method maps directly to a store operation the
//! engine needs; it is not a generic ORM.
//!
//! All methods are async: a real backend is a remote service, and the engine
//! awaits each request before issuing the next step of an operation.

use crate::domain::error::Result;
use crate::domain::{Feedback, Listing, ListingId, NewFeedback, NewListing};
use crate::trust::Counter;
use async_trait::async_trait;

/// Abstraction over persistent listing and feedback storage.
///
/// Implementations must be shareable across tasks. Individual writes are
/// serialized by the backend; compound operations built from several calls are
/// not.
///
/// # Implementations
///
/// - [`MemoryStore`](crate::storage::MemoryStore): process-local, for tests and demos
/// - [`JsonStore`](crate::storage::JsonStore): JSON file with atomic writes
///
/// # Examples
///
/// ```no_run
/// use iftaar_finder::storage::{ListingStore, MemoryStore};
///
/// # async fn run() -> iftaar_finder::Result<()> {
/// let store = MemoryStore::new();
/// let listings = store.list_listings().await?;
/// assert!(listings.is_empty());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Returns every listing, newest `created_at` first.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    async fn list_listings(&self) -> Result<Vec<Listing>>;

    /// Returns the feedback for one listing, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails. An unknown listing yields an empty
    /// sequence, not an error.
    async fn list_feedback(&self, listing_id: &ListingId) -> Result<Vec<Feedback>>;

    /// Inserts a listing. The store assigns `id`, `created_at` and zero counters.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    async fn create_listing(&self, fields: &NewListing) -> Result<Listing>;

    /// Inserts a feedback entry. Does not touch the listing's counters.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    async fn create_feedback(&self, fields: &NewFeedback) -> Result<()>;

    /// Reads one counter of a listing.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::ListingNotFound`](crate::FinderError::ListingNotFound)
    /// if the listing does not exist.
    async fn read_counter(&self, listing_id: &ListingId, counter: Counter) -> Result<u32>;

    /// Overwrites one counter of a listing.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::ListingNotFound`](crate::FinderError::ListingNotFound)
    /// if the listing does not exist.
    async fn write_counter(&self, listing_id: &ListingId, counter: Counter, value: u32) -> Result<()>;

    /// Increments one counter and returns the new value.
    ///
    /// The default implementation is a plain read followed by a write and is
    /// subject to lost updates. Backends with a native single-step increment
    /// override it.
    ///
    /// # Errors
    ///
    /// Propagates errors from the underlying read or write.
    async fn increment_counter(&self, listing_id: &ListingId, counter: Counter) -> Result<u32> {
        let current = self.read_counter(listing_id, counter).await?;
        let next = current.saturating_add(1);
        self.write_counter(listing_id, counter, next).await?;
        Ok(next)
    }
}
