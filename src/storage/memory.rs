//! Process-local store backend.
//!
//! Keeps everything in a [`StoreData`] behind a read-write lock. Suitable for
//! tests, demos, and hosts that persist the dataset some other way. An optional
//! per-request latency emulates a remote store so that interleavings between
//! concurrent operations actually occur.

use crate::clock::{Clock, SystemClock};
use crate::domain::error::{FinderError, Result};
use crate::domain::{Feedback, Listing, ListingId, NewFeedback, NewListing};
use crate::storage::backend::ListingStore;
use crate::storage::models::StoreData;
use crate::trust::Counter;
use async_trait::async_trait;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

/// In-memory [`ListingStore`].
#[derive(Debug)]
pub struct MemoryStore {
    data: RwLock<StoreData>,
    clock: Arc<dyn Clock>,
    latency: Option<Duration>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty store stamped by the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store stamped by `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            data: RwLock::new(StoreData::default()),
            clock,
            latency: None,
        }
    }

    /// Creates a store pre-populated with `data`.
    #[must_use]
    pub fn from_data(data: StoreData, clock: Arc<dyn Clock>) -> Self {
        Self {
            data: RwLock::new(data),
            clock,
            latency: None,
        }
    }

    /// Delays every request by `latency` before it touches the data.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Returns a copy of the current contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn snapshot(&self) -> Result<StoreData> {
        Ok(self.read()?.clone())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreData>> {
        self.data
            .read()
            .map_err(|e| FinderError::Storage(format!("memory store lock poisoned: {e}")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreData>> {
        self.data
            .write()
            .map_err(|e| FinderError::Storage(format!("memory store lock poisoned: {e}")))
    }

    async fn round_trip(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl ListingStore for MemoryStore {
    async fn list_listings(&self) -> Result<Vec<Listing>> {
        self.round_trip().await;
        let listings = self.read()?.listings_newest_first();
        tracing::debug!(count = listings.len(), "listed listings");
        Ok(listings)
    }

    async fn list_feedback(&self, listing_id: &ListingId) -> Result<Vec<Feedback>> {
        self.round_trip().await;
        let entries = self.read()?.feedback_newest_first(listing_id);
        tracing::debug!(listing_id = %listing_id, count = entries.len(), "listed feedback");
        Ok(entries)
    }

    async fn create_listing(&self, fields: &NewListing) -> Result<Listing> {
        self.round_trip().await;
        let now = self.clock.now_millis();
        let listing = self.write()?.insert_listing(fields, now);
        tracing::debug!(listing_id = %listing.id, name = %listing.name, "listing inserted");
        Ok(listing)
    }

    async fn create_feedback(&self, fields: &NewFeedback) -> Result<()> {
        self.round_trip().await;
        let now = self.clock.now_millis();
        let entry = self.write()?.insert_feedback(fields, now);
        tracing::debug!(feedback_id = %entry.id, listing_id = %entry.listing_id, "feedback inserted");
        Ok(())
    }

    async fn read_counter(&self, listing_id: &ListingId, counter: Counter) -> Result<u32> {
        self.round_trip().await;
        self.read()?.read_counter(listing_id, counter)
    }

    async fn write_counter(&self, listing_id: &ListingId, counter: Counter, value: u32) -> Result<()> {
        self.round_trip().await;
        self.write()?.write_counter(listing_id, counter, value)
    }

    async fn increment_counter(&self, listing_id: &ListingId, counter: Counter) -> Result<u32> {
        self.round_trip().await;
        self.write()?.increment_counter(listing_id, counter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::domain::{Coordinate, Offerings};

    fn fields(name: &str) -> NewListing {
        NewListing {
            name: name.to_string(),
            area: "Halishahar".to_string(),
            coordinate: Coordinate::new(22.33, 91.78),
            offerings: Offerings::default(),
            serving_time: Some("Maghrib time".to_string()),
            notes: None,
            capacity: None,
        }
    }

    #[tokio::test]
    async fn created_listing_gets_id_timestamp_and_zero_counts() {
        let store = MemoryStore::with_clock(Arc::new(FixedClock::new(42)));
        let listing = store.create_listing(&fields("Noor Jame")).await.unwrap();

        assert_eq!(listing.created_at, 42);
        assert_eq!(listing.confirmed_count, 0);
        assert_eq!(listing.disputed_count, 0);
        assert!(!listing.id.as_str().is_empty());
        assert_eq!(store.list_listings().await.unwrap(), vec![listing]);
    }

    #[tokio::test]
    async fn listings_come_back_newest_first() {
        let store = MemoryStore::with_clock(Arc::new(FixedClock::ticking(0, 1)));
        let first = store.create_listing(&fields("first")).await.unwrap();
        let second = store.create_listing(&fields("second")).await.unwrap();

        let ids: Vec<_> = store.list_listings().await.unwrap().into_iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn atomic_increment_does_not_lose_updates() {
        let store = Arc::new(MemoryStore::new().with_latency(Duration::from_millis(5)));
        let listing = store.create_listing(&fields("busy")).await.unwrap();

        let (a, b) = tokio::join!(
            store.increment_counter(&listing.id, Counter::Confirmed),
            store.increment_counter(&listing.id, Counter::Confirmed),
        );
        a.unwrap();
        b.unwrap();
        assert_eq!(store.read_counter(&listing.id, Counter::Confirmed).await.unwrap(), 2);
    }
}
