#![allow(dead_code)]

use async_trait::async_trait;
use iftaar_finder::clock::FixedClock;
use iftaar_finder::domain::{Coordinate, Feedback, Listing, ListingDraft, ListingId, NewFeedback, NewListing, Offerings};
use iftaar_finder::lifecycle::validate_draft;
use iftaar_finder::storage::{ListingStore, MemoryStore};
use iftaar_finder::trust::Counter;
use iftaar_finder::{FinderError, Result};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// 2024-03-12 18:05 UTC
pub const T0: i64 = 1_710_266_700_000;

pub fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::ticking(T0, 1_000))
}

pub fn memory_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_clock(clock()))
}

/// Memory store where every request takes `latency` of (tokio) time.
pub fn slow_store(latency: Duration) -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_clock(clock()).with_latency(latency))
}

pub fn draft(name: &str, area: &str, lat: f64, lng: f64) -> ListingDraft {
    ListingDraft {
        offerings: Offerings { iftaar: true, biriyani: true },
        serving_time: "After Maghrib".to_string(),
        ..ListingDraft::new(name, area).at(Coordinate::new(lat, lng))
    }
}

pub fn new_listing(name: &str, area: &str, lat: f64, lng: f64) -> NewListing {
    validate_draft(&draft(name, area, lat, lng)).expect("fixture draft is valid")
}

/// Creates a listing and sets its confirmed counter directly.
pub async fn seed_listing(store: &dyn ListingStore, name: &str, confirmed: u32) -> Listing {
    let listing = store
        .create_listing(&new_listing(name, "Agrabad", 22.32, 91.81))
        .await
        .expect("seed listing");
    store
        .write_counter(&listing.id, Counter::Confirmed, confirmed)
        .await
        .expect("seed counter");
    listing
}

/// Call counts per store operation.
#[derive(Debug, Default)]
pub struct Calls {
    pub list_listings: AtomicUsize,
    pub list_feedback: AtomicUsize,
    pub create_listing: AtomicUsize,
    pub create_feedback: AtomicUsize,
    pub read_counter: AtomicUsize,
    pub write_counter: AtomicUsize,
    pub increment_counter: AtomicUsize,
}

impl Calls {
    pub fn total(&self) -> usize {
        [
            &self.list_listings,
            &self.list_feedback,
            &self.create_listing,
            &self.create_feedback,
            &self.read_counter,
            &self.write_counter,
            &self.increment_counter,
        ]
        .iter()
        .map(|c| c.load(Ordering::SeqCst))
        .sum()
    }
}

fn bump(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::SeqCst);
}

/// Wraps a store, counting calls and optionally failing counter writes.
#[derive(Debug)]
pub struct CountingStore {
    inner: Arc<MemoryStore>,
    pub calls: Calls,
    fail_counter_writes: AtomicBool,
}

impl CountingStore {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            calls: Calls::default(),
            fail_counter_writes: AtomicBool::new(false),
        }
    }

    pub fn fail_counter_writes(&self, fail: bool) {
        self.fail_counter_writes.store(fail, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    fn check_counter_write(&self) -> Result<()> {
        if self.fail_counter_writes.load(Ordering::SeqCst) {
            return Err(FinderError::Storage("counter update rejected".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ListingStore for CountingStore {
    async fn list_listings(&self) -> Result<Vec<Listing>> {
        bump(&self.calls.list_listings);
        self.inner.list_listings().await
    }

    async fn list_feedback(&self, listing_id: &ListingId) -> Result<Vec<Feedback>> {
        bump(&self.calls.list_feedback);
        self.inner.list_feedback(listing_id).await
    }

    async fn create_listing(&self, fields: &NewListing) -> Result<Listing> {
        bump(&self.calls.create_listing);
        self.inner.create_listing(fields).await
    }

    async fn create_feedback(&self, fields: &NewFeedback) -> Result<()> {
        bump(&self.calls.create_feedback);
        self.inner.create_feedback(fields).await
    }

    async fn read_counter(&self, listing_id: &ListingId, counter: Counter) -> Result<u32> {
        bump(&self.calls.read_counter);
        self.inner.read_counter(listing_id, counter).await
    }

    async fn write_counter(&self, listing_id: &ListingId, counter: Counter, value: u32) -> Result<()> {
        bump(&self.calls.write_counter);
        self.check_counter_write()?;
        self.inner.write_counter(listing_id, counter, value).await
    }

    async fn increment_counter(&self, listing_id: &ListingId, counter: Counter) -> Result<u32> {
        bump(&self.calls.increment_counter);
        self.check_counter_write()?;
        self.inner.increment_counter(listing_id, counter).await
    }
}
