//! Session-scoped read-through query cache.
//!
//! Holds the last fetched listing collection and per-listing feedback
//! sequences. Mutations never patch cached values; they call
//! [`QueryCache::invalidate`] and the next read re-fetches wholesale.
//!
//! Each key carries a generation counter. A fetch records the generation when
//! it starts and may only fill the slot if no invalidation happened in
//! between, so a slow read that raced a write cannot resurrect stale data.

use crate::domain::{Feedback, Listing, ListingId};
use std::collections::HashMap;
use std::sync::Mutex;

/// Cached collection identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The full listing collection.
    Listings,
    /// Feedback for one listing.
    Feedback(ListingId),
}

/// Token returned by [`QueryCache::begin_fetch`], required to fill a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

#[derive(Debug, Default)]
struct Slot<T> {
    generation: u64,
    value: Option<T>,
}

#[derive(Debug, Default)]
struct Slots {
    listings: Slot<Vec<Listing>>,
    feedback: HashMap<ListingId, Slot<Vec<Feedback>>>,
}

/// Read-through cache for store collections.
///
/// Owned by whoever owns the session (typically the
/// [`ListingCoordinator`](crate::lifecycle::ListingCoordinator)); there is no
/// global instance.
#[derive(Debug, Default)]
pub struct QueryCache {
    slots: Mutex<Slots>,
}

impl QueryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_slots<R>(&self, f: impl FnOnce(&mut Slots) -> R) -> R {
        let mut guard = match self.slots.lock() {
            Ok(guard) => guard,
            // A panic mid-update can only have left a stale value behind; drop everything.
            Err(poisoned) => {
                let mut guard = poisoned.into_inner();
                *guard = Slots::default();
                guard
            }
        };
        f(&mut guard)
    }

    /// Cached listing collection, if present.
    #[must_use]
    pub fn listings(&self) -> Option<Vec<Listing>> {
        self.with_slots(|s| s.listings.value.clone())
    }

    /// Cached feedback for `listing_id`, if present.
    #[must_use]
    pub fn feedback(&self, listing_id: &ListingId) -> Option<Vec<Feedback>> {
        self.with_slots(|s| s.feedback.get(listing_id).and_then(|slot| slot.value.clone()))
    }

    /// Starts a fetch for `key`.
    #[must_use]
    pub fn begin_fetch(&self, key: &CacheKey) -> FetchTicket {
        self.with_slots(|s| match key {
            CacheKey::Listings => FetchTicket(s.listings.generation),
            CacheKey::Feedback(id) => FetchTicket(s.feedback.get(id).map_or(0, |slot| slot.generation)),
        })
    }

    /// Stores a fetched listing collection. Returns `false` if the ticket is stale.
    pub fn fill_listings(&self, ticket: FetchTicket, listings: Vec<Listing>) -> bool {
        self.with_slots(|s| {
            if s.listings.generation != ticket.0 {
                return false;
            }
            s.listings.value = Some(listings);
            true
        })
    }

    /// Stores fetched feedback. Returns `false` if the ticket is stale.
    pub fn fill_feedback(&self, listing_id: &ListingId, ticket: FetchTicket, feedback: Vec<Feedback>) -> bool {
        self.with_slots(|s| {
            let slot = s.feedback.entry(listing_id.clone()).or_default();
            if slot.generation != ticket.0 {
                return false;
            }
            slot.value = Some(feedback);
            true
        })
    }

    /// Drops the cached value for `key` and bumps its generation.
    pub fn invalidate(&self, key: &CacheKey) {
        tracing::debug!(?key, "invalidating cache entry");
        self.with_slots(|s| match key {
            CacheKey::Listings => {
                s.listings.generation += 1;
                s.listings.value = None;
            }
            CacheKey::Feedback(id) => {
                let slot = s.feedback.entry(id.clone()).or_default();
                slot.generation += 1;
                slot.value = None;
            }
        });
    }

    /// Drops every cached value.
    pub fn invalidate_all(&self) {
        self.with_slots(|s| {
            s.listings.generation += 1;
            s.listings.value = None;
            for slot in s.feedback.values_mut() {
                slot.generation += 1;
                slot.value = None;
            }
        });
    }
}
