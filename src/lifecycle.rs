//! Listing lifecycle coordination.
//!
//! [`ListingCoordinator`] is the only component that writes to the store. It
//! validates input locally, performs the write, and invalidates the affected
//! cache keys so the next read re-fetches fresh collections.

use crate::cache::{CacheKey, QueryCache};
use crate::domain::error::{Result, ValidationError};
use crate::domain::{Feedback, Listing, ListingDraft, ListingId, NewFeedback, NewListing};
use crate::storage::ListingStore;
use crate::trust::{self, CounterUpdate};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Validates a form draft into insertable fields.
///
/// Trims `name`, `area`, `serving_time` and `notes`; blank optionals become
/// `None`.
///
/// # Errors
///
/// Returns the first failing rule, checked in order: name, area, coordinate
/// presence, coordinate range, capacity.
///
/// ```
/// use iftaar_finder::domain::{Coordinate, ListingDraft, ValidationError};
/// use iftaar_finder::lifecycle::validate_draft;
///
/// let err = validate_draft(&ListingDraft::new("  ", "Agrabad")).unwrap_err();
/// assert_eq!(err, ValidationError::EmptyName);
///
/// let ok = validate_draft(&ListingDraft::new(" Noor Jame ", "Agrabad").at(Coordinate::new(22.3, 91.8))).unwrap();
/// assert_eq!(ok.name, "Noor Jame");
/// ```
pub fn validate_draft(draft: &ListingDraft) -> std::result::Result<NewListing, ValidationError> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    let area = draft.area.trim();
    if area.is_empty() {
        return Err(ValidationError::EmptyArea);
    }
    let coordinate = draft.coordinate.ok_or(ValidationError::MissingCoordinate)?;
    if !coordinate.is_valid() {
        return Err(ValidationError::InvalidCoordinate {
            latitude: coordinate.latitude.to_string(),
            longitude: coordinate.longitude.to_string(),
        });
    }
    let capacity = match draft.capacity {
        None => None,
        Some(n) => Some(NonZeroU32::new(n).ok_or(ValidationError::InvalidCapacity)?),
    };

    Ok(NewListing {
        name: name.to_string(),
        area: area.to_string(),
        coordinate,
        offerings: draft.offerings,
        serving_time: non_blank(&draft.serving_time),
        notes: non_blank(&draft.notes),
        capacity,
    })
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Orchestrates listing creation, feedback, and cached reads.
#[derive(Clone)]
pub struct ListingCoordinator {
    store: Arc<dyn ListingStore>,
    cache: Arc<QueryCache>,
    counter_update: CounterUpdate,
}

impl std::fmt::Debug for ListingCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingCoordinator")
            .field("cache", &self.cache)
            .field("counter_update", &self.counter_update)
            .finish_non_exhaustive()
    }
}

impl ListingCoordinator {
    /// Creates a coordinator with a fresh session cache.
    #[must_use]
    pub fn new(store: Arc<dyn ListingStore>, counter_update: CounterUpdate) -> Self {
        Self::with_cache(store, Arc::new(QueryCache::new()), counter_update)
    }

    #[must_use]
    pub fn with_cache(store: Arc<dyn ListingStore>, cache: Arc<QueryCache>, counter_update: CounterUpdate) -> Self {
        Self {
            store,
            cache,
            counter_update,
        }
    }

    #[must_use]
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    #[must_use]
    pub fn store(&self) -> &dyn ListingStore {
        self.store.as_ref()
    }

    /// Validates and inserts a new listing.
    ///
    /// On success the listing collection is invalidated.
    ///
    /// # Errors
    ///
    /// Returns a validation error without touching the store, or the store's
    /// error if the insert fails.
    pub async fn create_listing(&self, draft: &ListingDraft) -> Result<Listing> {
        let fields = validate_draft(draft).map_err(|e| {
            tracing::debug!(error = %e, "listing draft rejected");
            e
        })?;

        let listing = self.store.create_listing(&fields).await?;
        self.cache.invalidate(&CacheKey::Listings);

        tracing::info!(listing_id = %listing.id, name = %listing.name, area = %listing.area, "listing created");
        Ok(listing)
    }

    /// Records a confirmation or dispute for `listing_id`.
    ///
    /// `text` is capped at capture; empty text means no comment. On success the
    /// listing's feedback and the listing collection are invalidated. A store
    /// failure invalidates them as well, since the row may already be stored.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingListingId`] for an empty id, otherwise
    /// any store error from [`trust::apply_feedback`].
    pub async fn add_feedback(&self, listing_id: &ListingId, is_confirmation: bool, text: &str) -> Result<()> {
        if listing_id.as_str().trim().is_empty() {
            return Err(ValidationError::MissingListingId.into());
        }

        let feedback = NewFeedback::new(listing_id.clone(), is_confirmation, text);
        match trust::apply_feedback(self.store.as_ref(), &feedback, self.counter_update).await {
            Ok(value) => {
                self.cache.invalidate(&CacheKey::Feedback(listing_id.clone()));
                self.cache.invalidate(&CacheKey::Listings);
                tracing::info!(listing_id = %listing_id, is_confirmation, count = value, "feedback recorded");
                Ok(())
            }
            Err(e) => {
                // The row may already be stored even though the counter update failed.
                if !e.is_validation() {
                    self.cache.invalidate(&CacheKey::Feedback(listing_id.clone()));
                    self.cache.invalidate(&CacheKey::Listings);
                }
                tracing::warn!(
                    listing_id = %listing_id,
                    error = %e,
                    "feedback failed, counter may lag its feedback rows"
                );
                Err(e)
            }
        }
    }

    /// Listing collection, newest first, served from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns the store's error on a cache miss that fails to fetch.
    pub async fn listings(&self) -> Result<Vec<Listing>> {
        if let Some(cached) = self.cache.listings() {
            return Ok(cached);
        }

        let ticket = self.cache.begin_fetch(&CacheKey::Listings);
        let listings = self.store.list_listings().await?;
        if !self.cache.fill_listings(ticket, listings.clone()) {
            tracing::debug!("listing fetch raced an invalidation, not caching");
        }
        Ok(listings)
    }

    /// Feedback for a listing, newest first.
    ///
    /// Without an id this returns an empty sequence and never calls the store.
    ///
    /// # Errors
    ///
    /// Returns the store's error on a cache miss that fails to fetch.
    pub async fn feedback(&self, listing_id: Option<&ListingId>) -> Result<Vec<Feedback>> {
        let Some(listing_id) = listing_id else {
            return Ok(Vec::new());
        };

        if let Some(cached) = self.cache.feedback(listing_id) {
            return Ok(cached);
        }

        let key = CacheKey::Feedback(listing_id.clone());
        let ticket = self.cache.begin_fetch(&key);
        let entries = self.store.list_feedback(listing_id).await?;
        if !self.cache.fill_feedback(listing_id, ticket, entries.clone()) {
            tracing::debug!(listing_id = %listing_id, "feedback fetch raced an invalidation, not caching");
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinate, Offerings};

    fn draft() -> ListingDraft {
        ListingDraft {
            name: "Baitul Aman".to_string(),
            area: "Agrabad".to_string(),
            coordinate: Some(Coordinate::new(22.32, 91.81)),
            offerings: Offerings::default(),
            serving_time: "Maghrib time".to_string(),
            notes: "   ".to_string(),
            capacity: None,
        }
    }

    #[test]
    fn validation_rules_in_order() {
        let mut d = draft();
        d.name = String::new();
        d.area = String::new();
        assert_eq!(validate_draft(&d), Err(ValidationError::EmptyName));

        let mut d = draft();
        d.area = "\t".to_string();
        assert_eq!(validate_draft(&d), Err(ValidationError::EmptyArea));

        let mut d = draft();
        d.coordinate = None;
        assert_eq!(validate_draft(&d), Err(ValidationError::MissingCoordinate));

        let mut d = draft();
        d.coordinate = Some(Coordinate::new(0.0, 200.0));
        assert!(matches!(validate_draft(&d), Err(ValidationError::InvalidCoordinate { .. })));

        let mut d = draft();
        d.capacity = Some(0);
        assert_eq!(validate_draft(&d), Err(ValidationError::InvalidCapacity));
    }

    #[test]
    fn blank_optionals_become_none() {
        let fields = validate_draft(&draft()).unwrap();
        assert_eq!(fields.serving_time.as_deref(), Some("Maghrib time"));
        assert_eq!(fields.notes, None);
        assert_eq!(fields.capacity, None);
    }

    #[test]
    fn capacity_is_kept_when_positive() {
        let mut d = draft();
        d.capacity = Some(150);
        assert_eq!(validate_draft(&d).unwrap().capacity, NonZeroU32::new(150));
    }
}
