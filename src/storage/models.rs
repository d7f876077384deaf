//! In-memory dataset shared by the bundled store backends.
//!
//! [`StoreData`] holds listings and feedback in insertion order and implements
//! the store operations synchronously. Backends wrap it in a lock and add their
//! own persistence.

use crate::domain::error::{FinderError, Result};
use crate::domain::{Feedback, FeedbackId, Listing, ListingId, NewFeedback, NewListing};
use crate::trust::Counter;
use serde::{Deserialize, Serialize};

/// Current on-disk format version.
pub const STORE_FORMAT_VERSION: u32 = 1;

/// Store contents.
///
/// This is also the top-level structure serialized by the JSON backend:
///
/// ```json
/// {
///   "version": 1,
///   "listings": [
///     {
///       "id": "3f0c…",
///       "name": "Baitul Aman",
///       "area": "Agrabad",
///       "coordinate": { "latitude": 22.33, "longitude": 91.81 },
///       "offerings": { "iftaar": true, "biriyani": false },
///       "serving_time": "Maghrib time",
///       "notes": null,
///       "capacity": null,
///       "confirmed_count": 4,
///       "disputed_count": 0,
///       "created_at": 1741000000000
///     }
///   ],
///   "feedback": [
///     { "id": "…", "listing_id": "3f0c…", "text": "great place", "is_confirmation": true, "created_at": 1741000100000 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreData {
    /// Version of the storage format for future migrations.
    pub version: u32,

    /// Listings in insertion order.
    #[serde(default)]
    pub listings: Vec<Listing>,

    /// Feedback entries in insertion order.
    #[serde(default)]
    pub feedback: Vec<Feedback>,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            version: STORE_FORMAT_VERSION,
            listings: Vec::new(),
            feedback: Vec::new(),
        }
    }
}

impl StoreData {
    /// All listings, newest first. Equal timestamps list the later insert first.
    #[must_use]
    pub fn listings_newest_first(&self) -> Vec<Listing> {
        let mut listings: Vec<Listing> = self.listings.iter().rev().cloned().collect();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        listings
    }

    /// Feedback for `listing_id`, newest first.
    #[must_use]
    pub fn feedback_newest_first(&self, listing_id: &ListingId) -> Vec<Feedback> {
        let mut entries: Vec<Feedback> = self
            .feedback
            .iter()
            .rev()
            .filter(|f| &f.listing_id == listing_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries
    }

    pub fn insert_listing(&mut self, fields: &NewListing, created_at: i64) -> Listing {
        let listing = Listing::from_new(fields.clone(), ListingId::generate(), created_at);
        self.listings.push(listing.clone());
        listing
    }

    pub fn insert_feedback(&mut self, fields: &NewFeedback, created_at: i64) -> Feedback {
        let entry = Feedback::from_new(fields.clone(), FeedbackId::generate(), created_at);
        self.feedback.push(entry.clone());
        entry
    }

    fn listing_mut(&mut self, listing_id: &ListingId) -> Result<&mut Listing> {
        self.listings
            .iter_mut()
            .find(|l| &l.id == listing_id)
            .ok_or_else(|| FinderError::ListingNotFound(listing_id.clone()))
    }

    /// Reads a counter.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::ListingNotFound`] for unknown ids.
    pub fn read_counter(&self, listing_id: &ListingId, counter: Counter) -> Result<u32> {
        self.listings
            .iter()
            .find(|l| &l.id == listing_id)
            .map(|l| counter.get(l))
            .ok_or_else(|| FinderError::ListingNotFound(listing_id.clone()))
    }

    /// Overwrites a counter.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::ListingNotFound`] for unknown ids.
    pub fn write_counter(&mut self, listing_id: &ListingId, counter: Counter, value: u32) -> Result<()> {
        let listing = self.listing_mut(listing_id)?;
        *counter.get_mut(listing) = value;
        Ok(())
    }

    /// Increments a counter in one step and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::ListingNotFound`] for unknown ids.
    pub fn increment_counter(&mut self, listing_id: &ListingId, counter: Counter) -> Result<u32> {
        let listing = self.listing_mut(listing_id)?;
        let slot = counter.get_mut(listing);
        *slot = slot.saturating_add(1);
        Ok(*slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinate, Offerings};

    fn fields(name: &str) -> NewListing {
        NewListing {
            name: name.to_string(),
            area: "Agrabad".to_string(),
            coordinate: Coordinate::new(22.33, 91.81),
            offerings: Offerings::default(),
            serving_time: None,
            notes: None,
            capacity: None,
        }
    }

    #[test]
    fn listings_sort_newest_first_with_insert_order_tiebreak() {
        let mut data = StoreData::default();
        let a = data.insert_listing(&fields("a"), 100);
        let b = data.insert_listing(&fields("b"), 300);
        let c = data.insert_listing(&fields("c"), 100);

        let ids: Vec<_> = data.listings_newest_first().into_iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![b.id, c.id, a.id]);
    }

    #[test]
    fn feedback_is_scoped_to_listing() {
        let mut data = StoreData::default();
        let a = data.insert_listing(&fields("a"), 1);
        let b = data.insert_listing(&fields("b"), 2);
        data.insert_feedback(&NewFeedback::new(a.id.clone(), true, "one"), 10);
        data.insert_feedback(&NewFeedback::new(b.id.clone(), true, "other"), 11);
        data.insert_feedback(&NewFeedback::new(a.id.clone(), false, "two"), 12);

        let texts: Vec<_> = data
            .feedback_newest_first(&a.id)
            .into_iter()
            .filter_map(|f| f.text)
            .collect();
        assert_eq!(texts, vec!["two", "one"]);
    }

    #[test]
    fn counters_round_trip_and_increment() {
        let mut data = StoreData::default();
        let a = data.insert_listing(&fields("a"), 1);
        data.write_counter(&a.id, Counter::Confirmed, 5).unwrap();
        assert_eq!(data.read_counter(&a.id, Counter::Confirmed).unwrap(), 5);
        assert_eq!(data.increment_counter(&a.id, Counter::Disputed).unwrap(), 1);
        assert_eq!(data.read_counter(&a.id, Counter::Confirmed).unwrap(), 5);
    }

    #[test]
    fn unknown_listing_counter_is_not_found() {
        let data = StoreData::default();
        let err = data.read_counter(&ListingId::from("missing"), Counter::Confirmed).unwrap_err();
        assert!(matches!(err, FinderError::ListingNotFound(_)));
    }
}
