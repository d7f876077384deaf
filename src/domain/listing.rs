//! Listing domain model.
//!
//! A listing is a physical place serving a free community meal. Listings are
//! created once and never edited; only their two feedback counters change over
//! their lifetime, and only upward.

use super::geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

/// Opaque, immutable listing identifier assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(String);

impl ListingId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ListingId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ListingId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A category of food a listing can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Offering {
    /// A free iftaar meal at sunset.
    Iftaar,
    /// Biriyani served alongside or instead of iftaar.
    Biriyani,
}

impl Offering {
    /// Every offering, in display order.
    pub const ALL: [Self; 2] = [Self::Iftaar, Self::Biriyani];

    /// Short badge label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Iftaar => "Iftaar",
            Self::Biriyani => "Biriyani",
        }
    }
}

/// Independent offering flags of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offerings {
    pub iftaar: bool,
    pub biriyani: bool,
}

impl Offerings {
    /// Returns whether the given offering is available.
    #[must_use]
    pub const fn has(&self, offering: Offering) -> bool {
        match offering {
            Offering::Iftaar => self.iftaar,
            Offering::Biriyani => self.biriyani,
        }
    }

    /// Iterates over the offerings whose flag is set.
    pub fn iter(&self) -> impl Iterator<Item = Offering> + '_ {
        Offering::ALL.into_iter().filter(|o| self.has(*o))
    }
}

impl Default for Offerings {
    /// New listings offer iftaar and not biriyani unless told otherwise.
    fn default() -> Self {
        Self {
            iftaar: true,
            biriyani: false,
        }
    }
}

/// A persisted listing.
///
/// # Fields
///
/// - `id`: store-assigned identifier
/// - `name`, `area`: trimmed, non-empty display strings
/// - `coordinate`: where the meal is served
/// - `offerings`: what is served
/// - `serving_time`, `notes`, `capacity`: optional details, `None` when absent
/// - `confirmed_count`, `disputed_count`: community feedback counters
/// - `created_at`: Unix milliseconds, the default ordering key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub name: String,
    pub area: String,
    pub coordinate: Coordinate,
    pub offerings: Offerings,
    pub serving_time: Option<String>,
    pub notes: Option<String>,
    pub capacity: Option<NonZeroU32>,
    pub confirmed_count: u32,
    pub disputed_count: u32,
    pub created_at: i64,
}

impl Listing {
    /// Materializes a validated [`NewListing`] with zeroed counters.
    ///
    /// Used by stores, which own identifier and timestamp assignment.
    #[must_use]
    pub fn from_new(fields: NewListing, id: ListingId, created_at: i64) -> Self {
        Self {
            id,
            name: fields.name,
            area: fields.area,
            coordinate: fields.coordinate,
            offerings: fields.offerings,
            serving_time: fields.serving_time,
            notes: fields.notes,
            capacity: fields.capacity,
            confirmed_count: 0,
            disputed_count: 0,
            created_at,
        }
    }

    /// Returns `true` when the name or area contains `needle`.
    ///
    /// `needle` must already be lowercase; the comparison lowercases the
    /// listing's own fields.
    #[must_use]
    pub fn matches_text(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.area.to_lowercase().contains(needle)
    }
}

/// Validated fields for a listing about to be inserted.
///
/// Produced by the lifecycle coordinator from a [`ListingDraft`]; the store
/// assigns `id`, `created_at` and zero counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewListing {
    pub name: String,
    pub area: String,
    pub coordinate: Coordinate,
    pub offerings: Offerings,
    pub serving_time: Option<String>,
    pub notes: Option<String>,
    pub capacity: Option<NonZeroU32>,
}

/// Raw user input from the add-listing form.
///
/// Nothing here is trusted yet. `coordinate` is whichever source the
/// interaction state machine currently has selected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingDraft {
    pub name: String,
    pub area: String,
    pub coordinate: Option<Coordinate>,
    pub offerings: Offerings,
    pub serving_time: String,
    pub notes: String,
    pub capacity: Option<u32>,
}

impl ListingDraft {
    /// Creates a draft with the two required text fields set.
    #[must_use]
    pub fn new(name: impl Into<String>, area: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            area: area.into(),
            ..Self::default()
        }
    }

    /// Sets the coordinate.
    #[must_use]
    pub const fn at(mut self, coordinate: Coordinate) -> Self {
        self.coordinate = Some(coordinate);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(name: &str, area: &str) -> Listing {
        Listing::from_new(
            NewListing {
                name: name.to_string(),
                area: area.to_string(),
                coordinate: Coordinate::new(22.36, 91.78),
                offerings: Offerings::default(),
                serving_time: None,
                notes: None,
                capacity: None,
            },
            ListingId::from("l-1"),
            0,
        )
    }

    #[test]
    fn from_new_starts_with_zero_counters() {
        let l = listing("Baitul Aman", "Agrabad");
        assert_eq!(l.confirmed_count, 0);
        assert_eq!(l.disputed_count, 0);
        assert_eq!(l.id.as_str(), "l-1");
    }

    #[test]
    fn text_match_covers_name_and_area() {
        let l = listing("Baitul Aman", "Agrabad");
        assert!(l.matches_text("baitul"));
        assert!(l.matches_text("agra"));
        assert!(!l.matches_text("noor"));
    }

    #[test]
    fn offerings_iterate_in_display_order() {
        let both = Offerings { iftaar: true, biriyani: true };
        assert_eq!(both.iter().collect::<Vec<_>>(), vec![Offering::Iftaar, Offering::Biriyani]);
        let none = Offerings { iftaar: false, biriyani: false };
        assert_eq!(none.iter().count(), 0);
    }

    #[test]
    fn absent_optionals_serialize_as_null() {
        let json = serde_json::to_value(listing("A", "B")).unwrap();
        assert!(json.get("serving_time").is_some_and(serde_json::Value::is_null));
        assert!(json.get("notes").is_some_and(serde_json::Value::is_null));
        assert!(json.get("capacity").is_some_and(serde_json::Value::is_null));
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(ListingId::generate(), ListingId::generate());
    }
}
