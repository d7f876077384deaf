//! Filter and rank pipeline.
//!
//! Produces the visible listing sequence from the full set. Stages run in a
//! fixed order:
//!
//! 1. **Text**: case-insensitive substring match on name or area
//! 2. **Category**: the selected [`Category`] predicate
//! 3. **Order**: ascending distance whenever the user's position is known,
//!    otherwise the incoming order (newest first by store convention)
//!
//! Distance wins the ordering even when a category other than `Nearby` is
//! selected. Listings without a distance go last. Every sort is stable so that
//! re-rendering with unchanged inputs never shuffles equal entries.

use super::category::Category;
use crate::domain::{Coordinate, Listing, ListingId};
use std::collections::HashMap;

/// Distance in kilometers from the user to each listing, keyed by listing id.
pub type DistanceMap = HashMap<ListingId, f64>;

/// Computes the distance from `origin` to every listing.
///
/// Returns an empty map when the user's position is unknown.
#[must_use]
pub fn compute_distances(listings: &[Listing], origin: Option<Coordinate>) -> DistanceMap {
    let Some(origin) = origin else {
        return DistanceMap::new();
    };

    listings
        .iter()
        .map(|l| (l.id.clone(), origin.distance_to(&l.coordinate)))
        .collect()
}

/// The user's current discovery inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscoveryQuery<'a> {
    /// Raw search box contents. Blank text disables the filter; otherwise it
    /// is matched as typed, surrounding spaces included.
    pub text: &'a str,
    pub category: Category,
    /// User position, `None` while unknown.
    pub origin: Option<Coordinate>,
}

impl<'a> DiscoveryQuery<'a> {
    #[must_use]
    pub const fn new(text: &'a str, category: Category, origin: Option<Coordinate>) -> Self {
        Self { text, category, origin }
    }
}

/// Runs the pipeline and returns the visible listings in display order.
///
/// Pure: the same inputs always produce the same sequence.
///
/// # Examples
///
/// ```
/// use iftaar_finder::discovery::{compute_distances, rank_listings, Category, DiscoveryQuery};
/// use iftaar_finder::domain::Coordinate;
/// # use iftaar_finder::domain::*;
/// # fn at(id: &str, lat: f64, lng: f64) -> Listing {
/// #     Listing::from_new(NewListing { name: id.into(), area: "Agrabad".into(),
/// #         coordinate: Coordinate::new(lat, lng), offerings: Offerings::default(),
/// #         serving_time: None, notes: None, capacity: None }, ListingId::from(id), 0)
/// # }
///
/// let listings = vec![at("x", 22.40, 91.80), at("y", 22.37, 91.79)];
/// let me = Some(Coordinate::new(22.36, 91.78));
/// let distances = compute_distances(&listings, me);
///
/// let ranked = rank_listings(&listings, &DiscoveryQuery::new("", Category::All, me), &distances);
/// let names: Vec<_> = ranked.iter().map(|l| l.name.as_str()).collect();
/// assert_eq!(names, ["y", "x"]);
/// ```
#[must_use]
pub fn rank_listings<'l>(
    listings: &'l [Listing],
    query: &DiscoveryQuery<'_>,
    distances: &DistanceMap,
) -> Vec<&'l Listing> {
    let _span = tracing::debug_span!(
        "rank_listings",
        total = listings.len(),
        query_len = query.text.len(),
        category = %query.category,
        located = query.origin.is_some()
    )
    .entered();

    let filter_text = !query.text.trim().is_empty();
    let needle = query.text.to_lowercase();

    let mut visible: Vec<&Listing> = listings
        .iter()
        .filter(|l| !filter_text || l.matches_text(&needle))
        .filter(|l| query.category.admits(l))
        .collect();

    if query.origin.is_some() {
        sort_by_distance(&mut visible, distances);
    }

    tracing::debug!(visible = visible.len(), "listings ranked");
    visible
}

/// Stable ascending sort by distance; missing distances sort as infinite.
pub fn sort_by_distance(listings: &mut [&Listing], distances: &DistanceMap) {
    let key = |l: &Listing| distances.get(&l.id).copied().unwrap_or(f64::INFINITY);
    listings.sort_by(|a, b| key(*a).total_cmp(&key(*b)));
}
