//! Session state and view model computation.
//!
//! [`AppState`] is the single source of truth for everything transient: the
//! last fetched listings, the discovery inputs, the coordinate-source
//! selection, the open detail, and in-flight flags. Derived data (distances
//! and the visible sequence) is recomputed by [`AppState::apply_filters`]
//! whenever one of its inputs changes.

use super::modes::{LocationSelection, Tab};
use crate::discovery::{compute_distances, rank_listings, Category, DiscoveryQuery, DistanceMap};
use crate::domain::{Coordinate, Feedback, Listing, ListingId, LocationError};
use crate::ui::helpers::{format_coordinate, format_distance, format_timestamp, offering_labels};
use crate::ui::viewmodel::{
    EmptyState, FeedbackEntry, ListingCard, ListingDetail, MapMarker, MapView, MarkerStyle,
};

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A message for the presentation layer to show once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Central session state.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Last fetched listings, newest first.
    pub listings: Vec<Listing>,

    /// Distance from `user_position` to each listing. Empty while unknown.
    pub distances: DistanceMap,

    /// Output of the filter/rank pipeline, in display order.
    pub visible: Vec<Listing>,

    pub search_query: String,
    pub category: Category,

    pub user_position: Option<Coordinate>,

    /// Why the last device reading failed, cleared on the next success.
    pub location_error: Option<LocationError>,

    pub selection: LocationSelection,
    pub tab: Tab,

    /// Listing whose detail is open.
    pub selected_listing: Option<ListingId>,

    /// Feedback for `selected_listing`, newest first.
    pub feedback: Vec<Feedback>,

    pub notices: Vec<Notice>,

    pub loading_listings: bool,
    pub pending_create: bool,
    pub pending_feedback: bool,
}

impl AppState {
    /// Creates an empty state with `category` preselected.
    #[must_use]
    pub fn new(category: Category) -> Self {
        Self {
            category,
            ..Self::default()
        }
    }

    /// Recomputes distances and the visible sequence.
    pub fn apply_filters(&mut self) {
        self.distances = compute_distances(&self.listings, self.user_position);

        let query = DiscoveryQuery::new(&self.search_query, self.category, self.user_position);
        self.visible = rank_listings(&self.listings, &query, &self.distances)
            .into_iter()
            .cloned()
            .collect();

        tracing::debug!(
            total = self.listings.len(),
            visible = self.visible.len(),
            located = self.user_position.is_some(),
            "filters applied"
        );
    }

    /// Replaces the listing set and re-runs the pipeline.
    pub fn set_listings(&mut self, listings: Vec<Listing>) {
        self.listings = listings;
        self.apply_filters();
    }

    /// Updates the user's position and re-runs the pipeline.
    pub fn set_user_position(&mut self, position: Coordinate) {
        self.user_position = Some(position);
        self.location_error = None;
        self.apply_filters();
    }

    /// The listing whose detail is open, if it is still in the fetched set.
    #[must_use]
    pub fn selected(&self) -> Option<&Listing> {
        let id = self.selected_listing.as_ref()?;
        self.listings.iter().find(|l| &l.id == id)
    }

    /// Whether the add form's submit control is enabled.
    ///
    /// Requires exactly one resolved coordinate source and no create in flight.
    #[must_use]
    pub const fn can_submit(&self) -> bool {
        self.selection.selected_coordinate().is_some() && !self.pending_create
    }

    pub fn push_notice(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice {
            level,
            message: message.into(),
        });
    }

    /// Drains pending notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Markers for the visible listings plus placement state.
    #[must_use]
    pub fn map_view(&self) -> MapView {
        let markers = self
            .visible
            .iter()
            .map(|l| MapMarker {
                listing_id: l.id.clone(),
                coordinate: l.coordinate,
                label: l.name.clone(),
                style: if l.is_verified() {
                    MarkerStyle::Verified
                } else {
                    MarkerStyle::Unverified
                },
            })
            .collect();

        MapView {
            markers,
            placement_mode: self.selection.placement_mode(),
            user_position: self.user_position,
            pending_pin: self.selection.selected_coordinate(),
        }
    }

    /// Cards for the list screen, in display order.
    #[must_use]
    pub fn list_cards(&self) -> Vec<ListingCard> {
        self.visible.iter().map(|l| self.card(l)).collect()
    }

    /// Empty-list message, `None` when something is visible.
    #[must_use]
    pub fn empty_state(&self) -> Option<EmptyState> {
        if !self.visible.is_empty() || self.loading_listings {
            return None;
        }

        let (message, subtitle) = if self.listings.is_empty() {
            ("No listings yet", "Add the first iftaar spot from the Add tab")
        } else {
            ("No matching listings", "Try another search or category")
        };
        Some(EmptyState {
            message: message.to_string(),
            subtitle: subtitle.to_string(),
        })
    }

    /// Detail for the selected listing with its loaded feedback.
    #[must_use]
    pub fn listing_detail(&self) -> Option<ListingDetail> {
        let listing = self.selected()?;

        let feedback = self
            .feedback
            .iter()
            .map(|f| FeedbackEntry {
                is_confirmation: f.is_confirmation,
                text: f.text.clone(),
                posted: format_timestamp(f.created_at),
            })
            .collect();

        Some(ListingDetail {
            card: self.card(listing),
            coordinate: format_coordinate(&listing.coordinate),
            notes: listing.notes.clone(),
            capacity: listing.capacity.map(std::num::NonZeroU32::get),
            created: format_timestamp(listing.created_at),
            feedback,
            feedback_enabled: !self.pending_feedback,
        })
    }

    fn card(&self, listing: &Listing) -> ListingCard {
        ListingCard {
            listing_id: listing.id.clone(),
            name: listing.name.clone(),
            area: listing.area.clone(),
            offerings: offering_labels(&listing.offerings),
            distance: self.distances.get(&listing.id).map(|km| format_distance(*km)),
            serving_time: listing.serving_time.clone(),
            status: listing.status(),
            confirmed_count: listing.confirmed_count,
            disputed_count: listing.disputed_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewListing, Offerings};

    fn listing(id: &str, lat: f64, lng: f64, confirmed: u32) -> Listing {
        let mut l = Listing::from_new(
            NewListing {
                name: format!("Masjid {id}"),
                area: "Agrabad".to_string(),
                coordinate: Coordinate::new(lat, lng),
                offerings: Offerings::default(),
                serving_time: None,
                notes: None,
                capacity: None,
            },
            ListingId::from(id),
            0,
        );
        l.confirmed_count = confirmed;
        l
    }

    #[test]
    fn position_update_reorders_and_labels_distance() {
        let mut state = AppState::new(Category::All);
        state.set_listings(vec![listing("x", 22.40, 91.80, 0), listing("y", 22.37, 91.79, 0)]);
        assert_eq!(state.list_cards()[0].listing_id, ListingId::from("x"));
        assert!(state.list_cards()[0].distance.is_none());

        state.set_user_position(Coordinate::new(22.36, 91.78));
        let cards = state.list_cards();
        assert_eq!(cards[0].listing_id, ListingId::from("y"));
        assert_eq!(cards[0].distance.as_deref(), Some("1.5km"));
    }

    #[test]
    fn markers_follow_visible_set_and_trust() {
        let mut state = AppState::new(Category::All);
        state.set_listings(vec![listing("a", 22.3, 91.8, 3), listing("b", 22.3, 91.8, 1)]);
        let view = state.map_view();
        assert_eq!(view.markers.len(), 2);
        assert_eq!(view.markers[0].style, MarkerStyle::Verified);
        assert_eq!(view.markers[1].style, MarkerStyle::Unverified);

        state.category = Category::Verified;
        state.apply_filters();
        assert_eq!(state.map_view().markers.len(), 1);
    }

    #[test]
    fn submit_requires_resolved_coordinate() {
        let mut state = AppState::new(Category::All);
        assert!(!state.can_submit());
        state.selection = LocationSelection::PinDropArmed;
        assert!(!state.can_submit());
        state.selection = LocationSelection::PinDropped(Coordinate::new(22.3, 91.8));
        assert!(state.can_submit());
        state.pending_create = true;
        assert!(!state.can_submit());
    }

    #[test]
    fn empty_state_distinguishes_no_data_from_no_match() {
        let mut state = AppState::new(Category::All);
        state.apply_filters();
        assert_eq!(state.empty_state().map(|e| e.message), Some("No listings yet".to_string()));

        state.set_listings(vec![listing("a", 22.3, 91.8, 0)]);
        assert!(state.empty_state().is_none());

        state.search_query = "zzz".to_string();
        state.apply_filters();
        assert_eq!(state.empty_state().map(|e| e.message), Some("No matching listings".to_string()));
    }
}
