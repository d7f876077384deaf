//! View models consumed by the presentation layer.
//!
//! These are display-ready snapshots built by
//! [`AppState`](crate::app::AppState). They carry no behavior; the map
//! surface, list and detail screens render them as-is.

use crate::domain::{Coordinate, ListingId};
use crate::trust::TrustStatus;

/// Marker appearance on the map surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    Verified,
    Unverified,
}

/// One `(coordinate, label, style)` tuple for the map surface.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    /// Returned by the surface in `MarkerTapped`.
    pub listing_id: ListingId,
    pub coordinate: Coordinate,
    pub label: String,
    pub style: MarkerStyle,
}

/// Everything the map surface needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub markers: Vec<MapMarker>,

    /// When set, the next surface tap is placement input and the surface
    /// should emit `SurfaceTapped` instead of selecting a marker.
    pub placement_mode: bool,

    pub user_position: Option<Coordinate>,

    /// The coordinate currently selected for a new listing, drawn as a pin.
    pub pending_pin: Option<Coordinate>,
}

/// Summary row in the list screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingCard {
    pub listing_id: ListingId,
    pub name: String,
    pub area: String,
    pub offerings: Vec<&'static str>,
    /// Formatted distance, `None` while the user's position is unknown.
    pub distance: Option<String>,
    pub serving_time: Option<String>,
    pub status: TrustStatus,
    pub confirmed_count: u32,
    pub disputed_count: u32,
}

/// One feedback line in the detail screen, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackEntry {
    pub is_confirmation: bool,
    pub text: Option<String>,
    pub posted: String,
}

/// Full detail for the tapped listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDetail {
    pub card: ListingCard,
    pub coordinate: String,
    pub notes: Option<String>,
    pub capacity: Option<u32>,
    pub created: String,
    pub feedback: Vec<FeedbackEntry>,
    /// Feedback buttons are disabled while a submission is in flight.
    pub feedback_enabled: bool,
}

/// Message shown when the visible list is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}
