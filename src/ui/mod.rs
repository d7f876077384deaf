//! Presentation-facing view models.
//!
//! The crate renders nothing itself. [`viewmodel`] defines the snapshots a
//! host UI draws, and [`helpers`] formats distances, coordinates and dates for
//! them.

pub mod helpers;
pub mod viewmodel;

pub use viewmodel::{EmptyState, FeedbackEntry, ListingCard, ListingDetail, MapMarker, MapView, MarkerStyle};
