//! Domain layer for the iftaar finder.
//!
//! This module contains the core domain types, independent of any storage or
//! presentation concerns.
//!
//! # Organization
//!
//! - [`error`]: Error taxonomy and result alias
//! - [`geo`]: Coordinates and haversine distance
//! - [`listing`]: Listing model, draft input, identifiers
//! - [`feedback`]: Feedback model and comment capture rules
//!
//! # Examples
//!
//! ```
//! use iftaar_finder::domain::{distance_km, Coordinate, ListingDraft};
//!
//! let draft = ListingDraft::new("Baitul Aman", "Agrabad").at(Coordinate::new(22.33, 91.81));
//! assert!(draft.coordinate.is_some());
//! ```

pub mod error;
pub mod feedback;
pub mod geo;
pub mod listing;

pub use error::{FinderError, LocationError, Result, ValidationError};
pub use feedback::{Feedback, FeedbackId, NewFeedback};
pub use geo::{distance_km, Coordinate};
pub use listing::{Listing, ListingDraft, ListingId, NewListing, Offering, Offerings};
