//! Discovery: turning the raw listing set into what the user sees.
//!
//! - [`category`]: the single-selection category filter
//! - [`pipeline`]: distance map computation and the filter/rank pipeline

pub mod category;
pub mod pipeline;

pub use category::Category;
pub use pipeline::{compute_distances, rank_listings, sort_by_distance, DiscoveryQuery, DistanceMap};
