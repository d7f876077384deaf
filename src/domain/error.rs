//! Error types for the iftaar finder engine.
//!
//! This module defines the centralized error type [`FinderError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! The taxonomy has three surfaced families:
//!
//! - **Validation**: rejected locally before any store access, never retried.
//! - **Storage**: any persistence failure, reported as a failed operation.
//! - **Location**: the device could not produce a coordinate. Callers treat this
//!   as "no coordinate", which is a normal state for ranking.
//!
//! A lost update on a feedback counter has no variant; it is a bounded
//! data-quality gap, not an error.

use crate::domain::listing::ListingId;
use std::time::Duration;
use thiserror::Error;

/// The main error type for engine operations.
///
/// # Examples
///
/// ```
/// use iftaar_finder::domain::{FinderError, ValidationError};
///
/// let err: FinderError = ValidationError::EmptyName.into();
/// assert!(err.is_validation());
/// ```
#[derive(Debug, Error)]
pub enum FinderError {
    /// Input was rejected before reaching the store.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Storage operation failed.
    ///
    /// The string contains a description of what went wrong.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A counter or lookup referenced a listing the store does not hold.
    #[error("Listing not found: {0}")]
    ListingNotFound(ListingId),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding of store contents failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The device location could not be determined.
    #[error("Location error: {0}")]
    Location(#[from] LocationError),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FinderError {
    /// Returns `true` for errors raised by local input validation.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns `true` for failures that came from the persistent store.
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::Storage(_) | Self::ListingNotFound(_) | Self::Io(_) | Self::Serialization(_)
        )
    }
}

/// Reasons a listing draft or feedback request was rejected locally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The listing name was empty after trimming.
    #[error("listing name is required")]
    EmptyName,

    /// The area / neighborhood was empty after trimming.
    #[error("listing area is required")]
    EmptyArea,

    /// Neither a dropped pin nor a device location was selected.
    #[error("select a location on the map or use your current location")]
    MissingCoordinate,

    /// The coordinate was outside the valid latitude/longitude range.
    #[error("coordinate out of range: ({latitude}, {longitude})")]
    InvalidCoordinate {
        /// Rejected latitude in degrees.
        latitude: String,
        /// Rejected longitude in degrees.
        longitude: String,
    },

    /// Capacity estimates must be positive when supplied.
    #[error("capacity must be a positive number of servings")]
    InvalidCapacity,

    /// Feedback was submitted without a target listing.
    #[error("feedback requires a listing id")]
    MissingListingId,
}

/// Failures reported by a device location provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// The platform offers no location capability.
    #[error("geolocation not supported")]
    Unsupported,

    /// The user declined the location permission prompt.
    #[error("location permission denied")]
    PermissionDenied,

    /// The provider answered but could not produce a fix.
    #[error("location unavailable: {0}")]
    Unavailable(String),

    /// No answer arrived within the bounded wait.
    #[error("location request timed out after {0:?}")]
    Timeout(Duration),
}

/// A specialized `Result` type for engine operations.
pub type Result<T> = std::result::Result<T, FinderError>;
