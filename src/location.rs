//! Device location.
//!
//! The engine never talks to GPS hardware itself. A host supplies a
//! [`LocationProvider`]; [`LocationService`] adds the bounded wait so that a
//! provider that never answers turns into a [`LocationError::Timeout`] instead
//! of a hung request.

use crate::domain::{Coordinate, LocationError};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Default upper bound on a single location request.
pub const DEFAULT_LOCATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Options forwarded to the provider on each request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationOptions {
    /// Prefer a precise fix over a fast, coarse one.
    pub high_accuracy: bool,
    /// Give up after this long.
    pub timeout: Duration,
}

impl Default for LocationOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: DEFAULT_LOCATION_TIMEOUT,
        }
    }
}

/// A single-shot source of the device's position.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Returns one best-effort coordinate.
    ///
    /// # Errors
    ///
    /// Returns a [`LocationError`] when the platform is unsupported, the user
    /// denied permission, or no fix could be obtained.
    async fn current_coordinate(&self, options: &LocationOptions) -> Result<Coordinate, LocationError>;
}

/// Provider that always answers with the same outcome.
///
/// Handy for desktop hosts with a configured home position, and for tests.
#[derive(Debug, Clone)]
pub struct StaticLocation(Result<Coordinate, LocationError>);

impl StaticLocation {
    #[must_use]
    pub const fn at(coordinate: Coordinate) -> Self {
        Self(Ok(coordinate))
    }

    #[must_use]
    pub const fn failing(error: LocationError) -> Self {
        Self(Err(error))
    }
}

#[async_trait]
impl LocationProvider for StaticLocation {
    async fn current_coordinate(&self, _options: &LocationOptions) -> Result<Coordinate, LocationError> {
        self.0.clone()
    }
}

/// Bounded-wait wrapper around a [`LocationProvider`].
#[derive(Clone)]
pub struct LocationService {
    provider: Arc<dyn LocationProvider>,
    options: LocationOptions,
}

impl std::fmt::Debug for LocationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationService")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl LocationService {
    #[must_use]
    pub fn new(provider: Arc<dyn LocationProvider>, options: LocationOptions) -> Self {
        Self { provider, options }
    }

    #[must_use]
    pub const fn options(&self) -> &LocationOptions {
        &self.options
    }

    /// Requests a fresh coordinate.
    ///
    /// # Errors
    ///
    /// Returns the provider's error, [`LocationError::Timeout`] if it did not
    /// answer within the configured wait, or
    /// [`LocationError::Unavailable`] if it produced an out-of-range fix.
    pub async fn locate(&self) -> Result<Coordinate, LocationError> {
        let timeout = self.options.timeout;
        let outcome = tokio::time::timeout(timeout, self.provider.current_coordinate(&self.options))
            .await
            .map_err(|_| LocationError::Timeout(timeout))
            .and_then(|result| result);

        match &outcome {
            Ok(c) if !c.is_valid() => {
                tracing::warn!(latitude = c.latitude, longitude = c.longitude, "provider returned invalid coordinate");
                return Err(LocationError::Unavailable("invalid coordinate from provider".to_string()));
            }
            Ok(c) => tracing::debug!(latitude = c.latitude, longitude = c.longitude, "location resolved"),
            Err(e) => tracing::warn!(error = %e, "location request failed"),
        }

        outcome
    }
}
