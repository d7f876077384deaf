//! Coordinates and great-circle distance.
//!
//! Distances use the haversine formula on a spherical Earth. Over a single metro
//! area the error against an ellipsoidal model is far below what a user notices
//! when walking to a listing.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Returns `true` if both components are finite and inside their ranges.
    ///
    /// ```
    /// use iftaar_finder::domain::Coordinate;
    ///
    /// assert!(Coordinate::new(22.36, 91.78).is_valid());
    /// assert!(!Coordinate::new(91.0, 0.0).is_valid());
    /// assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    /// ```
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle distance to `other` in kilometers.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        distance_km(*self, *other)
    }
}

/// Calculates the haversine distance between two coordinates in kilometers.
///
/// ```text
/// a = sin²(Δφ/2) + cos φ1 · cos φ2 · sin²(Δλ/2)
/// d = R · 2 · atan2(√a, √(1−a))
/// ```
///
/// # Examples
///
/// ```
/// use iftaar_finder::domain::{distance_km, Coordinate};
///
/// let here = Coordinate::new(22.36, 91.78);
/// assert_eq!(distance_km(here, here), 0.0);
///
/// let there = Coordinate::new(22.40, 91.80);
/// let d = distance_km(here, there);
/// assert!((d - 4.90).abs() < 0.05);
/// ```
#[must_use]
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);

    // Rounding can push h a hair outside [0, 1] for near-antipodal points.
    let h = h.clamp(0.0, 1.0);
    EARTH_RADIUS_KM * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_points_are_zero_apart() {
        for c in [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(22.3569, 91.7832),
            Coordinate::new(-33.86, 151.21),
            Coordinate::new(90.0, 180.0),
        ] {
            assert_eq!(distance_km(c, c), 0.0);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinate::new(22.36, 91.78);
        let b = Coordinate::new(23.81, 90.41);
        assert!((distance_km(a, b) - distance_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn grows_with_angular_separation() {
        let origin = Coordinate::new(22.36, 91.78);
        let mut last = 0.0;
        for step in 1..=20 {
            let p = Coordinate::new(22.36 + f64::from(step) * 0.01, 91.78);
            let d = distance_km(origin, p);
            assert!(d > last, "step {step}: {d} <= {last}");
            last = d;
        }
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = distance_km(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
        assert!((d - 111.19).abs() < 0.01, "got {d}");
    }

    #[test]
    fn antipodes_are_half_the_circumference() {
        let d = distance_km(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 180.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }
}
