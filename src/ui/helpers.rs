//! Display formatting shared by the view model builders.

use crate::domain::{Coordinate, Offerings};
use chrono::{DateTime, Utc};

/// Formats a distance for a card or marker label.
///
/// Under one kilometre the value is shown in whole metres, otherwise in
/// kilometres with one decimal.
///
/// ```
/// use iftaar_finder::ui::helpers::format_distance;
///
/// assert_eq!(format_distance(0.85), "850m");
/// assert_eq!(format_distance(1.24), "1.2km");
/// ```
#[must_use]
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{:.0}m", (km * 1000.0).round())
    } else {
        format!("{km:.1}km")
    }
}

/// `"22.3600, 91.7800"`
#[must_use]
pub fn format_coordinate(coordinate: &Coordinate) -> String {
    format!("{:.4}, {:.4}", coordinate.latitude, coordinate.longitude)
}

/// Formats a Unix millisecond timestamp as a UTC date and time.
#[must_use]
pub fn format_timestamp(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map_or_else(|| "unknown".to_string(), |dt| dt.format("%d %b %Y, %H:%M").to_string())
}

/// Labels of the offered items, in declaration order.
#[must_use]
pub fn offering_labels(offerings: &Offerings) -> Vec<&'static str> {
    offerings.iter().map(|o| o.label()).collect()
}
