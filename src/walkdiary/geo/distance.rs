//! Great-circle distance over a trail and its display formatting.

use crate::model::{TrailPoint, Unit};

/// Earth radius for the spherical approximation, in meters (WGS-84 equatorial).
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

pub const METERS_PER_KM: f64 = 1000.0;
pub const METERS_PER_MILE: f64 = 1609.34;

pub fn haversine_m(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlng = (lng2 - lng1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

/// Cumulative distance in meters along the points, in order.
/// Fewer than two points cover no distance.
pub fn distance(points: &[TrailPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| haversine_m(pair[0].lat, pair[0].lng, pair[1].lat, pair[1].lng))
        .sum()
}

/// Render a distance for display: two decimals below 10 units, one at or above.
pub fn format_distance(meters: f64, unit: Unit) -> String {
    let (value, suffix) = match unit {
        Unit::Metric => (meters / METERS_PER_KM, "km"),
        Unit::Imperial => (meters / METERS_PER_MILE, "mi"),
    };
    if value >= 10.0 {
        format!("{:.1} {}", value, suffix)
    } else {
        format!("{:.2} {}", value, suffix)
    }
}
