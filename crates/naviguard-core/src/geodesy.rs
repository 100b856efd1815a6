//! Spherical geodesy for route legs: great-circle distance and initial bearing.

use crate::models::Waypoint;

/// Mean Earth radius in nautical miles.
pub const EARTH_RADIUS_NM: f64 = 3440.065;

/// Calculate distance between two points in nautical miles using the Haversine formula.
///
/// # Arguments
/// * `lat1`, `lon1` - First point coordinates in decimal degrees
/// * `lat2`, `lon2` - Second point coordinates in decimal degrees
///
/// # Returns
/// Distance in nautical miles
pub fn haversine_nm(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_NM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Calculate initial bearing (forward azimuth) from point 1 to point 2.
/// Returns degrees in `[0, 360)`, 0 = north, 90 = east.
///
/// Coincident points have no defined direction; `atan2(0, 0)` yields 0, so they
/// report due north.
pub fn bearing_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let x = delta_lambda.sin() * phi2.cos();
    let y = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    let deg = x.atan2(y).to_degrees().rem_euclid(360.0);
    // rem_euclid can round a tiny negative up to exactly 360.0
    if deg >= 360.0 {
        0.0
    } else {
        deg
    }
}

/// Great-circle distance between two waypoints in nautical miles.
pub fn distance_nm(a: &Waypoint, b: &Waypoint) -> f64 {
    haversine_nm(a.lat, a.lng, b.lat, b.lng)
}

/// Initial bearing from `a` to `b` in degrees, `[0, 360)`.
pub fn initial_bearing_deg(a: &Waypoint, b: &Waypoint) -> f64 {
    bearing_deg(a.lat, a.lng, b.lat, b.lng)
}

/// Arithmetic midpoint of two waypoints, used when splitting a leg on the chart.
pub fn midpoint(a: &Waypoint, b: &Waypoint) -> Waypoint {
    Waypoint::new((a.lat + b.lat) / 2.0, (a.lng + b.lng) / 2.0)
}
