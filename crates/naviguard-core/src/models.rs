//! Core data models for route planning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A route vertex. Its position in the route is its identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub lat: f64,
    pub lng: f64,
}

impl Waypoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Interpolated vessel position at a whole-hour offset from departure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPosition {
    /// Hours since departure, starting at 1
    pub hour: u32,
    pub timestamp: DateTime<Utc>,
    pub lat: f64,
    pub lng: f64,
    /// Distance covered since departure (nautical miles)
    pub cumulative_distance_nm: f64,
}

/// Per-leg figures shown in the route panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentDetail {
    pub index: usize,
    pub distance_nm: f64,
    pub heading_deg: f64,
    /// Resolved speed in knots
    pub speed_kn: f64,
    /// `None` when the resolved speed is zero
    pub duration_hours: Option<f64>,
}

/// Route-level totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub waypoint_count: usize,
    pub segment_count: usize,
    pub total_distance_nm: f64,
    pub estimated_time_hours: f64,
}
