//! Error types for route editing.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    #[error("waypoint index {index} out of range for route with {len} waypoints")]
    WaypointOutOfRange { index: usize, len: usize },

    #[error("segment index {index} out of range for route with {len} segments")]
    SegmentOutOfRange { index: usize, len: usize },

    #[error("speed must not be negative (got {0} kn)")]
    NegativeSpeed(f64),

    #[error("speed must be a finite number (got {0})")]
    InvalidSpeed(f64),

    #[error("at least 2 waypoints are required, route has {0}")]
    TooFewWaypoints(usize),
}
