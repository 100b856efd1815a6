//! Wire format of the route analysis request.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ProjectedPosition, Waypoint};
use crate::projection::Projection;
use crate::route::RouteState;

/// Body of the analyze-route call. Field names follow the backend's camelCase JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub waypoints: Vec<Waypoint>,
    /// Resolved speed of every segment (knots)
    pub segment_speeds: Vec<f64>,
    pub total_distance: f64,
    pub estimated_time: f64,
    pub segments: Vec<SegmentPayload>,
    pub hourly_positions: Vec<HourlyPositionPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentPayload {
    /// 1-based, as shown to the user
    pub segment_number: usize,
    pub from_waypoint: usize,
    pub to_waypoint: usize,
    pub distance: f64,
    pub speed: f64,
    /// Whole degrees
    pub heading: i64,
    /// `null` for a zero-speed segment
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyPositionPayload {
    pub latitude: f64,
    pub longitude: f64,
    /// ISO-8601 UTC, millisecond precision
    pub timestamp: String,
    pub hour: u32,
    pub distance: f64,
}

impl HourlyPositionPayload {
    pub fn from_position(position: &ProjectedPosition) -> Self {
        Self {
            latitude: position.lat,
            longitude: position.lng,
            timestamp: iso_timestamp(&position.timestamp),
            hour: position.hour,
            distance: position.cumulative_distance_nm,
        }
    }

    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }
}

impl AnalysisRequest {
    /// Assemble the request from the route and the projection computed for it.
    pub fn build(route: &RouteState, projection: &Projection) -> Self {
        let segment_speeds = route.resolved_speeds();
        let segments = route
            .segment_details()
            .into_iter()
            .map(|detail| SegmentPayload {
                segment_number: detail.index + 1,
                from_waypoint: detail.index + 1,
                to_waypoint: detail.index + 2,
                distance: detail.distance_nm,
                speed: detail.speed_kn,
                heading: (detail.heading_deg.round() as i64).rem_euclid(360),
                duration: detail.duration_hours,
            })
            .collect();

        Self {
            waypoints: route.waypoints().to_vec(),
            segment_speeds,
            total_distance: projection.total_distance_nm,
            estimated_time: projection.total_time_hours,
            segments,
            hourly_positions: projection
                .hourly_positions
                .iter()
                .map(HourlyPositionPayload::from_position)
                .collect(),
        }
    }
}

/// `YYYY-MM-DDTHH:MM:SS.sssZ`
pub fn iso_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
