//! Route state: the ordered waypoint list, per-segment speeds and speed settings.
//!
//! Every structural edit of the waypoint list runs the matching speed-store repair
//! in the same call, so `speeds.len() == max(0, waypoints.len() - 1)` holds between
//! any two operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RouteError;
use crate::geodesy::{distance_nm, initial_bearing_deg, midpoint};
use crate::models::{RouteSummary, SegmentDetail, Waypoint};
use crate::projection::{build_legs, project, Projection};
use crate::speed_policy::{parse_speed_input, SpeedInput, SpeedPolicy};
use crate::speed_store::SegmentSpeedStore;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteState {
    waypoints: Vec<Waypoint>,
    speeds: SegmentSpeedStore,
    policy: SpeedPolicy,
    start_time: Option<DateTime<Utc>>,
}

impl RouteState {
    pub fn new() -> Self {
        Self::default()
    }

    // ==== Waypoint edits ====

    pub fn add_waypoint(&mut self, waypoint: Waypoint) {
        self.waypoints.push(waypoint);
        self.speeds.on_waypoint_appended(self.waypoints.len());
        tracing::debug!(
            "Waypoint #{} added at {:.4}, {:.4}",
            self.waypoints.len(),
            waypoint.lat,
            waypoint.lng
        );
    }

    /// Move waypoint `index` in place. Segment speeds are untouched.
    pub fn move_waypoint(&mut self, index: usize, waypoint: Waypoint) -> Result<(), RouteError> {
        let len = self.waypoints.len();
        let slot = self
            .waypoints
            .get_mut(index)
            .ok_or(RouteError::WaypointOutOfRange { index, len })?;
        *slot = waypoint;
        tracing::debug!("Waypoint #{} moved", index + 1);
        Ok(())
    }

    /// Insert a waypoint so that it ends up at position `index` (`0..=len`).
    pub fn insert_waypoint(&mut self, index: usize, waypoint: Waypoint) -> Result<(), RouteError> {
        let len = self.waypoints.len();
        if index > len {
            return Err(RouteError::WaypointOutOfRange { index, len });
        }
        self.waypoints.insert(index, waypoint);
        self.speeds.on_waypoint_inserted(index, self.waypoints.len());
        tracing::debug!("Waypoint #{} inserted", index + 1);
        Ok(())
    }

    /// Split segment `segment_index` at its midpoint. Both halves keep the leg's speed.
    pub fn split_segment(&mut self, segment_index: usize) -> Result<Waypoint, RouteError> {
        let (from, to) = self.segment_endpoints(segment_index)?;
        let mid = midpoint(&from, &to);
        self.insert_waypoint(segment_index + 1, mid)?;
        Ok(mid)
    }

    pub fn remove_waypoint(&mut self, index: usize) -> Result<Waypoint, RouteError> {
        let len = self.waypoints.len();
        if index >= len {
            return Err(RouteError::WaypointOutOfRange { index, len });
        }
        let removed = self.waypoints.remove(index);
        self.speeds.on_waypoint_removed(index, len);
        tracing::debug!("Waypoint #{} removed", index + 1);
        Ok(removed)
    }

    pub fn clear_all(&mut self) {
        self.waypoints.clear();
        self.speeds.on_clear();
        tracing::debug!("All waypoints cleared");
    }

    // ==== Speed settings ====

    /// Set or clear the user speed of one segment. Negative or non-finite values are
    /// rejected and the previous value is kept.
    pub fn set_segment_speed(
        &mut self,
        segment_index: usize,
        speed_kn: Option<f64>,
    ) -> Result<(), RouteError> {
        if let Some(speed) = speed_kn {
            validate_speed(speed)?;
        }
        self.speeds.set(segment_index, speed_kn)
    }

    /// Apply raw text from a speed field to one segment.
    pub fn apply_segment_speed_input(
        &mut self,
        segment_index: usize,
        raw: &str,
    ) -> Result<(), RouteError> {
        match parse_speed_input(raw) {
            SpeedInput::Unset => self.set_segment_speed(segment_index, None),
            SpeedInput::Value(speed) => self.set_segment_speed(segment_index, Some(speed)),
            SpeedInput::Rejected(speed) => {
                tracing::warn!(
                    "Ignoring negative speed {} for segment {}",
                    speed,
                    segment_index + 1
                );
                Ok(())
            }
        }
    }

    pub fn set_default_speed(&mut self, speed_kn: f64) -> Result<(), RouteError> {
        validate_speed(speed_kn)?;
        self.policy.default_speed_kn = speed_kn;
        Ok(())
    }

    /// Apply raw text from the default speed field. Empty, non-numeric or negative
    /// input leaves the default unchanged.
    pub fn apply_default_speed_input(&mut self, raw: &str) {
        match parse_speed_input(raw) {
            SpeedInput::Value(speed) => self.policy.default_speed_kn = speed,
            SpeedInput::Unset => {}
            SpeedInput::Rejected(speed) => {
                tracing::warn!("Ignoring negative default speed {}", speed);
            }
        }
    }

    pub fn set_use_default_speed(&mut self, enabled: bool) {
        self.policy.use_default_for_all = enabled;
    }

    pub fn set_start_time(&mut self, start_time: Option<DateTime<Utc>>) {
        self.start_time = start_time;
    }

    // ==== Queries ====

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn segment_speeds(&self) -> &SegmentSpeedStore {
        &self.speeds
    }

    pub fn policy(&self) -> &SpeedPolicy {
        &self.policy
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    pub fn segment_count(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    /// Winning speed for every segment, never empty entries.
    pub fn resolved_speeds(&self) -> Vec<f64> {
        self.policy.resolve_all(self.segment_count(), &self.speeds)
    }

    pub fn total_distance_nm(&self) -> f64 {
        self.waypoints
            .windows(2)
            .map(|pair| distance_nm(&pair[0], &pair[1]))
            .sum()
    }

    pub fn estimated_time_hours(&self) -> f64 {
        build_legs(&self.waypoints, &self.resolved_speeds())
            .iter()
            .map(|leg| leg.duration_hours)
            .sum()
    }

    pub fn segment_details(&self) -> Vec<SegmentDetail> {
        build_legs(&self.waypoints, &self.resolved_speeds())
            .into_iter()
            .enumerate()
            .map(|(index, leg)| SegmentDetail {
                index,
                distance_nm: leg.distance_nm,
                heading_deg: initial_bearing_deg(&leg.from, &leg.to),
                speed_kn: leg.speed_kn,
                duration_hours: (leg.speed_kn > 0.0).then_some(leg.duration_hours),
            })
            .collect()
    }

    pub fn summary(&self) -> RouteSummary {
        RouteSummary {
            waypoint_count: self.waypoints.len(),
            segment_count: self.segment_count(),
            total_distance_nm: self.total_distance_nm(),
            estimated_time_hours: self.estimated_time_hours(),
        }
    }

    /// Run the projection engine on the current state. Refused below two waypoints.
    pub fn project(&self) -> Result<Projection, RouteError> {
        if self.waypoints.len() < 2 {
            return Err(RouteError::TooFewWaypoints(self.waypoints.len()));
        }
        Ok(project(
            &self.waypoints,
            &self.resolved_speeds(),
            self.start_time,
        ))
    }

    fn segment_endpoints(&self, segment_index: usize) -> Result<(Waypoint, Waypoint), RouteError> {
        match (
            self.waypoints.get(segment_index),
            self.waypoints.get(segment_index + 1),
        ) {
            (Some(from), Some(to)) => Ok((*from, *to)),
            _ => Err(RouteError::SegmentOutOfRange {
                index: segment_index,
                len: self.segment_count(),
            }),
        }
    }
}

fn validate_speed(speed_kn: f64) -> Result<(), RouteError> {
    if !speed_kn.is_finite() {
        return Err(RouteError::InvalidSpeed(speed_kn));
    }
    if speed_kn < 0.0 {
        return Err(RouteError::NegativeSpeed(speed_kn));
    }
    Ok(())
}

/// JSON route input: what a user drew on the chart plus the speed panel settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDocument {
    pub waypoints: Vec<Waypoint>,
    #[serde(default)]
    pub segment_speeds: Vec<Option<f64>>,
    #[serde(default)]
    pub use_default_speed: bool,
    #[serde(default)]
    pub default_speed: Option<f64>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
}

impl RouteDocument {
    /// Rebuild a route through the regular edit operations. Speeds beyond the last
    /// segment are ignored; invalid speeds are skipped with a warning, leaving the
    /// segment unset and the default speed at its prior value.
    pub fn into_route(self) -> RouteState {
        let mut route = RouteState::new();
        for waypoint in self.waypoints {
            route.add_waypoint(waypoint);
        }
        let segment_count = route.segment_count();
        for (index, speed) in self.segment_speeds.into_iter().enumerate().take(segment_count) {
            if let Err(err) = route.set_segment_speed(index, speed) {
                tracing::warn!("Ignoring speed for segment {}: {}", index + 1, err);
            }
        }
        if let Some(default_speed) = self.default_speed {
            if let Err(err) = route.set_default_speed(default_speed) {
                tracing::warn!("Ignoring default speed: {}", err);
            }
        }
        route.set_use_default_speed(self.use_default_speed);
        route.set_start_time(self.start_time);
        route
    }
}

impl From<&RouteState> for RouteDocument {
    fn from(route: &RouteState) -> Self {
        Self {
            waypoints: route.waypoints.clone(),
            segment_speeds: route.speeds.entries().to_vec(),
            use_default_speed: route.policy.use_default_for_all,
            default_speed: Some(route.policy.default_speed_kn),
            start_time: route.start_time,
        }
    }
}
