//! Hourly position projection along a piecewise-speed route.
//!
//! The engine is stateless: callers pass the waypoints, the resolved speed of every
//! segment and an optional departure instant, and get back totals plus one
//! interpolated position per whole hour after departure. All instants are UTC.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::geodesy::distance_nm;
use crate::models::{ProjectedPosition, Waypoint};
use crate::speed_policy::FALLBACK_SPEED_KN;

/// Absorbs floating error when the sampled hour lands on the arrival time.
const ARRIVAL_EPSILON_HOURS: f64 = 1e-9;

/// One leg with its timing resolved. `start_*` fields hold the route state at the
/// moment the leg begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedLeg {
    pub from: Waypoint,
    pub to: Waypoint,
    pub distance_nm: f64,
    pub speed_kn: f64,
    /// Zero when `speed_kn` is zero
    pub duration_hours: f64,
    pub start_distance_nm: f64,
    pub start_time_hours: f64,
}

impl TimedLeg {
    fn covers(&self, hours: f64) -> bool {
        self.start_time_hours <= hours && hours < self.start_time_hours + self.duration_hours
    }

    fn position_at(&self, hours: f64) -> (Waypoint, f64) {
        let ratio = if self.distance_nm > 0.0 {
            (hours - self.start_time_hours) * self.speed_kn / self.distance_nm
        } else {
            0.0
        };
        let lat = self.from.lat + (self.to.lat - self.from.lat) * ratio;
        let lng = self.from.lng + (self.to.lng - self.from.lng) * ratio;
        (
            Waypoint::new(lat, lng),
            self.start_distance_nm + ratio * self.distance_nm,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub total_distance_nm: f64,
    pub total_time_hours: f64,
    pub hourly_positions: Vec<ProjectedPosition>,
}

/// Resolve distance, duration and start offsets for every leg.
///
/// `speeds[i]` is the resolved speed of segment `i`; a missing entry uses
/// [`FALLBACK_SPEED_KN`]. A leg at zero speed contributes no time.
pub fn build_legs(waypoints: &[Waypoint], speeds: &[f64]) -> Vec<TimedLeg> {
    let mut legs = Vec::with_capacity(waypoints.len().saturating_sub(1));
    let mut cumulative_distance = 0.0;
    let mut cumulative_time = 0.0;

    for (i, pair) in waypoints.windows(2).enumerate() {
        let (from, to) = (pair[0], pair[1]);
        let distance = distance_nm(&from, &to);
        let speed = speeds.get(i).copied().unwrap_or(FALLBACK_SPEED_KN);
        let duration = if speed > 0.0 { distance / speed } else { 0.0 };

        legs.push(TimedLeg {
            from,
            to,
            distance_nm: distance,
            speed_kn: speed,
            duration_hours: duration,
            start_distance_nm: cumulative_distance,
            start_time_hours: cumulative_time,
        });

        cumulative_distance += distance;
        cumulative_time += duration;
    }

    legs
}

/// Project a route. Fewer than two waypoints yield an empty projection; without a
/// start instant the totals are still computed but no hourly positions are produced.
pub fn project(
    waypoints: &[Waypoint],
    speeds: &[f64],
    start: Option<DateTime<Utc>>,
) -> Projection {
    let Some(destination) = waypoints.last().copied().filter(|_| waypoints.len() >= 2) else {
        return Projection::default();
    };

    let legs = build_legs(waypoints, speeds);
    let total_distance_nm: f64 = legs.iter().map(|leg| leg.distance_nm).sum();
    let total_time_hours: f64 = legs.iter().map(|leg| leg.duration_hours).sum();

    let hourly_positions = match start {
        Some(start) => sample_hourly(
            &legs,
            destination,
            total_distance_nm,
            total_time_hours,
            start,
        ),
        None => Vec::new(),
    };

    Projection {
        total_distance_nm,
        total_time_hours,
        hourly_positions,
    }
}

fn sample_hourly(
    legs: &[TimedLeg],
    destination: Waypoint,
    total_distance_nm: f64,
    total_time_hours: f64,
    start: DateTime<Utc>,
) -> Vec<ProjectedPosition> {
    if !total_time_hours.is_finite() || total_time_hours < 0.0 {
        tracing::warn!(
            "Cannot sample route with total time {} h; skipping hourly positions",
            total_time_hours
        );
        return Vec::new();
    }

    let last_hour = (total_time_hours.ceil() as u32).saturating_add(1);
    let mut positions = Vec::new();

    for hour in 1..=last_hour {
        let t = f64::from(hour);
        let Some(timestamp) = start.checked_add_signed(Duration::hours(i64::from(hour))) else {
            tracing::warn!(
                "Hour {} after {} is past the representable range; stopping hourly sampling",
                hour,
                start
            );
            break;
        };

        if t + ARRIVAL_EPSILON_HOURS >= total_time_hours {
            positions.push(ProjectedPosition {
                hour,
                timestamp,
                lat: destination.lat,
                lng: destination.lng,
                cumulative_distance_nm: total_distance_nm,
            });
            break;
        }

        // Only reachable when the leg timeline has a hole in it.
        let Some(leg) = legs.iter().find(|leg| leg.covers(t)) else {
            tracing::warn!(
                "No leg covers hour {} of {:.2}; stopping hourly sampling",
                hour,
                total_time_hours
            );
            break;
        };

        let (position, cumulative_distance_nm) = leg.position_at(t);
        positions.push(ProjectedPosition {
            hour,
            timestamp,
            lat: position.lat,
            lng: position.lng,
            cumulative_distance_nm,
        });
    }

    positions
}
