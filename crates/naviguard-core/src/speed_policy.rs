//! Speed resolution rules and speed input normalization.

use serde::{Deserialize, Serialize};

use crate::speed_store::SegmentSpeedStore;

/// Speed used for a segment with no usable user value (knots).
pub const FALLBACK_SPEED_KN: f64 = 12.0;

/// Decides which speed wins for each segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedPolicy {
    /// When set, every segment uses `default_speed_kn` and stored entries are ignored
    pub use_default_for_all: bool,
    pub default_speed_kn: f64,
    pub fallback_speed_kn: f64,
}

impl Default for SpeedPolicy {
    fn default() -> Self {
        Self {
            use_default_for_all: false,
            default_speed_kn: FALLBACK_SPEED_KN,
            fallback_speed_kn: FALLBACK_SPEED_KN,
        }
    }
}

impl SpeedPolicy {
    pub fn resolve(&self, segment_index: usize, store: &SegmentSpeedStore) -> f64 {
        resolve_speed(
            segment_index,
            store,
            self.use_default_for_all,
            self.default_speed_kn,
            self.fallback_speed_kn,
        )
    }

    /// Resolved speed for each of the first `segment_count` segments.
    pub fn resolve_all(&self, segment_count: usize, store: &SegmentSpeedStore) -> Vec<f64> {
        (0..segment_count).map(|i| self.resolve(i, store)).collect()
    }
}

/// Resolve the speed for one segment.
///
/// 1. The uniform override returns `default_speed` unconditionally.
/// 2. A stored, finite, non-negative value wins next.
/// 3. Anything else falls back to `fallback`.
///
/// Zero is a legal result; the projection treats a zero-speed leg as taking no time.
pub fn resolve_speed(
    segment_index: usize,
    store: &SegmentSpeedStore,
    use_default_for_all: bool,
    default_speed: f64,
    fallback: f64,
) -> f64 {
    if use_default_for_all {
        return default_speed;
    }
    match store.get(segment_index) {
        Some(speed) if speed.is_finite() && speed >= 0.0 => speed,
        _ => fallback,
    }
}

/// Outcome of normalizing a raw speed field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpeedInput {
    /// Empty or non-numeric; the segment falls back to the policy
    Unset,
    /// Negative; the previous value must be kept
    Rejected(f64),
    Value(f64),
}

pub fn parse_speed_input(raw: &str) -> SpeedInput {
    match raw.trim().parse::<f64>() {
        Ok(value) if !value.is_finite() => SpeedInput::Unset,
        Ok(value) if value < 0.0 => SpeedInput::Rejected(value),
        Ok(value) => SpeedInput::Value(value),
        Err(_) => SpeedInput::Unset,
    }
}
