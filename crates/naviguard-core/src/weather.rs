//! Correlation of projected positions with backend weather samples.
//!
//! Samples are matched on the UTC timestamp truncated to the minute
//! (`YYYY-MM-DDTHH:MM`) with exact string equality; there is no tolerance window.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::ProjectedPosition;
use crate::payload::iso_timestamp;

const MINUTE_KEY_LEN: usize = "YYYY-MM-DDTHH:MM".len();

/// One point of the weather lookup request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherQueryPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: String,
}

/// A weather sample as returned by the backend. Everything but the timestamp is
/// passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    pub timestamp: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A projected position and its weather, `None` when the backend had no sample
/// for that minute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionWeather {
    pub position: ProjectedPosition,
    pub sample: Option<WeatherSample>,
}

pub fn weather_query(positions: &[ProjectedPosition]) -> Vec<WeatherQueryPoint> {
    positions
        .iter()
        .map(|position| WeatherQueryPoint {
            latitude: position.lat,
            longitude: position.lng,
            timestamp: iso_timestamp(&position.timestamp),
        })
        .collect()
}

pub fn minute_key(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M").to_string()
}

/// Minute key of a backend timestamp. RFC 3339 values are normalised to UTC first;
/// anything else is truncated as-is.
pub fn sample_minute_key(raw: &str) -> Option<String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(minute_key(&ts.with_timezone(&Utc)));
    }
    raw.get(..MINUTE_KEY_LEN).map(str::to_string)
}

/// Pair each position with the first sample sharing its minute key.
pub fn correlate_weather(
    positions: &[ProjectedPosition],
    samples: &[WeatherSample],
) -> Vec<PositionWeather> {
    let mut by_minute: HashMap<String, &WeatherSample> = HashMap::new();
    for sample in samples {
        match sample_minute_key(&sample.timestamp) {
            Some(key) => {
                by_minute.entry(key).or_insert(sample);
            }
            None => {
                tracing::debug!("Skipping weather sample with timestamp {:?}", sample.timestamp)
            }
        }
    }

    positions
        .iter()
        .map(|position| PositionWeather {
            position: position.clone(),
            sample: by_minute
                .get(&minute_key(&position.timestamp))
                .map(|sample| (*sample).clone()),
        })
        .collect()
}
