//! Plain-text rendering of route figures for the terminal.

use naviguard_core::{PositionWeather, ProjectedPosition, RouteSummary, SegmentDetail};

pub fn format_summary(summary: &RouteSummary) -> String {
    format!(
        "{} waypoints, {} segments, {:.2} NM, {:.1} h",
        summary.waypoint_count,
        summary.segment_count,
        summary.total_distance_nm,
        summary.estimated_time_hours
    )
}

pub fn format_segments(segments: &[SegmentDetail]) -> String {
    let mut out = String::from("SEG  DIST(NM)  HDG  SPEED(KN)  TIME(H)\n");
    for segment in segments {
        let duration = segment
            .duration_hours
            .map(|h| format!("{h:.2}"))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:>3}  {:>8.2}  {:03.0}  {:>9.1}  {:>7}\n",
            segment.index + 1,
            segment.distance_nm,
            segment.heading_deg.round().rem_euclid(360.0),
            segment.speed_kn,
            duration
        ));
    }
    out
}

pub fn format_positions(positions: &[ProjectedPosition]) -> String {
    let mut out = String::from("HOUR  TIME (UTC)        LAT        LNG        DIST(NM)\n");
    for position in positions {
        out.push_str(&format!(
            "{:>4}  {}  {:>9.4}  {:>9.4}  {:>8.2}\n",
            position.hour,
            position.timestamp.format("%Y-%m-%d %H:%M"),
            position.lat,
            position.lng,
            position.cumulative_distance_nm
        ));
    }
    out
}

pub fn format_weather(correlated: &[PositionWeather]) -> String {
    let mut out = String::new();
    for entry in correlated {
        let weather = match &entry.sample {
            Some(sample) if sample.fields.is_empty() => "(empty sample)".to_string(),
            Some(sample) => sample
                .fields
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect::<Vec<_>>()
                .join(" "),
            None => "no data".to_string(),
        };
        out.push_str(&format!(
            "{:>4}  {}  {}\n",
            entry.position.hour,
            entry.position.timestamp.format("%Y-%m-%d %H:%M"),
            weather
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use naviguard_core::WeatherSample;
    use serde_json::json;

    fn position(hour: u32) -> ProjectedPosition {
        ProjectedPosition {
            hour,
            timestamp: Utc.with_ymd_and_hms(2025, 6, 1, 8 + hour, 0, 0).unwrap(),
            lat: 40.5,
            lng: 27.25,
            cumulative_distance_nm: 12.0 * f64::from(hour),
        }
    }

    #[test]
    fn segment_table_marks_zero_speed() {
        let table = format_segments(&[
            SegmentDetail {
                index: 0,
                distance_nm: 36.0,
                heading_deg: 4.6,
                speed_kn: 12.0,
                duration_hours: Some(3.0),
            },
            SegmentDetail {
                index: 1,
                distance_nm: 10.0,
                heading_deg: 270.0,
                speed_kn: 0.0,
                duration_hours: None,
            },
        ]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("005"));
        assert!(lines[1].contains("3.00"));
        assert!(lines[2].trim_end().ends_with('-'));
    }

    #[test]
    fn segment_table_wraps_north_heading() {
        let table = format_segments(&[SegmentDetail {
            index: 0,
            distance_nm: 12.0,
            heading_deg: 359.7,
            speed_kn: 12.0,
            duration_hours: Some(1.0),
        }]);
        let row = table.lines().nth(1).unwrap();
        assert!(row.contains("  000  "));
        assert!(table.ends_with('\n'));
    }

    #[test]
    fn position_rows_use_utc_minutes() {
        let table = format_positions(&[position(1)]);
        assert!(table.contains("2025-06-01 09:00"));
        assert!(table.contains("12.00"));
    }

    #[test]
    fn weather_rows_show_missing_data() {
        let sample: WeatherSample =
            serde_json::from_value(json!({"timestamp": "2025-06-01T09:00", "wind": 12})).unwrap();
        let text = format_weather(&[
            PositionWeather {
                position: position(1),
                sample: Some(sample),
            },
            PositionWeather {
                position: position(2),
                sample: None,
            },
        ]);
        assert!(text.contains("wind=12"));
        assert!(text.contains("no data"));
    }
}
