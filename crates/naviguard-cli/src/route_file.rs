//! Loading route documents and applying command-line overrides.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use naviguard_core::{RouteDocument, RouteState};

/// Settings given on the command line that win over the route document.
#[derive(Debug, Clone, Default)]
pub struct RouteOverrides {
    pub start: Option<DateTime<Utc>>,
    /// Raw default speed text
    pub default_speed: Option<String>,
    pub uniform_speed: bool,
    /// `SEGMENT=KNOTS` pairs, segment numbers 1-based
    pub segment_speeds: Vec<String>,
}

pub fn load_route(path: &Path) -> Result<RouteState> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read route file {}", path.display()))?;
    parse_route(&text).with_context(|| format!("invalid route file {}", path.display()))
}

pub fn parse_route(text: &str) -> Result<RouteState> {
    let document: RouteDocument = serde_json::from_str(text)?;
    Ok(document.into_route())
}

pub fn apply_overrides(route: &mut RouteState, overrides: &RouteOverrides) -> Result<()> {
    if let Some(start) = overrides.start {
        route.set_start_time(Some(start));
    }
    if let Some(raw) = overrides.default_speed.as_deref() {
        route.apply_default_speed_input(raw);
    }
    if overrides.uniform_speed {
        route.set_use_default_speed(true);
    }
    for pair in &overrides.segment_speeds {
        let (segment, raw) = parse_segment_speed(pair)?;
        route
            .apply_segment_speed_input(segment, raw)
            .with_context(|| format!("cannot apply speed override {pair:?}"))?;
    }
    Ok(())
}

/// Split `N=KNOTS` into a 0-based segment index and the raw speed text.
pub fn parse_segment_speed(pair: &str) -> Result<(usize, &str)> {
    let (segment, raw) = pair
        .split_once('=')
        .with_context(|| format!("expected SEGMENT=KNOTS, got {pair:?}"))?;
    let number: usize = segment
        .trim()
        .parse()
        .with_context(|| format!("invalid segment number in {pair:?}"))?;
    if number == 0 {
        anyhow::bail!("segment numbers start at 1, got {pair:?}");
    }
    Ok((number - 1, raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUTE: &str = r#"{
        "waypoints": [
            {"lat": 40.98, "lng": 28.85},
            {"lat": 40.60, "lng": 27.10},
            {"lat": 40.05, "lng": 26.20}
        ],
        "segmentSpeeds": [14, null],
        "defaultSpeed": 10
    }"#;

    #[test]
    fn parses_document() {
        let route = parse_route(ROUTE).unwrap();
        assert_eq!(route.waypoints().len(), 3);
        assert_eq!(route.resolved_speeds(), vec![14.0, 12.0]);
        assert_eq!(route.policy().default_speed_kn, 10.0);
    }

    #[test]
    fn overrides_win_over_document() {
        let mut route = parse_route(ROUTE).unwrap();
        let overrides = RouteOverrides {
            start: Some("2025-06-01T08:00:00Z".parse().unwrap()),
            default_speed: Some("8".to_string()),
            uniform_speed: false,
            segment_speeds: vec!["2=16".to_string(), "1=".to_string()],
        };
        apply_overrides(&mut route, &overrides).unwrap();

        assert_eq!(route.resolved_speeds(), vec![12.0, 16.0]);
        assert_eq!(route.policy().default_speed_kn, 8.0);
        assert!(route.start_time().is_some());
    }

    #[test]
    fn bad_segment_pairs_are_errors() {
        assert!(parse_segment_speed("15").is_err());
        assert!(parse_segment_speed("0=15").is_err());
        assert!(parse_segment_speed("x=15").is_err());
        assert_eq!(parse_segment_speed("3=-2").unwrap(), (2, "-2"));

        let mut route = parse_route(ROUTE).unwrap();
        let overrides = RouteOverrides {
            segment_speeds: vec!["5=10".to_string()],
            ..Default::default()
        };
        assert!(apply_overrides(&mut route, &overrides).is_err());
    }

    #[test]
    fn negative_override_keeps_document_speed() {
        let mut route = parse_route(ROUTE).unwrap();
        let overrides = RouteOverrides {
            segment_speeds: vec!["1=-5".to_string()],
            ..Default::default()
        };
        apply_overrides(&mut route, &overrides).unwrap();
        assert_eq!(route.segment_speeds().get(0), Some(14.0));
    }
}
