//! Analysis session tests against an in-process backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use naviguard_client::{AnalysisSession, AnalyzeError, AnalyzeOutcome, RouteBackend};
use naviguard_core::{
    AnalysisRequest, RouteError, RouteState, Waypoint, WeatherQueryPoint, WeatherSample,
    EARTH_RADIUS_NM,
};
use serde_json::json;
use tokio::sync::oneshot;

#[derive(Default)]
struct FakeBackend {
    analysis: Option<String>,
    samples: Option<Vec<WeatherSample>>,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
    analyze_calls: AtomicUsize,
    weather_calls: AtomicUsize,
    last_request: Mutex<Option<AnalysisRequest>>,
}

impl FakeBackend {
    fn replying(text: &str) -> Self {
        Self {
            analysis: Some(text.to_string()),
            ..Default::default()
        }
    }

    fn failing() -> Self {
        Self::default()
    }

    fn with_weather(mut self, samples: Vec<WeatherSample>) -> Self {
        self.samples = Some(samples);
        self
    }

    fn gated(self, gate: oneshot::Receiver<()>) -> Self {
        *self.gate.lock().unwrap() = Some(gate);
        self
    }
}

impl RouteBackend for FakeBackend {
    async fn analyze_route(&self, request: &AnalysisRequest) -> anyhow::Result<String> {
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        self.analysis
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Route analysis failed: 502 Bad Gateway"))
    }

    async fn fetch_weather(
        &self,
        points: &[WeatherQueryPoint],
    ) -> anyhow::Result<Vec<WeatherSample>> {
        self.weather_calls.fetch_add(1, Ordering::SeqCst);
        assert!(!points.is_empty());
        self.samples
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Weather lookup failed: 500 Internal Server Error"))
    }
}

fn lat_span(nm: f64) -> f64 {
    (nm / EARTH_RADIUS_NM).to_degrees()
}

/// 24 NM due north at the fallback 12 kn: positions at 09:00 and 10:00 UTC.
fn two_hour_route() -> RouteState {
    let mut route = RouteState::new();
    route.add_waypoint(Waypoint::new(0.0, 0.0));
    route.add_waypoint(Waypoint::new(lat_span(24.0), 0.0));
    route.set_start_time(Some(Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()));
    route
}

fn sample(timestamp: &str, wave_height: f64) -> WeatherSample {
    serde_json::from_value(json!({"timestamp": timestamp, "waveHeight": wave_height})).unwrap()
}

#[tokio::test]
async fn analyze_sends_route_and_caches_positions() {
    let session = AnalysisSession::new(FakeBackend::replying("Fair weather"));
    let route = two_hour_route();

    let report = session.analyze(&route).await.unwrap().completed().unwrap();
    assert_eq!(report.analysis, "Fair weather");
    assert_eq!(report.request.segment_speeds, vec![12.0]);

    let sent = session.backend().last_request.lock().unwrap().clone().unwrap();
    assert_eq!(sent, report.request);

    let cached = session.last_hourly_positions();
    assert_eq!(cached.len(), 2);
    assert_eq!(cached[1].hour, 2);
    assert!(!session.is_busy());
}

#[tokio::test]
async fn second_call_while_in_flight_is_rejected() {
    let (release, gate) = oneshot::channel();
    let session = AnalysisSession::new(FakeBackend::replying("done").gated(gate));
    let route = two_hour_route();

    let (first, (second, weather)) = tokio::join!(session.analyze(&route), async {
        tokio::task::yield_now().await;
        assert!(session.is_busy());
        let second = session.analyze(&route).await;
        let weather = session.correlate_weather().await;
        let _ = release.send(());
        (second, weather)
    });

    assert!(second.unwrap().is_busy());
    assert!(weather.unwrap().is_busy());
    assert_eq!(first.unwrap().completed().unwrap().analysis, "done");
    assert_eq!(session.backend().analyze_calls.load(Ordering::SeqCst), 1);
    assert_eq!(session.backend().weather_calls.load(Ordering::SeqCst), 0);
    assert!(!session.is_busy());
}

#[tokio::test]
async fn backend_failure_releases_guard_and_keeps_cache_empty() {
    let session = AnalysisSession::new(FakeBackend::failing());
    let route = two_hour_route();

    let err = session.analyze(&route).await.unwrap_err();
    assert!(matches!(err, AnalyzeError::Backend(_)));
    assert!(err.to_string().contains("502"));
    assert!(!session.is_busy());
    assert!(session.last_hourly_positions().is_empty());

    // not stuck: the next call reaches the backend again
    assert!(session.analyze(&route).await.is_err());
    assert_eq!(session.backend().analyze_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn short_route_is_refused_locally() {
    let session = AnalysisSession::new(FakeBackend::replying("unused"));
    let mut route = RouteState::new();
    route.add_waypoint(Waypoint::new(41.0, 29.0));

    let err = session.analyze(&route).await.unwrap_err();
    assert!(matches!(err, AnalyzeError::Route(RouteError::TooFewWaypoints(1))));
    assert_eq!(session.backend().analyze_calls.load(Ordering::SeqCst), 0);
    assert!(!session.is_busy());
}

#[tokio::test]
async fn weather_needs_a_prior_analysis() {
    let session = AnalysisSession::new(FakeBackend::replying("ok").with_weather(Vec::new()));
    let err = session.correlate_weather().await.unwrap_err();
    assert!(matches!(err, AnalyzeError::NoProjection));
    assert!(!session.is_busy());
}

#[tokio::test]
async fn weather_is_matched_per_minute_with_missing_entries() {
    let backend = FakeBackend::replying("ok").with_weather(vec![
        sample("2025-06-01T09:00:00Z", 1.4),
        sample("2025-06-01T10:01:00Z", 2.0),
    ]);
    let session = AnalysisSession::new(backend);
    session.analyze(&two_hour_route()).await.unwrap();

    let correlated = session.correlate_weather().await.unwrap().completed().unwrap();
    assert_eq!(correlated.len(), 2);
    let first = correlated[0].sample.as_ref().unwrap();
    assert_eq!(first.fields["waveHeight"], json!(1.4));
    assert!(correlated[1].sample.is_none());
}

#[tokio::test]
async fn weather_failure_keeps_cached_positions() {
    let session = AnalysisSession::new(FakeBackend::replying("ok"));
    session.analyze(&two_hour_route()).await.unwrap();

    assert!(matches!(
        session.correlate_weather().await,
        Err(AnalyzeError::Backend(_))
    ));
    assert!(!session.is_busy());
    assert_eq!(session.last_hourly_positions().len(), 2);
}

#[tokio::test]
async fn route_without_start_time_skips_weather_call() {
    let session = AnalysisSession::new(FakeBackend::replying("ok").with_weather(Vec::new()));
    let mut route = two_hour_route();
    route.set_start_time(None);

    let report = session.analyze(&route).await.unwrap().completed().unwrap();
    assert!(report.request.hourly_positions.is_empty());

    let correlated = session.correlate_weather().await.unwrap();
    assert_eq!(correlated, AnalyzeOutcome::Completed(Vec::new()));
    assert_eq!(session.backend().weather_calls.load(Ordering::SeqCst), 0);
}
