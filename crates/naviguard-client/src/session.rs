//! Analysis session: one backend exchange at a time, plus the cached projection the
//! weather lookup is correlated against.
//!
//! Hourly positions are computed only when an analysis is triggered, never on route
//! edits. The positions of the last successful analysis stay cached until the next one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use naviguard_core::{
    correlate_weather, weather_query, AnalysisRequest, PositionWeather, ProjectedPosition,
    Projection, RouteError, RouteState,
};
use thiserror::Error;

use crate::client::RouteBackend;

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("no analyzed route to correlate weather with")]
    NoProjection,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Result of a guarded call.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzeOutcome<T> {
    Completed(T),
    /// Another call was still in flight; nothing was done
    Busy,
}

impl<T> AnalyzeOutcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Busy => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub request: AnalysisRequest,
    pub analysis: String,
}

pub struct AnalysisSession<B> {
    backend: B,
    in_flight: AtomicBool,
    last_projection: Mutex<Option<Projection>>,
}

/// Clears the in-flight flag when dropped, on every exit path.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<B: RouteBackend> AnalysisSession<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            in_flight: AtomicBool::new(false),
            last_projection: Mutex::new(None),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Hourly positions of the last successful analysis.
    pub fn last_hourly_positions(&self) -> Vec<ProjectedPosition> {
        self.cached_positions().unwrap_or_default()
    }

    /// Project the route, send it to the backend and cache the projection on success.
    pub async fn analyze(
        &self,
        route: &RouteState,
    ) -> Result<AnalyzeOutcome<AnalysisReport>, AnalyzeError> {
        let Some(_guard) = self.try_begin() else {
            tracing::warn!("Analysis already in progress; ignoring request");
            return Ok(AnalyzeOutcome::Busy);
        };

        let projection = route.project()?;
        let request = AnalysisRequest::build(route, &projection);
        tracing::info!(
            "Analyzing route: {} waypoints, {:.2} NM, {:.1} h, {} hourly positions",
            request.waypoints.len(),
            projection.total_distance_nm,
            projection.total_time_hours,
            projection.hourly_positions.len()
        );

        let analysis = match self.backend.analyze_route(&request).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!("Route analysis failed: {:#}", err);
                return Err(err.into());
            }
        };

        if let Ok(mut cache) = self.last_projection.lock() {
            *cache = Some(projection);
        }

        Ok(AnalyzeOutcome::Completed(AnalysisReport { request, analysis }))
    }

    /// Fetch weather for the cached hourly positions and pair each position with its
    /// sample. Positions without a sample carry `None`.
    pub async fn correlate_weather(
        &self,
    ) -> Result<AnalyzeOutcome<Vec<PositionWeather>>, AnalyzeError> {
        let Some(_guard) = self.try_begin() else {
            tracing::warn!("Analysis already in progress; ignoring weather request");
            return Ok(AnalyzeOutcome::Busy);
        };

        let positions = self.cached_positions().ok_or(AnalyzeError::NoProjection)?;

        if positions.is_empty() {
            return Ok(AnalyzeOutcome::Completed(Vec::new()));
        }

        let samples = match self.backend.fetch_weather(&weather_query(&positions)).await {
            Ok(samples) => samples,
            Err(err) => {
                tracing::warn!("Weather lookup failed: {:#}", err);
                return Err(err.into());
            }
        };

        let correlated = correlate_weather(&positions, &samples);
        let missing = correlated.iter().filter(|p| p.sample.is_none()).count();
        if missing > 0 {
            tracing::info!(
                "No weather data for {} of {} positions",
                missing,
                correlated.len()
            );
        }
        Ok(AnalyzeOutcome::Completed(correlated))
    }

    fn cached_positions(&self) -> Option<Vec<ProjectedPosition>> {
        self.last_projection
            .lock()
            .ok()?
            .as_ref()
            .map(|projection| projection.hourly_positions.clone())
    }

    fn try_begin(&self) -> Option<InFlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(&self.in_flight))
    }
}
