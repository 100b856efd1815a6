//! HTTP client for the route analysis and weather backend.

use std::future::Future;

use anyhow::{Context, Result};
use naviguard_core::{AnalysisRequest, WeatherQueryPoint, WeatherSample};
use reqwest::Client;
use serde::Deserialize;

use crate::config::ClientConfig;

/// The request/response boundary the analysis session talks to.
pub trait RouteBackend {
    /// Submit a route and return the free-form analysis text.
    fn analyze_route(&self, request: &AnalysisRequest) -> impl Future<Output = Result<String>>;

    /// Look up weather for a set of timed positions.
    fn fetch_weather(
        &self,
        points: &[WeatherQueryPoint],
    ) -> impl Future<Output = Result<Vec<WeatherSample>>>;
}

/// Client for the analysis backend. No retry, no timeout.
pub struct AnalysisClient {
    pub(crate) config: ClientConfig,
    pub(crate) client: Client,
}

#[derive(Debug, Deserialize)]
struct AnalysisReply {
    #[serde(alias = "result", alias = "text")]
    analysis: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WeatherReply {
    List(Vec<WeatherSample>),
    Wrapped { data: Vec<WeatherSample> },
}

impl AnalysisClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl RouteBackend for AnalysisClient {
    async fn analyze_route(&self, request: &AnalysisRequest) -> Result<String> {
        let url = self.config.analyze_url();
        tracing::debug!(
            "Posting route with {} waypoints to {}",
            request.waypoints.len(),
            url
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .with_context(|| format!("analysis request to {url} failed"))?;

        if !response.status().is_success() {
            anyhow::bail!("Route analysis failed: {}", response.status());
        }

        let body = response
            .text()
            .await
            .context("failed to read analysis response")?;
        Ok(analysis_text(&body))
    }

    async fn fetch_weather(&self, points: &[WeatherQueryPoint]) -> Result<Vec<WeatherSample>> {
        let url = self.config.weather_url();
        tracing::debug!("Requesting weather for {} positions from {}", points.len(), url);

        let response = self
            .client
            .post(&url)
            .json(points)
            .send()
            .await
            .with_context(|| format!("weather request to {url} failed"))?;

        if !response.status().is_success() {
            anyhow::bail!("Weather lookup failed: {}", response.status());
        }

        let body = response
            .text()
            .await
            .context("failed to read weather response")?;
        parse_weather(&body)
    }
}

/// The backend answers either with `{"analysis": "..."}` or with plain text.
fn analysis_text(body: &str) -> String {
    match serde_json::from_str::<AnalysisReply>(body) {
        Ok(reply) => reply.analysis,
        Err(_) => body.to_string(),
    }
}

fn parse_weather(body: &str) -> Result<Vec<WeatherSample>> {
    let reply: WeatherReply =
        serde_json::from_str(body).context("weather response is not a sample list")?;
    Ok(match reply {
        WeatherReply::List(samples) | WeatherReply::Wrapped { data: samples } => samples,
    })
}
