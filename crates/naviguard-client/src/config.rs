//! Client configuration from environment.

use std::env;

pub const DEFAULT_API_URL: &str = "https://localhost:7279";
pub const ANALYZE_ROUTE_PATH: &str = "/api/AiAssistant/analyze-route";
pub const WEATHER_COORDINATES_PATH: &str = "/api/Weather/coordinates";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_url: String,
    pub analyze_path: String,
    pub weather_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            analyze_path: ANALYZE_ROUTE_PATH.to_string(),
            weather_path: WEATHER_COORDINATES_PATH.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: env::var("NAVIGUARD_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            analyze_path: env::var("NAVIGUARD_ANALYZE_PATH")
                .unwrap_or_else(|_| ANALYZE_ROUTE_PATH.to_string()),
            weather_path: env::var("NAVIGUARD_WEATHER_PATH")
                .unwrap_or_else(|_| WEATHER_COORDINATES_PATH.to_string()),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn analyze_url(&self) -> String {
        join_url(&self.api_url, &self.analyze_path)
    }

    pub fn weather_url(&self) -> String {
        join_url(&self.api_url, &self.weather_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
