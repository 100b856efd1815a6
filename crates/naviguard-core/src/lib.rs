//! NaviGuard core - route segmentation and hourly projection for maritime routes.

pub mod error;
pub mod geodesy;
pub mod models;
pub mod payload;
pub mod projection;
pub mod route;
pub mod speed_policy;
pub mod speed_store;
pub mod weather;

pub use error::RouteError;
pub use geodesy::{distance_nm, initial_bearing_deg, EARTH_RADIUS_NM};
pub use models::{ProjectedPosition, RouteSummary, SegmentDetail, Waypoint};
pub use payload::{AnalysisRequest, HourlyPositionPayload, SegmentPayload};
pub use projection::{project, Projection};
pub use route::{RouteDocument, RouteState};
pub use speed_policy::{
    parse_speed_input, resolve_speed, SpeedInput, SpeedPolicy, FALLBACK_SPEED_KN,
};
pub use speed_store::SegmentSpeedStore;
pub use weather::{
    correlate_weather, weather_query, PositionWeather, WeatherQueryPoint, WeatherSample,
};
