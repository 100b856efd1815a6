//! NaviGuard client - route analysis and weather backend integration
//!
//! Wraps the backend HTTP API and guards it so only one analysis runs at a time.

pub mod client;
pub mod config;
pub mod session;

pub use client::{AnalysisClient, RouteBackend};
pub use config::ClientConfig;
pub use session::{AnalysisReport, AnalysisSession, AnalyzeError, AnalyzeOutcome};
