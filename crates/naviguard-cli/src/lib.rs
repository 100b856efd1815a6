//! NaviGuard CLI - route planning and analysis from the terminal.
//!
//! This crate provides the `naviguard` binary:
//! - plan: segment table and hourly positions for a route file
//! - analyze: backend route analysis plus weather per hourly position

pub mod report;
pub mod route_file;

pub use route_file::{apply_overrides, load_route, RouteOverrides};
