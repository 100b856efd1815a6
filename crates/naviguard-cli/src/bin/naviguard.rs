use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use naviguard_cli::report::{format_positions, format_segments, format_summary, format_weather};
use naviguard_cli::{apply_overrides, load_route, RouteOverrides};
use naviguard_client::{AnalysisClient, AnalysisSession, ClientConfig};
use naviguard_core::{AnalysisRequest, RouteState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the segment table and hourly positions of a route
    Plan {
        #[command(flatten)]
        route: RouteArgs,

        /// Print the analysis request JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Send a route to the analysis backend and fetch weather for each hourly position
    Analyze {
        #[command(flatten)]
        route: RouteArgs,

        /// Backend base URL (defaults to NAVIGUARD_API_URL)
        #[arg(long)]
        url: Option<String>,

        /// Skip the weather lookup
        #[arg(long)]
        no_weather: bool,
    },
}

#[derive(clap::Args, Debug)]
struct RouteArgs {
    /// Route document (JSON)
    route: PathBuf,

    /// Departure time, RFC 3339 (e.g. 2025-06-01T08:00:00Z)
    #[arg(long)]
    start: Option<DateTime<Utc>>,

    /// Default speed in knots
    #[arg(long)]
    default_speed: Option<String>,

    /// Use the default speed for every segment
    #[arg(long)]
    uniform: bool,

    /// Segment speed override, 1-based: --speed 2=15 (empty value clears)
    #[arg(long = "speed", value_name = "SEGMENT=KNOTS")]
    speeds: Vec<String>,
}

impl RouteArgs {
    fn load(&self) -> Result<RouteState> {
        let mut route = load_route(&self.route)?;
        apply_overrides(
            &mut route,
            &RouteOverrides {
                start: self.start,
                default_speed: self.default_speed.clone(),
                uniform_speed: self.uniform,
                segment_speeds: self.speeds.clone(),
            },
        )?;
        Ok(route)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("naviguard=info".parse()?),
        )
        .init();

    let args = Args::parse();
    match args.command {
        Command::Plan { route, json } => plan(&route.load()?, json),
        Command::Analyze {
            route,
            url,
            no_weather,
        } => analyze(&route.load()?, url, no_weather).await,
    }
}

fn plan(route: &RouteState, json: bool) -> Result<()> {
    if route.waypoints().len() < 2 {
        eprintln!("At least 2 waypoints are required");
        return Ok(());
    }
    let projection = route.project()?;

    if json {
        let request = AnalysisRequest::build(route, &projection);
        println!("{}", serde_json::to_string_pretty(&request)?);
        return Ok(());
    }

    println!("{}", format_summary(&route.summary()));
    println!();
    print!("{}", format_segments(&route.segment_details()));
    println!();
    if route.start_time().is_none() {
        println!("No departure time set; pass --start to project hourly positions.");
    } else {
        print!("{}", format_positions(&projection.hourly_positions));
    }
    Ok(())
}

async fn analyze(route: &RouteState, url: Option<String>, no_weather: bool) -> Result<()> {
    if route.waypoints().len() < 2 {
        eprintln!("At least 2 waypoints are required");
        return Ok(());
    }

    let mut config = ClientConfig::from_env();
    if let Some(url) = url {
        config = config.with_api_url(url);
    }
    let session = AnalysisSession::new(AnalysisClient::new(config));

    let Some(report) = session.analyze(route).await?.completed() else {
        return Ok(());
    };
    println!(
        "Route analysis ({} waypoints, {:.2} NM):",
        report.request.waypoints.len(),
        report.request.total_distance
    );
    println!("{}", report.analysis);

    if no_weather {
        return Ok(());
    }
    if let Some(correlated) = session.correlate_weather().await?.completed() {
        println!();
        print!("{}", format_weather(&correlated));
    }
    Ok(())
}
