//! Track termination analysis - loads archived monthly detection logs,
//! rebuilds per-aircraft daily tracks and reports likely landings and
//! takeoffs.
//!
//! Usage:
//!   cargo run -p skywatch-cli --bin analyze -- --month 2025-07

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skywatch_cli::report::render_report;
use skywatch_cli::store::MonthlyLog;
use skywatch_core::classify::{classify_track, ClassifierConfig};
use skywatch_core::geo::{DistanceMetric, FlatEarth, GreatCircle, LatLon};
use skywatch_core::models::Detection;
use skywatch_core::track::build_tracks;

/// Offline landing/takeoff analyzer
#[derive(Parser, Debug)]
#[command(author, version, about = "Classify landings and takeoffs from archived detections")]
struct Args {
    /// Directory holding the monthly JSON logs
    #[arg(long, default_value = "historical_data")]
    data_dir: PathBuf,

    /// Month to analyze, YYYY-MM (repeatable)
    #[arg(long = "month", required = true)]
    months: Vec<String>,

    /// Airport latitude
    #[arg(long, default_value_t = 25.8575)]
    lat: f64,

    /// Airport longitude
    #[arg(long, default_value_t = -80.8969)]
    lon: f64,

    /// Ring treated as "at the airport", in degrees
    #[arg(long, default_value_t = 0.02)]
    near_zone_deg: f64,

    /// Boundary distance for HIGH confidence, in degrees
    #[arg(long, default_value_t = 0.01)]
    high_confidence_deg: f64,

    /// Boundary altitude ceiling in meters
    #[arg(long, default_value_t = 500.0)]
    low_altitude_m: f64,

    /// Use great-circle distances instead of flat-earth offsets
    #[arg(long)]
    great_circle: bool,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("analyze=info".parse()?))
        .init();

    let args = Args::parse();

    let log = MonthlyLog::new(&args.data_dir);
    let mut detections: Vec<Detection> = Vec::new();
    for month in &args.months {
        let batch: Vec<Detection> = log.load("detections", month)?;
        if batch.is_empty() {
            tracing::warn!(%month, "no detections for month");
        } else {
            tracing::info!(%month, count = batch.len(), "loaded detections");
        }
        detections.extend(batch);
    }
    detections.sort_by_key(|d| d.timestamp);

    let airport = LatLon { lat: args.lat, lon: args.lon };
    let flat = FlatEarth;
    let great = GreatCircle;
    let metric: &dyn DistanceMetric = if args.great_circle { &great } else { &flat };

    let config = ClassifierConfig {
        near_zone_deg: args.near_zone_deg,
        high_confidence_deg: args.high_confidence_deg,
        low_altitude_m: args.low_altitude_m,
    };

    let tracks = build_tracks(&detections, airport, metric);
    tracing::info!(tracks = tracks.len(), detections = detections.len(), "tracks built");

    let events: Vec<_> = tracks
        .iter()
        .flat_map(|t| classify_track(t, &config))
        .collect();

    print!("{}", render_report(&events));

    Ok(())
}
