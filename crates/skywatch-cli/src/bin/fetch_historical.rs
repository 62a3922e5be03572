//! Historical backfill - pulls archived state vectors from the OpenSky Trino
//! warehouse, one hour partition at a time, and appends them to the monthly
//! detection logs for later analysis.
//!
//! Usage:
//!   cargo run -p skywatch-cli --bin fetch_historical -- \
//!     --start 2025-07-01 --end 2025-07-31 --user myuser

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skywatch_cli::store::MonthlyLog;
use skywatch_core::geo::{bounding_box, LatLon};
use skywatch_core::models::Detection;
use skywatch_core::rules::MonitorRules;
use skywatch_opensky::{hour_range, TrinoClient};

/// Historical state-vector fetcher
#[derive(Parser, Debug)]
#[command(author, version, about = "Backfill aircraft detections from the OpenSky archive")]
struct Args {
    /// First day to fetch (YYYY-MM-DD, UTC)
    #[arg(long)]
    start: NaiveDate,

    /// Last day to fetch, inclusive (YYYY-MM-DD, UTC)
    #[arg(long)]
    end: NaiveDate,

    /// Airport latitude
    #[arg(long, default_value_t = 25.8575)]
    lat: f64,

    /// Airport longitude
    #[arg(long, default_value_t = -80.8969)]
    lon: f64,

    /// Monitoring radius in kilometers
    #[arg(long, default_value_t = 10.0)]
    radius_km: f64,

    /// Only keep samples below this barometric altitude in meters
    #[arg(long, default_value_t = 500.0)]
    max_altitude_m: f64,

    /// Trino endpoint base URL
    #[arg(long, default_value = "https://trino.opensky-network.org")]
    trino_url: String,

    /// OpenSky account username
    #[arg(long)]
    user: String,

    /// Bearer token for the Trino endpoint
    #[arg(long)]
    token: Option<String>,

    /// Directory for monthly JSON logs
    #[arg(long, default_value = "historical_data")]
    data_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("fetch_historical=info".parse()?))
        .init();

    let args = Args::parse();

    let airport = LatLon { lat: args.lat, lon: args.lon };
    let rules = MonitorRules {
        airport,
        radius_km: args.radius_km,
        ..MonitorRules::default()
    };
    let bbox = bounding_box(airport, args.radius_km);

    let start = args
        .start
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time")
        .and_utc();
    let end = args
        .end
        .and_hms_opt(23, 0, 0)
        .expect("23:00 is a valid time")
        .and_utc();
    let hours = hour_range(start, end);
    tracing::info!(hours = hours.len(), start = %args.start, end = %args.end, "fetching archive");

    let client = TrinoClient::new(args.trino_url, args.user, args.token);

    let mut detections: Vec<Detection> = Vec::new();
    for (i, hour) in hours.iter().enumerate() {
        match client.fetch_hour(*hour, &bbox, args.max_altitude_m).await {
            Ok(samples) => {
                if !samples.is_empty() {
                    tracing::info!(hour, samples = samples.len(), "hour fetched");
                }
                detections.extend(samples.iter().map(|s| Detection::from_sample(s, &rules)));
            }
            Err(err) => {
                tracing::warn!(hour, error = %err, "hour skipped");
            }
        }
        if (i + 1) % 24 == 0 {
            tracing::info!(done = i + 1, total = hours.len(), "progress");
        }
    }

    // All samples of a run are keyed to the start month so one analysis pass
    // can load them together.
    let log = MonthlyLog::new(&args.data_dir);
    let month = MonthlyLog::month_key(start);
    log.append("detections", &month, &detections)?;

    println!(
        "Fetched {} detections across {} hours into {}",
        detections.len(),
        hours.len(),
        args.data_dir.display()
    );

    Ok(())
}
