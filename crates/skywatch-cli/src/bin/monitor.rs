//! Live airport monitor - polls the OpenSky REST API for aircraft near a
//! small airport, classifies proximity, evaluates alert rules, and appends
//! everything to monthly JSON logs.
//!
//! Usage:
//!   cargo run -p skywatch-cli --bin monitor

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skywatch_cli::store::MonthlyLog;
use skywatch_core::alerts::{AlertRecord, AlertRules};
use skywatch_core::geo::{bounding_box, LatLon};
use skywatch_core::models::Detection;
use skywatch_core::rules::MonitorRules;
use skywatch_opensky::OpenSkyClient;

/// Airport aircraft monitor
#[derive(Parser, Debug)]
#[command(author, version, about = "Monitor aircraft activity near a small airport")]
struct Args {
    /// Airport latitude
    #[arg(long, default_value_t = 25.8575)]
    lat: f64,

    /// Airport longitude
    #[arg(long, default_value_t = -80.8969)]
    lon: f64,

    /// Monitoring radius in kilometers
    #[arg(long, default_value_t = 10.0)]
    radius_km: f64,

    /// Directory for monthly JSON logs
    #[arg(long, default_value = "flight_data")]
    data_dir: PathBuf,

    /// OpenSky REST API base URL
    #[arg(long, default_value = "https://opensky-network.org")]
    api_url: String,

    /// OpenSky account username
    #[arg(long)]
    username: Option<String>,

    /// OpenSky account password
    #[arg(long)]
    password: Option<String>,

    /// Callsign substring to alert on (repeatable)
    #[arg(long = "watch")]
    watch: Vec<String>,

    /// icao24 prefix treated as military (repeatable)
    #[arg(long = "military-prefix", default_values_t = vec!["ae".to_string()])]
    military_prefix: Vec<String>,

    /// Local hour (0-23) when the after-hours window opens
    #[arg(long, default_value_t = 22)]
    after_hours_start: u32,

    /// Local hour (0-23) when the after-hours window closes
    #[arg(long, default_value_t = 6)]
    after_hours_end: u32,

    /// Local timezone offset from UTC in hours
    #[arg(long, default_value_t = -5)]
    utc_offset: i32,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("monitor=info".parse()?))
        .init();

    let args = Args::parse();

    let airport = LatLon { lat: args.lat, lon: args.lon };
    let rules = MonitorRules {
        airport,
        radius_km: args.radius_km,
        ..MonitorRules::default()
    };
    let alert_rules = AlertRules {
        watch_callsigns: args.watch,
        military_prefixes: args.military_prefix,
        after_hours_start: args.after_hours_start,
        after_hours_end: args.after_hours_end,
        utc_offset_hours: args.utc_offset,
    };

    let mut client = OpenSkyClient::new(args.api_url);
    if let (Some(user), Some(pass)) = (args.username, args.password) {
        client = client.with_credentials(user, pass);
    }

    let bbox = bounding_box(airport, rules.radius_km);
    tracing::info!(
        lat = airport.lat,
        lon = airport.lon,
        radius_km = rules.radius_km,
        "polling OpenSky"
    );

    // A failed poll logs an empty cycle rather than aborting the monitor.
    let samples = match client.fetch_states(&bbox).await {
        Ok(samples) => samples,
        Err(err) => {
            tracing::warn!(error = %err, "OpenSky fetch failed");
            Vec::new()
        }
    };

    let now = Utc::now();
    let detections: Vec<Detection> = samples
        .iter()
        .map(|s| Detection::from_sample(s, &rules))
        .collect();

    let alerts: Vec<AlertRecord> = detections
        .iter()
        .filter_map(|d| {
            let tags = alert_rules.evaluate(d, now);
            if tags.is_empty() {
                return None;
            }
            Some(AlertRecord {
                detection: d.clone(),
                alert_tags: tags.iter().map(|t| t.to_string()).collect(),
            })
        })
        .collect();

    let log = MonthlyLog::new(&args.data_dir);
    let month = MonthlyLog::month_key(now);
    log.append("detections", &month, &detections)?;
    if !alerts.is_empty() {
        log.append("alerts", &month, &alerts)?;
        tracing::info!(count = alerts.len(), "alerts recorded");
    }

    if detections.is_empty() {
        println!("No aircraft detected");
    } else {
        println!("Detected {} aircraft:", detections.len());
        for d in &detections {
            let altitude = d
                .altitude_ft
                .map(|ft| format!("{ft}ft"))
                .unwrap_or_else(|| "unknown alt".to_string());
            println!("  {} ({}) - {} - {}", d.callsign, d.icao24, altitude, d.status);
        }
    }

    Ok(())
}
