//! Live state-vector client for the OpenSky REST API.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::Value;

use skywatch_core::{BoundingBox, StateSample};

use crate::error::SourceError;

// Positional slots of one state-vector row. The wire contract is a bare
// array, not named fields, and any numeric slot may be null.
const IDX_ICAO24: usize = 0;
const IDX_CALLSIGN: usize = 1;
const IDX_LONGITUDE: usize = 5;
const IDX_LATITUDE: usize = 6;
const IDX_BARO_ALTITUDE: usize = 7;
const IDX_ON_GROUND: usize = 8;
const IDX_VELOCITY: usize = 9;
const IDX_TRUE_TRACK: usize = 10;

/// HTTP client for the live snapshot endpoint.
pub struct OpenSkyClient {
    client: Client,
    base_url: String,
    credentials: Option<(String, String)>,
}

impl OpenSkyClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
            credentials: None,
        }
    }

    /// Attach basic-auth credentials to every request.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Fetch the current state vectors inside a bounding box.
    ///
    /// A response with a null or missing `states` array is an empty
    /// snapshot, not an error. Samples are stamped with the fetch wall
    /// clock, which is the only timestamp this endpoint gives us per row.
    pub async fn fetch_states(&self, bbox: &BoundingBox) -> Result<Vec<StateSample>, SourceError> {
        let url = format!("{}/api/states/all", self.base_url);
        let mut request = self.client.get(&url).query(&[
            ("lamin", bbox.min_lat),
            ("lomin", bbox.min_lon),
            ("lamax", bbox.max_lat),
            ("lomax", bbox.max_lon),
        ]);
        if let Some((username, password)) = &self.credentials {
            request = request.basic_auth(username, Some(password));
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status { status, body });
        }

        let payload: Value = response.json().await?;
        Ok(parse_states(&payload, Utc::now()))
    }
}

/// Decode the positional `states` rows, tolerating null in any slot.
///
/// Rows without an icao24 are unusable and skipped; everything else
/// degrades field by field.
fn parse_states(payload: &Value, observed_at: DateTime<Utc>) -> Vec<StateSample> {
    let Some(rows) = payload.get("states").and_then(Value::as_array) else {
        return Vec::new();
    };

    rows.iter()
        .filter_map(|row| {
            let row = row.as_array()?;
            let icao24 = row.get(IDX_ICAO24)?.as_str()?.to_string();
            Some(StateSample {
                icao24,
                callsign: row
                    .get(IDX_CALLSIGN)
                    .and_then(Value::as_str)
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty()),
                latitude: field_f64(row, IDX_LATITUDE),
                longitude: field_f64(row, IDX_LONGITUDE),
                baro_altitude_m: field_f64(row, IDX_BARO_ALTITUDE),
                on_ground: row
                    .get(IDX_ON_GROUND)
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                velocity_mps: field_f64(row, IDX_VELOCITY),
                heading_deg: field_f64(row, IDX_TRUE_TRACK),
                timestamp: observed_at,
            })
        })
        .collect()
}

fn field_f64(row: &[Value], idx: usize) -> Option<f64> {
    row.get(idx).and_then(Value::as_f64)
}
