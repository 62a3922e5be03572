//! Historical queries against the OpenSky Trino warehouse.
//!
//! Speaks the Trino REST statement protocol: POST the SQL, then follow
//! `nextUri` pages until the server stops handing them out, accumulating
//! `data` rows along the way.

use std::collections::HashMap;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde_json::Value;

use skywatch_core::{BoundingBox, StateSample};

use crate::error::SourceError;

/// HTTP client for the warehouse endpoint.
pub struct TrinoClient {
    client: Client,
    base_url: String,
    user: String,
    token: Option<String>,
}

impl TrinoClient {
    pub fn new(base_url: impl Into<String>, user: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(StdDuration::from_secs(60))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
            user: user.into(),
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    /// Fetch one hour of low-altitude rows inside the bounding box.
    ///
    /// Queries are hour-aligned to match the warehouse partitioning, and
    /// filtered to rows no staler than 15 seconds since last contact. A
    /// failure is reported per hour so callers can continue with the next
    /// one.
    pub async fn fetch_hour(
        &self,
        hour: i64,
        bbox: &BoundingBox,
        max_altitude_m: f64,
    ) -> Result<Vec<StateSample>, SourceError> {
        let sql = hour_query(hour, bbox, max_altitude_m);
        self.execute(&sql).await.map_err(|source| SourceError::QueryFailed {
            hour,
            source: Box::new(source),
        })
    }

    async fn execute(&self, sql: &str) -> Result<Vec<StateSample>, SourceError> {
        let url = format!("{}/v1/statement", self.base_url);
        let request = self
            .apply_auth(self.client.post(&url))
            .body(sql.to_string());
        let mut page = Self::into_page(request.send().await?).await?;

        let mut columns: Option<HashMap<String, usize>> = None;
        let mut samples = Vec::new();

        loop {
            if let Some(err) = page.get("error") {
                return Err(SourceError::Decode(err.to_string()));
            }
            if columns.is_none() {
                columns = column_index(&page);
            }
            if let (Some(cols), Some(rows)) = (&columns, page.get("data").and_then(Value::as_array))
            {
                samples.extend(rows.iter().filter_map(|row| sample_from_row(cols, row)));
            }

            let Some(next) = page
                .get("nextUri")
                .and_then(Value::as_str)
                .map(String::from)
            else {
                break;
            };
            let request = self.apply_auth(self.client.get(&next));
            page = Self::into_page(request.send().await?).await?;
        }

        Ok(samples)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request.header("X-Trino-User", &self.user);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn into_page(response: reqwest::Response) -> Result<Value, SourceError> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status { status, body });
        }
        Ok(response.json().await?)
    }
}

fn hour_query(hour: i64, bbox: &BoundingBox, max_altitude_m: f64) -> String {
    format!(
        "SELECT time, icao24, lat, lon, velocity, heading, callsign, onground, baroaltitude \
         FROM state_vectors_data4 \
         WHERE hour = {hour} \
           AND lat BETWEEN {min_lat} AND {max_lat} \
           AND lon BETWEEN {min_lon} AND {max_lon} \
           AND baroaltitude < {max_altitude_m} \
           AND time - lastcontact <= 15",
        hour = hour,
        min_lat = bbox.min_lat,
        max_lat = bbox.max_lat,
        min_lon = bbox.min_lon,
        max_lon = bbox.max_lon,
        max_altitude_m = max_altitude_m,
    )
}

fn column_index(page: &Value) -> Option<HashMap<String, usize>> {
    let columns = page.get("columns")?.as_array()?;
    Some(
        columns
            .iter()
            .enumerate()
            .filter_map(|(i, c)| Some((c.get("name")?.as_str()?.to_string(), i)))
            .collect(),
    )
}

/// Map one named-column row onto a sample. Rows without a usable time or
/// icao24 are dropped; other fields degrade to None.
fn sample_from_row(columns: &HashMap<String, usize>, row: &Value) -> Option<StateSample> {
    let row = row.as_array()?;
    let field = |name: &str| columns.get(name).and_then(|&i| row.get(i));

    let time = field("time")?.as_i64()?;
    let icao24 = field("icao24")?.as_str()?.to_string();

    Some(StateSample {
        icao24,
        callsign: field("callsign")
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        latitude: field("lat").and_then(Value::as_f64),
        longitude: field("lon").and_then(Value::as_f64),
        baro_altitude_m: field("baroaltitude").and_then(Value::as_f64),
        on_ground: field("onground").and_then(Value::as_bool).unwrap_or(false),
        velocity_mps: field("velocity").and_then(Value::as_f64),
        heading_deg: field("heading").and_then(Value::as_f64),
        timestamp: DateTime::from_timestamp(time, 0)?,
    })
}

/// Hour-aligned Unix timestamps covering `[start, end]`, inclusive.
pub fn hour_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<i64> {
    let mut hours = Vec::new();
    let mut cursor = start;
    while cursor <= end {
        hours.push(cursor.timestamp());
        cursor += Duration::hours(1);
    }
    hours
}
