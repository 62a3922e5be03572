//! Static alert rules applied to individual live detections.
//!
//! Rules operate on single detections, never on tracks, and every rule is
//! evaluated regardless of earlier matches; tags accumulate.

use std::fmt;

use chrono::{DateTime, FixedOffset, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Detection;

/// A label one alert rule attached to one detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertTag {
    WatchCallsign(String),
    NoCallsign,
    Military,
    AfterHours,
    LowAltitude,
}

impl fmt::Display for AlertTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertTag::WatchCallsign(entry) => write!(f, "WATCH_CALLSIGN:{entry}"),
            AlertTag::NoCallsign => f.write_str("NO_CALLSIGN"),
            AlertTag::Military => f.write_str("MILITARY"),
            AlertTag::AfterHours => f.write_str("AFTER_HOURS"),
            AlertTag::LowAltitude => f.write_str("LOW_ALTITUDE"),
        }
    }
}

/// A detection plus the tags it tripped, as written to the alerts log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRecord {
    #[serde(flatten)]
    pub detection: Detection,
    pub alert_tags: Vec<String>,
}

/// Static alert policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRules {
    /// Callsign prefixes to flag, matched case-insensitively
    pub watch_callsigns: Vec<String>,
    /// icao24 prefixes flagged as military, matched case-insensitively
    pub military_prefixes: Vec<String>,
    /// Local hour at which the after-hours window opens (inclusive)
    pub after_hours_start: u32,
    /// Local hour at which it closes (exclusive); the window wraps midnight
    pub after_hours_end: u32,
    /// Fixed offset from UTC used to derive the local hour
    pub utc_offset_hours: i32,
}

impl Default for AlertRules {
    fn default() -> Self {
        Self {
            watch_callsigns: Vec::new(),
            // US military icao24 allocation starts at AE0000.
            military_prefixes: vec!["ae".to_string()],
            after_hours_start: 22,
            after_hours_end: 6,
            utc_offset_hours: -5,
        }
    }
}

impl AlertRules {
    /// Evaluate every rule against one detection.
    ///
    /// `now` is the evaluation clock, not the detection timestamp: the
    /// after-hours rule reports when the rule ran, which only lines up with
    /// the event time for live samples. Callers reprocessing old data should
    /// not expect meaningful AFTER_HOURS tags.
    pub fn evaluate(&self, detection: &Detection, now: DateTime<Utc>) -> Vec<AlertTag> {
        let mut tags = Vec::new();
        let callsign = detection.callsign.trim().to_uppercase();

        for entry in &self.watch_callsigns {
            if !entry.is_empty() && callsign.starts_with(&entry.to_uppercase()) {
                tags.push(AlertTag::WatchCallsign(entry.clone()));
            }
        }

        if callsign.is_empty() || callsign == "N/A" || callsign == "UNKNOWN" {
            tags.push(AlertTag::NoCallsign);
        }

        let icao24 = detection.icao24.to_lowercase();
        if self
            .military_prefixes
            .iter()
            .any(|p| !p.is_empty() && icao24.starts_with(&p.to_lowercase()))
        {
            tags.push(AlertTag::Military);
        }

        if self.is_after_hours(now) {
            tags.push(AlertTag::AfterHours);
        }

        if detection.status.is_low() {
            tags.push(AlertTag::LowAltitude);
        }

        tags
    }

    fn is_after_hours(&self, now: DateTime<Utc>) -> bool {
        // Out-of-range offsets fall back to UTC rather than failing a poll.
        let offset = FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"));
        let hour = now.with_timezone(&offset).hour();
        hour >= self.after_hours_start || hour < self.after_hours_end
    }
}
