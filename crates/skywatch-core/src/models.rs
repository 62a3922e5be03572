//! Core data models for the monitoring pipeline.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::LatLon;
use crate::rules::MonitorRules;

pub const FEET_PER_METER: f64 = 3.28084;

/// One raw observation of one aircraft, as decoded from a source.
///
/// Numeric fields can be missing in the feeds; consumers decide what absence
/// means for them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSample {
    pub icao24: String,
    pub callsign: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub baro_altitude_m: Option<f64>,
    pub on_ground: bool,
    pub velocity_mps: Option<f64>,
    pub heading_deg: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

/// Ground-proximity classification of a single observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProximityStatus {
    OnGround,
    VeryLow,
    LowAltitude,
    Cruising,
}

impl ProximityStatus {
    /// Classify from the ground flag and barometric altitude. The ground
    /// flag wins; an absent altitude reads as cruising.
    pub fn classify(on_ground: bool, altitude_m: Option<f64>, rules: &MonitorRules) -> Self {
        if on_ground {
            return ProximityStatus::OnGround;
        }
        match altitude_m {
            Some(alt) if alt < rules.ground_altitude_m => ProximityStatus::VeryLow,
            Some(alt) if alt < rules.landing_altitude_m => ProximityStatus::LowAltitude,
            _ => ProximityStatus::Cruising,
        }
    }

    /// True for the statuses the low-altitude alert rule fires on.
    pub fn is_low(&self) -> bool {
        matches!(
            self,
            ProximityStatus::OnGround | ProximityStatus::VeryLow | ProximityStatus::LowAltitude
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProximityStatus::OnGround => "ON_GROUND",
            ProximityStatus::VeryLow => "VERY_LOW",
            ProximityStatus::LowAltitude => "LOW_ALTITUDE",
            ProximityStatus::Cruising => "CRUISING",
        }
    }
}

impl std::fmt::Display for ProximityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One persisted log row: a normalized observation plus its classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    pub timestamp: DateTime<Utc>,
    pub icao24: String,
    /// Trimmed callsign, `"Unknown"` when the feed had none
    pub callsign: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude_m: Option<f64>,
    pub altitude_ft: Option<i64>,
    pub velocity_mps: Option<f64>,
    pub heading_deg: Option<f64>,
    pub on_ground: bool,
    pub status: ProximityStatus,
}

impl Detection {
    pub fn from_sample(sample: &StateSample, rules: &MonitorRules) -> Self {
        let callsign = sample
            .callsign
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .unwrap_or_else(|| "Unknown".to_string());

        Self {
            timestamp: sample.timestamp,
            icao24: sample.icao24.clone(),
            callsign,
            latitude: sample.latitude,
            longitude: sample.longitude,
            altitude_m: sample.baro_altitude_m,
            altitude_ft: sample.baro_altitude_m.map(|m| (m * FEET_PER_METER) as i64),
            velocity_mps: sample.velocity_mps,
            heading_deg: sample.heading_deg,
            on_ground: sample.on_ground,
            status: ProximityStatus::classify(sample.on_ground, sample.baro_altitude_m, rules),
        }
    }

    /// Position, when both coordinates are present.
    pub fn position(&self) -> Option<LatLon> {
        Some(LatLon::new(self.latitude?, self.longitude?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    High,
    Medium,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Confidence::High => "HIGH",
            Confidence::Medium => "MEDIUM",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Landing,
    Takeoff,
}

/// A landing or takeoff inferred from one daily track.
///
/// Boundary fields refer to the last sample for landings and the first for
/// takeoffs. `altitude_delta_m` is the drop for landings and the gain for
/// takeoffs; the qualifying tests make it non-negative either way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackEvent {
    pub kind: EventKind,
    pub icao24: String,
    pub callsign: String,
    pub date: NaiveDate,
    pub event_time: DateTime<Utc>,
    pub boundary_altitude_m: f64,
    pub boundary_distance_km: f64,
    pub altitude_delta_m: f64,
    pub detections: usize,
    pub confidence: Confidence,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(altitude: Option<f64>, on_ground: bool) -> StateSample {
        StateSample {
            icao24: "a1b2c3".into(),
            callsign: Some(" N123AB ".into()),
            latitude: Some(25.86),
            longitude: Some(-80.90),
            baro_altitude_m: altitude,
            on_ground,
            velocity_mps: Some(60.0),
            heading_deg: Some(270.0),
            timestamp: Utc.with_ymd_and_hms(2025, 7, 14, 15, 0, 0).unwrap(),
        }
    }

    #[test]
    fn status_thresholds() {
        let rules = MonitorRules::default();
        assert_eq!(
            ProximityStatus::classify(true, Some(2000.0), &rules),
            ProximityStatus::OnGround
        );
        assert_eq!(
            ProximityStatus::classify(false, Some(50.0), &rules),
            ProximityStatus::VeryLow
        );
        assert_eq!(
            ProximityStatus::classify(false, Some(300.0), &rules),
            ProximityStatus::LowAltitude
        );
        assert_eq!(
            ProximityStatus::classify(false, Some(800.0), &rules),
            ProximityStatus::Cruising
        );
        assert_eq!(
            ProximityStatus::classify(false, None, &rules),
            ProximityStatus::Cruising
        );
    }

    #[test]
    fn detection_trims_callsign_and_converts_feet() {
        let d = Detection::from_sample(&sample(Some(304.8), false), &MonitorRules::default());
        assert_eq!(d.callsign, "N123AB");
        assert_eq!(d.altitude_ft, Some(1000));
        assert_eq!(d.status, ProximityStatus::LowAltitude);
    }

    #[test]
    fn detection_defaults_missing_callsign() {
        let mut s = sample(None, false);
        s.callsign = None;
        let d = Detection::from_sample(&s, &MonitorRules::default());
        assert_eq!(d.callsign, "Unknown");
        assert_eq!(d.altitude_ft, None);

        s.callsign = Some("   ".into());
        let d = Detection::from_sample(&s, &MonitorRules::default());
        assert_eq!(d.callsign, "Unknown");
    }

    #[test]
    fn status_serializes_screaming_snake() {
        let json = serde_json::to_string(&ProximityStatus::OnGround).unwrap();
        assert_eq!(json, "\"ON_GROUND\"");
        let json = serde_json::to_string(&Confidence::High).unwrap();
        assert_eq!(json, "\"HIGH\"");
    }

    #[test]
    fn position_requires_both_coordinates() {
        let mut s = sample(Some(100.0), false);
        s.longitude = None;
        let d = Detection::from_sample(&s, &MonitorRules::default());
        assert!(d.position().is_none());
    }
}
