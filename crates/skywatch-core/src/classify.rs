//! Landing/takeoff inference from daily tracks.
//!
//! A single linear pass over one track's distance/altitude profile. A track
//! that closes in, descends, and terminates low inside the near zone reads
//! as a landing unless it re-opens distance after entering the zone (a
//! flyover or touch-and-go). A track that starts low inside the zone and
//! climbs away reads as a takeoff. The two tests are independent.

use serde::{Deserialize, Serialize};

use crate::geo::DEG_TO_KM;
use crate::models::{Confidence, EventKind, TrackEvent};
use crate::track::Track;

/// Thresholds for the track-termination heuristic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Ring treated as "at the airport" (degrees)
    pub near_zone_deg: f64,
    /// Boundary distance below which a qualifying event is HIGH confidence (degrees)
    pub high_confidence_deg: f64,
    /// Boundary altitude ceiling for a qualifying event (meters)
    pub low_altitude_m: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            near_zone_deg: 0.02,
            high_confidence_deg: 0.01,
            low_altitude_m: 500.0,
        }
    }
}

/// Classify one track, emitting at most one landing and one takeoff.
///
/// Tracks with fewer than three points carry too little signal and emit
/// nothing. Purely functional: the track is not modified.
pub fn classify_track(track: &Track, config: &ClassifierConfig) -> Vec<TrackEvent> {
    let mut events = Vec::new();
    if track.points.len() < 3 {
        return events;
    }

    let first = track.points[0];
    let last = track.points[track.points.len() - 1];
    let detections = track.points.len();

    // Landing: closing in, descending, ending low and near the field.
    let approaching = first.distance_deg > last.distance_deg;
    let descending = first.altitude_m > last.altitude_m;
    let ends_near = last.distance_deg < config.near_zone_deg;
    let low_at_end = last.altitude_m < config.low_altitude_m;

    if approaching && descending && ends_near && low_at_end && !continues_past(track, config) {
        let confidence = if low_at_end && last.distance_deg < config.high_confidence_deg {
            Confidence::High
        } else {
            Confidence::Medium
        };
        events.push(TrackEvent {
            kind: EventKind::Landing,
            icao24: track.icao24.clone(),
            callsign: track.callsign.clone(),
            date: track.date,
            event_time: last.time,
            boundary_altitude_m: last.altitude_m,
            boundary_distance_km: last.distance_deg * DEG_TO_KM,
            altitude_delta_m: first.altitude_m - last.altitude_m,
            detections,
            confidence,
        });
    }

    // Takeoff: starting low and near the field, climbing away. Checked
    // regardless of the landing outcome, and with no continues-past scan on
    // this side.
    let leaving = last.distance_deg > first.distance_deg;
    let climbing = last.altitude_m > first.altitude_m;
    let starts_near = first.distance_deg < config.near_zone_deg;
    let low_at_start = first.altitude_m < config.low_altitude_m;

    if leaving && climbing && starts_near && low_at_start {
        let confidence = if low_at_start && first.distance_deg < config.high_confidence_deg {
            Confidence::High
        } else {
            Confidence::Medium
        };
        events.push(TrackEvent {
            kind: EventKind::Takeoff,
            icao24: track.icao24.clone(),
            callsign: track.callsign.clone(),
            date: track.date,
            event_time: first.time,
            boundary_altitude_m: first.altitude_m,
            boundary_distance_km: first.distance_deg * DEG_TO_KM,
            altitude_delta_m: last.altitude_m - first.altitude_m,
            detections,
            confidence,
        });
    }

    events
}

/// A track that dips inside the near zone and then opens distance again
/// passed over the field rather than stopping on it.
fn continues_past(track: &Track, config: &ClassifierConfig) -> bool {
    track.points.windows(2).any(|pair| {
        pair[0].distance_deg < config.near_zone_deg && pair[1].distance_deg > pair[0].distance_deg
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::TrackPoint;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 14, 15, 0, 0).unwrap()
    }

    /// Points are (distance_deg, altitude_m), one minute apart.
    fn track_from(points: &[(f64, f64)]) -> Track {
        Track {
            icao24: "a1b2c3".into(),
            callsign: "N123AB".into(),
            date: base_time().date_naive(),
            points: points
                .iter()
                .enumerate()
                .map(|(i, &(distance_deg, altitude_m))| TrackPoint {
                    time: base_time() + Duration::minutes(i as i64),
                    distance_deg,
                    altitude_m,
                })
                .collect(),
        }
    }

    fn classify(points: &[(f64, f64)]) -> Vec<TrackEvent> {
        classify_track(&track_from(points), &ClassifierConfig::default())
    }

    #[test]
    fn fewer_than_three_points_emits_nothing() {
        assert!(classify(&[]).is_empty());
        assert!(classify(&[(0.05, 900.0)]).is_empty());
        assert!(classify(&[(0.05, 900.0), (0.005, 100.0)]).is_empty());
    }

    #[test]
    fn approach_descend_terminate_is_a_landing() {
        let events = classify(&[(0.05, 900.0), (0.03, 400.0), (0.015, 200.0)]);
        assert_eq!(events.len(), 1);

        let landing = &events[0];
        assert_eq!(landing.kind, EventKind::Landing);
        // 0.015 deg is inside the near zone but not the high-confidence ring.
        assert_eq!(landing.confidence, Confidence::Medium);
        assert!((landing.boundary_distance_km - 1.665).abs() < 1e-9);
        assert!((landing.altitude_delta_m - 700.0).abs() < 1e-9);
        assert!((landing.boundary_altitude_m - 200.0).abs() < 1e-9);
        assert_eq!(landing.detections, 3);
        assert_eq!(landing.event_time, base_time() + Duration::minutes(2));
    }

    #[test]
    fn departure_climbing_away_is_a_high_confidence_takeoff() {
        let events = classify(&[(0.005, 100.0), (0.01, 600.0), (0.05, 1200.0)]);
        assert_eq!(events.len(), 1);

        let takeoff = &events[0];
        assert_eq!(takeoff.kind, EventKind::Takeoff);
        assert_eq!(takeoff.confidence, Confidence::High);
        assert!((takeoff.altitude_delta_m - 1100.0).abs() < 1e-9);
        assert!((takeoff.boundary_altitude_m - 100.0).abs() < 1e-9);
        assert!((takeoff.boundary_distance_km - 0.555).abs() < 1e-9);
        assert_eq!(takeoff.event_time, base_time());
    }

    #[test]
    fn entering_then_receding_suppresses_the_landing() {
        // Boundary conditions alone qualify, but the track dips inside the
        // near zone and recedes: a flyover, not a landing.
        let events = classify(&[(0.05, 900.0), (0.005, 200.0), (0.008, 180.0)]);
        assert!(events.is_empty());
    }

    #[test]
    fn each_landing_condition_is_necessary() {
        // Not approaching: first distance below last.
        assert!(classify(&[(0.014, 900.0), (0.03, 400.0), (0.015, 200.0)]).is_empty());
        // Not descending.
        assert!(classify(&[(0.05, 190.0), (0.03, 400.0), (0.015, 200.0)]).is_empty());
        // Not ending near.
        assert!(classify(&[(0.08, 900.0), (0.05, 400.0), (0.03, 200.0)]).is_empty());
        // Not low at the end.
        assert!(classify(&[(0.05, 900.0), (0.03, 700.0), (0.015, 600.0)]).is_empty());
    }

    #[test]
    fn each_takeoff_condition_is_necessary() {
        // Not leaving.
        assert!(classify(&[(0.005, 100.0), (0.01, 600.0), (0.004, 1200.0)]).is_empty());
        // Not climbing (also reads as descending toward the field, but the
        // landing side fails its ends-near test).
        assert!(classify(&[(0.019, 400.0), (0.03, 300.0), (0.05, 200.0)]).is_empty());
        // Not starting near.
        assert!(classify(&[(0.03, 100.0), (0.04, 600.0), (0.05, 1200.0)]).is_empty());
        // Not low at the start.
        assert!(classify(&[(0.005, 600.0), (0.01, 800.0), (0.05, 1200.0)]).is_empty());
    }

    #[test]
    fn landing_confidence_boundary_is_exclusive() {
        // Exactly 0.01 deg at the end: near enough to land, not high confidence.
        let events = classify(&[(0.05, 900.0), (0.03, 400.0), (0.01, 200.0)]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].confidence, Confidence::Medium);

        let events = classify(&[(0.05, 900.0), (0.03, 400.0), (0.009, 200.0)]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].confidence, Confidence::High);
    }

    #[test]
    fn takeoff_checked_even_when_landing_test_fails() {
        // Fails the landing test on its first condition yet still emits a
        // takeoff: the two checks do not gate each other.
        let events = classify(&[(0.005, 100.0), (0.01, 600.0), (0.05, 1200.0)]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Takeoff);
    }

    #[test]
    fn suppressed_landing_still_allows_takeoff_evaluation() {
        // All four landing conditions hold but the track recedes after
        // entering the zone, so the landing is suppressed; the takeoff test
        // still runs (and fails on its own terms here).
        let events = classify(&[(0.05, 900.0), (0.005, 100.0), (0.015, 80.0)]);
        assert!(events.is_empty());
    }

    #[test]
    fn thresholds_come_from_config() {
        let config = ClassifierConfig {
            near_zone_deg: 0.1,
            high_confidence_deg: 0.05,
            low_altitude_m: 1000.0,
        };
        let events = classify_track(
            &track_from(&[(0.2, 1500.0), (0.1, 900.0), (0.04, 600.0)]),
            &config,
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Landing);
        assert_eq!(events[0].confidence, Confidence::High);
    }
}
