//! Per-aircraft daily track assembly.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::geo::{DistanceMetric, LatLon};
use crate::models::Detection;

/// One altitude-bearing point of a track, projected onto the
/// distance-to-airport axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPoint {
    pub time: DateTime<Utc>,
    pub distance_deg: f64,
    pub altitude_m: f64,
}

/// Ordered samples of one aircraft over one calendar day.
#[derive(Debug, Clone)]
pub struct Track {
    pub icao24: String,
    pub callsign: String,
    pub date: NaiveDate,
    pub points: Vec<TrackPoint>,
}

/// Group detections into per-aircraft, per-day tracks.
///
/// Source order is not trusted; each group is sorted by timestamp. Points
/// without an altitude or a position are dropped, so a returned track holds
/// only what the classifier can use; the callsign is taken from the first
/// retained point. A flight crossing midnight ends up in two tracks.
pub fn build_tracks(
    detections: &[Detection],
    airport: LatLon,
    metric: &dyn DistanceMetric,
) -> Vec<Track> {
    let mut groups: BTreeMap<(String, NaiveDate), Vec<&Detection>> = BTreeMap::new();
    for d in detections {
        groups
            .entry((d.icao24.clone(), d.timestamp.date_naive()))
            .or_default()
            .push(d);
    }

    let mut tracks = Vec::new();
    for ((icao24, date), mut group) in groups {
        group.sort_by_key(|d| d.timestamp);

        let mut callsign: Option<String> = None;
        let mut points = Vec::new();
        for d in group {
            let (Some(pos), Some(altitude_m)) = (d.position(), d.altitude_m) else {
                continue;
            };
            callsign.get_or_insert_with(|| d.callsign.clone());
            points.push(TrackPoint {
                time: d.timestamp,
                distance_deg: metric.offset_deg(pos, airport),
                altitude_m,
            });
        }

        if points.is_empty() {
            continue;
        }
        tracks.push(Track {
            icao24,
            callsign: callsign.unwrap_or_else(|| "Unknown".to_string()),
            date,
            points,
        });
    }
    tracks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::FlatEarth;
    use crate::models::{ProximityStatus, StateSample};
    use crate::rules::MonitorRules;
    use chrono::TimeZone;

    const AIRPORT: LatLon = LatLon {
        lat: 25.8575,
        lon: -80.8969,
    };

    fn detection(
        icao24: &str,
        callsign: &str,
        ts: DateTime<Utc>,
        lat: Option<f64>,
        alt: Option<f64>,
    ) -> Detection {
        Detection::from_sample(
            &StateSample {
                icao24: icao24.into(),
                callsign: Some(callsign.into()),
                latitude: lat,
                longitude: Some(-80.8969),
                baro_altitude_m: alt,
                on_ground: false,
                velocity_mps: None,
                heading_deg: None,
                timestamp: ts,
            },
            &MonitorRules::default(),
        )
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn empty_input_yields_no_tracks() {
        assert!(build_tracks(&[], AIRPORT, &FlatEarth).is_empty());
    }

    #[test]
    fn groups_by_aircraft_and_calendar_day() {
        let detections = vec![
            detection("aaaaaa", "ONE", at(14, 10), Some(25.90), Some(400.0)),
            detection("aaaaaa", "ONE", at(15, 10), Some(25.90), Some(400.0)),
            detection("bbbbbb", "TWO", at(14, 10), Some(25.90), Some(400.0)),
        ];
        let tracks = build_tracks(&detections, AIRPORT, &FlatEarth);
        assert_eq!(tracks.len(), 3);
    }

    #[test]
    fn midnight_crossing_splits_into_two_tracks() {
        let detections = vec![
            detection("aaaaaa", "ONE", at(14, 23), Some(25.90), Some(400.0)),
            detection(
                "aaaaaa",
                "ONE",
                Utc.with_ymd_and_hms(2025, 7, 15, 0, 5, 0).unwrap(),
                Some(25.90),
                Some(300.0),
            ),
        ];
        let tracks = build_tracks(&detections, AIRPORT, &FlatEarth);
        assert_eq!(tracks.len(), 2);
        assert!(tracks.iter().all(|t| t.points.len() == 1));
    }

    #[test]
    fn sorts_unordered_samples_by_timestamp() {
        let detections = vec![
            detection("aaaaaa", "ONE", at(14, 12), Some(25.88), Some(300.0)),
            detection("aaaaaa", "ONE", at(14, 10), Some(25.90), Some(500.0)),
            detection("aaaaaa", "ONE", at(14, 11), Some(25.89), Some(400.0)),
        ];
        let tracks = build_tracks(&detections, AIRPORT, &FlatEarth);
        assert_eq!(tracks.len(), 1);
        let times: Vec<_> = tracks[0].points.iter().map(|p| p.time).collect();
        assert_eq!(times, vec![at(14, 10), at(14, 11), at(14, 12)]);
    }

    #[test]
    fn drops_points_without_altitude_or_position() {
        let detections = vec![
            detection("aaaaaa", "GHOST", at(14, 10), Some(25.90), None),
            detection("aaaaaa", "REAL", at(14, 11), Some(25.89), Some(400.0)),
            detection("aaaaaa", "REAL", at(14, 12), None, Some(300.0)),
        ];
        let tracks = build_tracks(&detections, AIRPORT, &FlatEarth);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].points.len(), 1);
        // Callsign comes from the first retained point, not the first sample.
        assert_eq!(tracks[0].callsign, "REAL");
    }

    #[test]
    fn all_points_filtered_discards_group() {
        let detections = vec![detection("aaaaaa", "GHOST", at(14, 10), Some(25.90), None)];
        assert!(build_tracks(&detections, AIRPORT, &FlatEarth).is_empty());
    }

    #[test]
    fn distance_uses_supplied_metric() {
        let detections = vec![detection("aaaaaa", "ONE", at(14, 10), Some(25.8775), Some(400.0))];
        let tracks = build_tracks(&detections, AIRPORT, &FlatEarth);
        assert!((tracks[0].points[0].distance_deg - 0.02).abs() < 1e-9);
        assert_eq!(detections[0].status, ProximityStatus::LowAltitude);
    }
}
