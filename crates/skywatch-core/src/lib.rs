//! Core domain logic for small-airport operations monitoring.
//!
//! Everything here is pure: sources feed [`StateSample`]s in, sinks take
//! [`Detection`]s, [`AlertRecord`]s and [`TrackEvent`]s out. No I/O.

pub mod alerts;
pub mod classify;
pub mod geo;
pub mod models;
pub mod rules;
pub mod track;

pub use alerts::{AlertRecord, AlertRules, AlertTag};
pub use classify::{classify_track, ClassifierConfig};
pub use geo::{
    bounding_box, haversine_distance, BoundingBox, DistanceMetric, FlatEarth, GreatCircle, LatLon,
    DEG_TO_KM,
};
pub use models::{Confidence, Detection, EventKind, ProximityStatus, StateSample, TrackEvent};
pub use rules::MonitorRules;
pub use track::{build_tracks, Track, TrackPoint};
