//! Geometry relative to the reference airport point.

use serde::{Deserialize, Serialize};

/// Kilometers per degree of arc; the flat conversion factor all distance
/// thresholds were tuned against.
pub const DEG_TO_KM: f64 = 111.0;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A position in WGS84 decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Angular separation between two points, in degrees.
///
/// Classification thresholds are expressed in degrees, so every metric
/// reports degrees: [`FlatEarth`] is the raw Euclidean value the thresholds
/// were tuned against, [`GreatCircle`] the haversine central angle.
pub trait DistanceMetric {
    fn offset_deg(&self, a: LatLon, b: LatLon) -> f64;
}

/// Euclidean distance in raw degrees. Only meaningful within a few tens of
/// kilometers of the reference point.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatEarth;

impl DistanceMetric for FlatEarth {
    fn offset_deg(&self, a: LatLon, b: LatLon) -> f64 {
        let dlat = a.lat - b.lat;
        let dlon = a.lon - b.lon;
        (dlat * dlat + dlon * dlon).sqrt()
    }
}

/// Haversine central angle, in degrees.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreatCircle;

impl DistanceMetric for GreatCircle {
    fn offset_deg(&self, a: LatLon, b: LatLon) -> f64 {
        (haversine_distance(a.lat, a.lon, b.lat, b.lon) / EARTH_RADIUS_M).to_degrees()
    }
}

/// Great-circle distance between two points in meters.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Geographic query box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Bounding box the pollers query with.
///
/// The longitude offset is not the usual cos(lat) scaling; changing the
/// formula would change which aircraft get logged, so it stays as is.
pub fn bounding_box(center: LatLon, radius_km: f64) -> BoundingBox {
    let lat_offset = radius_km / DEG_TO_KM;
    let lon_offset = radius_km / (DEG_TO_KM * (center.lat / 90.0).abs());
    BoundingBox {
        min_lat: center.lat - lat_offset,
        max_lat: center.lat + lat_offset,
        min_lon: center.lon - lon_offset,
        max_lon: center.lon + lon_offset,
    }
}
