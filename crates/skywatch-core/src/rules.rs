//! Monitoring thresholds for one airport.

use serde::{Deserialize, Serialize};

use crate::geo::LatLon;

/// Where to watch and which altitudes count as low.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorRules {
    /// Reference point distances are measured from
    pub airport: LatLon,
    /// Live query radius in kilometers
    pub radius_km: f64,
    /// Below this an airborne aircraft is VERY_LOW (meters)
    pub ground_altitude_m: f64,
    /// Below this an airborne aircraft is LOW_ALTITUDE (meters)
    pub landing_altitude_m: f64,
}

impl Default for MonitorRules {
    fn default() -> Self {
        Self {
            // Dade-Collier Training and Transition Airport (TNT)
            airport: LatLon::new(25.8575, -80.8969),
            radius_km: 10.0,
            ground_altitude_m: 100.0,
            landing_altitude_m: 500.0,
        }
    }
}
