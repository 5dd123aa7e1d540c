use serde::{Deserialize, Serialize};

/// Thresholds for the deterministic override rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideConfig {
    pub long_distance_km: f64,
    pub minimum_value_per_km: f64,
    pub minimum_rating: f64,
}

impl Default for OverrideConfig {
    fn default() -> Self {
        Self {
            long_distance_km: 100.0,
            minimum_value_per_km: 0.2,
            minimum_rating: 2.0,
        }
    }
}
