use super::domain::{PaymentMethod, RideInput};
use super::engine::PredictionResult;
use serde::{Deserialize, Serialize};

const HIGH_BOOKING_VALUE: f64 = 1000.0;
const LOW_BOOKING_VALUE: f64 = 100.0;
const LONG_DISTANCE_KM: f64 = 30.0;
const LATE_NIGHT_END_HOUR: u8 = 5;
const LOW_RATING: f64 = 3.0;

/// Coarse bucketing of the winning class probability. Display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    pub fn from_probability(max_probability: f64) -> Self {
        if max_probability > 0.8 {
            Self::High
        } else if max_probability > 0.6 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub notes: Vec<String>,
    pub confidence: ConfidenceTier,
}

pub fn explain(input: &RideInput, result: &PredictionResult) -> Explanation {
    let mut notes = Vec::new();

    if let Some(reason) = result.override_reason.as_deref() {
        notes.push(format!("Rule-based override triggered: {reason}"));
    }

    if input.booking_value > HIGH_BOOKING_VALUE {
        notes.push(format!(
            "Very high booking value ({:.0}) is unusual and often cancelled",
            input.booking_value
        ));
    } else if input.booking_value < LOW_BOOKING_VALUE {
        notes.push(format!(
            "Low booking value ({:.0}) may not be worth the trip for drivers",
            input.booking_value
        ));
    }

    if input.ride_distance_km > LONG_DISTANCE_KM {
        notes.push(format!(
            "Long-distance ride ({:.1} km) raises cancellation risk",
            input.ride_distance_km
        ));
    }

    if input.hour_of_day <= LATE_NIGHT_END_HOUR {
        notes.push(format!(
            "Late-night pickup ({:02}:00) has fewer available drivers",
            input.hour_of_day
        ));
    }

    if input.vehicle_type.is_two_wheeler() {
        notes.push(format!(
            "Two-wheeler rides ({}) are cancelled more often",
            input.vehicle_type
        ));
    }

    if input.payment_method == PaymentMethod::Cash {
        notes.push("Cash payment carries a higher cancellation rate".to_string());
    }

    if input.customer_rating < LOW_RATING {
        notes.push(format!(
            "Low customer rating ({:.1}) below {LOW_RATING:.1}",
            input.customer_rating
        ));
    }

    if input.driver_rating < LOW_RATING {
        notes.push(format!(
            "Low driver rating ({:.1}) below {LOW_RATING:.1}",
            input.driver_rating
        ));
    }

    if notes.is_empty() {
        notes.push("Standard ride with no notable risk factors".to_string());
    }

    Explanation {
        notes,
        confidence: ConfidenceTier::from_probability(result.probabilities().max()),
    }
}
