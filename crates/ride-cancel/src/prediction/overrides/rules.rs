use super::super::domain::RideInput;
use super::config::OverrideConfig;
use serde::{Deserialize, Serialize};

/// Rules that can preempt the classifier, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideRule {
    UnderpricedLongDistance,
    VeryLowRating,
}

impl OverrideRule {
    pub const fn ordered() -> [Self; 2] {
        [Self::UnderpricedLongDistance, Self::VeryLowRating]
    }

    pub(crate) fn matches(self, input: &RideInput, config: &OverrideConfig) -> bool {
        match self {
            Self::UnderpricedLongDistance => {
                input.ride_distance_km > config.long_distance_km
                    && input.booking_value < config.minimum_value_per_km * input.ride_distance_km
            }
            Self::VeryLowRating => {
                input.customer_rating < config.minimum_rating
                    || input.driver_rating < config.minimum_rating
            }
        }
    }

    pub fn reason(self, config: &OverrideConfig) -> String {
        match self {
            Self::UnderpricedLongDistance => "Long distance with too low booking value".to_string(),
            Self::VeryLowRating => format!(
                "Very low customer or driver rating (<{:.1})",
                config.minimum_rating
            ),
        }
    }
}
