use super::domain::{PaymentMethod, RideInput, VehicleType};
use serde::Serialize;

/// Column names used when the classifier was trained.
pub mod columns {
    pub const CUSTOMER_RATING: &str = "Customer Rating";
    pub const DRIVER_RATINGS: &str = "Driver Ratings";
    pub const BOOKING_VALUE: &str = "Booking Value";
    pub const RIDE_DISTANCE: &str = "Ride Distance";
    pub const HOUR: &str = "hour";
    pub const AVG_VTAT: &str = "Avg VTAT";
    pub const AVG_CTAT: &str = "Avg CTAT";
    pub const VEHICLE_TYPE: &str = "Vehicle Type";
    pub const PAYMENT_METHOD: &str = "Payment Method";
}

/// Booking values above this are capped before reaching the model.
pub const BOOKING_VALUE_CAP: f64 = 1500.0;

/// Single-row feature record prior to categorical expansion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawFeatureRecord {
    pub customer_rating: f64,
    pub driver_ratings: f64,
    pub booking_value: f64,
    pub ride_distance: f64,
    pub hour: f64,
    pub avg_vtat: f64,
    pub avg_ctat: f64,
    pub vehicle_type: VehicleType,
    pub payment_method: PaymentMethod,
}

impl RawFeatureRecord {
    /// Numeric columns in training order.
    pub fn numeric_columns(&self) -> [(&'static str, f64); 7] {
        [
            (columns::CUSTOMER_RATING, self.customer_rating),
            (columns::DRIVER_RATINGS, self.driver_ratings),
            (columns::BOOKING_VALUE, self.booking_value),
            (columns::RIDE_DISTANCE, self.ride_distance),
            (columns::HOUR, self.hour),
            (columns::AVG_VTAT, self.avg_vtat),
            (columns::AVG_CTAT, self.avg_ctat),
        ]
    }

    /// Categorical columns paired with the value present in this row.
    pub fn categorical_columns(&self) -> [(&'static str, &'static str); 2] {
        [
            (columns::VEHICLE_TYPE, self.vehicle_type.label()),
            (columns::PAYMENT_METHOD, self.payment_method.label()),
        ]
    }
}

pub fn build(input: &RideInput) -> RawFeatureRecord {
    RawFeatureRecord {
        customer_rating: input.customer_rating,
        driver_ratings: input.driver_rating,
        booking_value: input.booking_value.min(BOOKING_VALUE_CAP),
        ride_distance: input.ride_distance_km,
        hour: f64::from(input.hour_of_day),
        avg_vtat: RideInput::AVG_VTAT,
        avg_ctat: RideInput::AVG_CTAT,
        vehicle_type: input.vehicle_type,
        payment_method: input.payment_method,
    }
}
