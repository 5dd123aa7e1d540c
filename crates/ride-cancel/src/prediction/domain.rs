use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Vehicle classes offered on the booking form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VehicleType {
    Auto,
    Bike,
    GoMini,
    GoSedan,
    PremierSedan,
    UberXl,
    EBike,
}

impl VehicleType {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Auto,
            Self::Bike,
            Self::GoMini,
            Self::GoSedan,
            Self::PremierSedan,
            Self::UberXl,
            Self::EBike,
        ]
    }

    /// Category value as it appears in the training data.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Auto => "Auto",
            Self::Bike => "Bike",
            Self::GoMini => "Go Mini",
            Self::GoSedan => "Go Sedan",
            Self::PremierSedan => "Premier Sedan",
            Self::UberXl => "Uber XL",
            Self::EBike => "eBike",
        }
    }

    pub const fn is_two_wheeler(self) -> bool {
        matches!(self, Self::Bike | Self::EBike)
    }
}

/// Payment channels offered on the booking form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    Upi,
    UberWallet,
    Unknown,
}

impl PaymentMethod {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Cash,
            Self::CreditCard,
            Self::DebitCard,
            Self::Upi,
            Self::UberWallet,
            Self::Unknown,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::CreditCard => "Credit Card",
            Self::DebitCard => "Debit Card",
            Self::Upi => "UPI",
            Self::UberWallet => "Uber Wallet",
            Self::Unknown => "Unknown",
        }
    }
}

/// Day of the week; carried for display, never fed to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Monday,
            Self::Tuesday,
            Self::Wednesday,
            Self::Thursday,
            Self::Friday,
            Self::Saturday,
            Self::Sunday,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

fn compact(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn lookup<T: Copy>(options: &[T], label: fn(T) -> &'static str, raw: &str) -> Option<T> {
    let key = compact(raw);
    options
        .iter()
        .copied()
        .find(|option| compact(label(*option)) == key)
}

macro_rules! label_conversions {
    ($ty:ident, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                lookup(&Self::ordered(), Self::label, raw)
                    .ok_or_else(|| format!("unknown {} '{}'", $kind, raw.trim()))
            }
        }

        impl TryFrom<String> for $ty {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.label().to_string()
            }
        }
    };
}

label_conversions!(VehicleType, "vehicle type");
label_conversions!(PaymentMethod, "payment method");
label_conversions!(DayOfWeek, "day of week");

/// One form submission. Ranges are checked at the boundary with [`RideInput::check_form_ranges`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideInput {
    pub ride_distance_km: f64,
    pub vehicle_type: VehicleType,
    pub booking_value: f64,
    pub payment_method: PaymentMethod,
    pub hour_of_day: u8,
    pub driver_rating: f64,
    pub customer_rating: f64,
    #[serde(default = "default_day")]
    pub day_of_week: DayOfWeek,
    #[serde(default)]
    pub is_weekend: bool,
}

fn default_day() -> DayOfWeek {
    DayOfWeek::Monday
}

impl RideInput {
    /// Average vehicle turnaround time fed to the model for every ride.
    pub const AVG_VTAT: f64 = 8.3;
    /// Average customer turnaround time fed to the model for every ride.
    pub const AVG_CTAT: f64 = 28.8;

    /// Reject submissions outside the booking form's limits.
    pub fn check_form_ranges(&self) -> Result<(), OutOfRange> {
        check_range("ride_distance_km", self.ride_distance_km, limits::DISTANCE_KM)?;
        check_range("booking_value", self.booking_value, limits::BOOKING_VALUE)?;
        check_range("hour_of_day", f64::from(self.hour_of_day), limits::HOUR_OF_DAY)?;
        check_range("driver_rating", self.driver_rating, limits::RATING)?;
        check_range("customer_rating", self.customer_rating, limits::RATING)?;
        Ok(())
    }
}

/// Inclusive bounds enforced by the booking form.
pub mod limits {
    pub const DISTANCE_KM: (f64, f64) = (0.0, 500.0);
    pub const BOOKING_VALUE: (f64, f64) = (0.0, 10_000.0);
    pub const HOUR_OF_DAY: (f64, f64) = (0.0, 23.0);
    pub const RATING: (f64, f64) = (1.0, 5.0);
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{field} must be between {min} and {max}, got {value}")]
pub struct OutOfRange {
    pub field: &'static str,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

pub fn check_range(
    field: &'static str,
    value: f64,
    (min, max): (f64, f64),
) -> Result<f64, OutOfRange> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

impl Default for RideInput {
    fn default() -> Self {
        Self {
            ride_distance_km: 10.0,
            vehicle_type: VehicleType::Auto,
            booking_value: 50.0,
            payment_method: PaymentMethod::Cash,
            hour_of_day: 12,
            driver_rating: 4.2,
            customer_rating: 4.5,
            day_of_week: DayOfWeek::Monday,
            is_weekend: false,
        }
    }
}

/// Binary outcome predicted for a ride.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideOutcome {
    Completed,
    Cancelled,
}

impl RideOutcome {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// Probability pair in class-index order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    pub completed: f64,
    pub cancelled: f64,
}

impl ClassProbabilities {
    pub fn one_hot(outcome: RideOutcome) -> Self {
        match outcome {
            RideOutcome::Completed => Self {
                completed: 1.0,
                cancelled: 0.0,
            },
            RideOutcome::Cancelled => Self {
                completed: 0.0,
                cancelled: 1.0,
            },
        }
    }

    pub fn for_outcome(&self, outcome: RideOutcome) -> f64 {
        match outcome {
            RideOutcome::Completed => self.completed,
            RideOutcome::Cancelled => self.cancelled,
        }
    }

    pub fn max(&self) -> f64 {
        self.completed.max(self.cancelled)
    }
}
