use crate::infra::{load_engine, parse_booking_value, parse_distance, parse_rating};
use chrono::Local;
use clap::Args;
use ride_cancel::config::AppConfig;
use ride_cancel::error::AppError;
use ride_cancel::prediction::report::export_csv;
use ride_cancel::prediction::{
    DayOfWeek, ModelSummary, PaymentMethod, PredictionReport, RideInput, VehicleType,
};
use std::path::PathBuf;

const IMPORTANCE_BAR_WIDTH: f64 = 40.0;

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// Ride distance in km (0-500)
    #[arg(long, default_value_t = 10.0, value_parser = parse_distance)]
    pub(crate) distance: f64,
    /// Vehicle type (Auto, Bike, Go Mini, Go Sedan, Premier Sedan, Uber XL, eBike)
    #[arg(long, default_value_t = VehicleType::Auto)]
    pub(crate) vehicle: VehicleType,
    /// Booking value (0-10000)
    #[arg(long, default_value_t = 50.0, value_parser = parse_booking_value)]
    pub(crate) booking_value: f64,
    /// Payment method (Cash, Credit Card, Debit Card, UPI, Uber Wallet, Unknown)
    #[arg(long, default_value_t = PaymentMethod::Cash)]
    pub(crate) payment: PaymentMethod,
    /// Pickup hour of day (0-23)
    #[arg(long, default_value_t = 12, value_parser = clap::value_parser!(u8).range(0..=23))]
    pub(crate) hour: u8,
    /// Driver rating (1.0-5.0)
    #[arg(long, default_value_t = 4.2, value_parser = parse_rating)]
    pub(crate) driver_rating: f64,
    /// Customer rating (1.0-5.0)
    #[arg(long, default_value_t = 4.5, value_parser = parse_rating)]
    pub(crate) customer_rating: f64,
    /// Day of week (display only)
    #[arg(long, default_value_t = DayOfWeek::Monday)]
    pub(crate) day: DayOfWeek,
    /// Mark the ride as a weekend ride (display only)
    #[arg(long)]
    pub(crate) weekend: bool,
    /// Override the configured model artifact path
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Export the prediction as CSV into the configured export directory
    #[arg(long)]
    pub(crate) export_csv: bool,
    /// Override the configured export directory
    #[arg(long)]
    pub(crate) export_dir: Option<PathBuf>,
}

impl PredictArgs {
    pub(crate) fn ride_input(&self) -> RideInput {
        RideInput {
            ride_distance_km: self.distance,
            vehicle_type: self.vehicle,
            booking_value: self.booking_value,
            payment_method: self.payment,
            hour_of_day: self.hour,
            driver_rating: self.driver_rating,
            customer_rating: self.customer_rating,
            day_of_week: self.day,
            is_weekend: self.weekend,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ModelArgs {
    /// Override the configured model artifact path
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Number of feature importances to list
    #[arg(long, default_value_t = 10)]
    pub(crate) top: usize,
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let model_path = args.model.clone().unwrap_or(config.model.path);
    let export_dir = args.export_dir.clone().unwrap_or(config.export.dir);
    let engine = load_engine(&model_path)?;
    let input = args.ride_input();

    println!("Ride Cancellation Predictor");
    render_input(&input);

    let result = match engine.predict(&input) {
        Ok(result) => result,
        Err(_) => {
            println!(
                "\nCannot make prediction: model file not loaded ({})",
                model_path.display()
            );
            return Ok(());
        }
    };

    let report = PredictionReport::new(input, result);
    render_report(&report);

    if args.export_csv {
        match export_csv(&export_dir, &report, Local::now().naive_local()) {
            Ok(path) => println!("\nReport exported to {}", path.display()),
            Err(err) => println!("\nWarning: report export failed: {err}"),
        }
    }

    Ok(())
}

pub(crate) fn run_model_summary(args: ModelArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let model_path = args.model.unwrap_or(config.model.path);
    let engine = load_engine(&model_path)?;

    println!("Model artifact: {}", model_path.display());
    render_model_summary(&engine.summary(), args.top);
    Ok(())
}

fn render_input(input: &RideInput) {
    println!("\nRide details");
    println!("- Distance: {:.1} km", input.ride_distance_km);
    println!("- Vehicle: {}", input.vehicle_type);
    println!("- Booking value: {:.2}", input.booking_value);
    println!("- Payment: {}", input.payment_method);
    println!("- Hour of day: {:02}:00", input.hour_of_day);
    println!(
        "- Ratings: driver {:.1} | customer {:.1}",
        input.driver_rating, input.customer_rating
    );
    println!(
        "- Day: {}{}",
        input.day_of_week,
        if input.is_weekend { " (weekend)" } else { "" }
    );
}

pub(crate) fn render_report(report: &PredictionReport) {
    let result = &report.result;

    println!("\nPrediction result");
    if let Some(reason) = &result.override_reason {
        println!("Rule-based override triggered: {reason}");
    }
    println!("{}", result.headline());
    println!(
        "Completed {:.1}% | Cancelled {:.1}%",
        result.probability_completed * 100.0,
        result.probability_cancelled * 100.0
    );
    println!("Confidence: {}", report.explanation.confidence.label());
    if !result.schema_verified {
        println!("Note: model declares no feature schema; result is schema-unverified");
    }

    println!("\nWhy this prediction");
    for note in &report.explanation.notes {
        println!("- {note}");
    }
}

fn render_model_summary(summary: &ModelSummary, top: usize) {
    if !summary.loaded {
        println!("Status: not loaded (predictions unavailable)");
        return;
    }

    println!("Status: loaded");
    match &summary.expected_features {
        Some(features) => println!("Declared feature schema: {} columns", features.len()),
        None => println!("Declared feature schema: none (schema-unverified mode)"),
    }

    let mut importances = summary.feature_importances.clone();
    if importances.is_empty() {
        return;
    }
    importances.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    let max = importances
        .first()
        .map(|entry| entry.weight)
        .unwrap_or(0.0);

    println!("\nTop feature importances");
    for entry in importances.iter().take(top) {
        let width = if max > 0.0 {
            (entry.weight / max * IMPORTANCE_BAR_WIDTH).round() as usize
        } else {
            0
        };
        println!(
            "{:<28} {:>7.4} {}",
            entry.feature,
            entry.weight,
            "#".repeat(width)
        );
    }
}
