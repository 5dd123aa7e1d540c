use crate::console::{run_model_summary, run_predict, ModelArgs, PredictArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use ride_cancel::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Ride Cancellation Predictor",
    about = "Predict whether a ride will be completed or cancelled",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Predict a single ride from the command line
    Predict(PredictArgs),
    /// Describe the loaded model artifact
    Model(ModelArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured model artifact path
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Predict(args) => run_predict(args),
        Command::Model(args) => run_model_summary(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_command_parses_form_labels() {
        let cli = Cli::try_parse_from([
            "ride-cancel",
            "predict",
            "--distance",
            "12.5",
            "--vehicle",
            "Go Sedan",
            "--booking-value",
            "320",
            "--payment",
            "credit card",
            "--hour",
            "22",
            "--weekend",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Predict(args)) => {
                let input = args.ride_input();
                assert_eq!(input.ride_distance_km, 12.5);
                assert_eq!(input.vehicle_type.label(), "Go Sedan");
                assert_eq!(input.payment_method.label(), "Credit Card");
                assert_eq!(input.hour_of_day, 22);
                assert_eq!(input.driver_rating, 4.2);
                assert!(input.is_weekend);
            }
            other => panic!("expected predict command, got {other:?}"),
        }
    }

    #[test]
    fn predict_command_rejects_out_of_range_hour() {
        let result = Cli::try_parse_from(["ride-cancel", "predict", "--hour", "24"]);
        assert!(result.is_err());
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["ride-cancel"]).expect("no arguments parse");
        assert!(cli.command.is_none());
    }
}
