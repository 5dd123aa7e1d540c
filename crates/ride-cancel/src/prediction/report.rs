use super::domain::RideInput;
use super::engine::PredictionResult;
use super::explanation::{explain, Explanation};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Input, result and explanation of a single submission, kept for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionReport {
    pub input: RideInput,
    pub result: PredictionResult,
    pub explanation: Explanation,
}

impl PredictionReport {
    pub fn new(input: RideInput, result: PredictionResult) -> Self {
        let explanation = explain(&input, &result);
        Self {
            input,
            result,
            explanation,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no prediction available to export")]
    NoResult,
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode report CSV: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Serialize)]
struct ExportRow<'a> {
    prediction: &'static str,
    prob_completed: f64,
    prob_cancelled: f64,
    override_triggered: bool,
    override_reason: &'a str,
    confidence: &'static str,
    notes: String,
}

impl<'a> From<&'a PredictionReport> for ExportRow<'a> {
    fn from(report: &'a PredictionReport) -> Self {
        Self {
            prediction: report.result.predicted_class.label(),
            prob_completed: report.result.probability_completed,
            prob_cancelled: report.result.probability_cancelled,
            override_triggered: report.result.override_triggered,
            override_reason: report.result.override_reason.as_deref().unwrap_or_default(),
            confidence: report.explanation.confidence.label(),
            notes: report.explanation.notes.join("; "),
        }
    }
}

/// Write the report as a single-row CSV with a fixed header.
pub fn write_csv<W: Write>(writer: W, report: &PredictionReport) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.serialize(ExportRow::from(report))?;
    csv_writer.flush()?;
    Ok(())
}

pub fn to_csv_bytes(report: &PredictionReport) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, report)?;
    Ok(buffer)
}

/// Write the report into `dir`, returning the created file's path.
///
/// Existing reports are never overwritten; a clashing name gets a numeric suffix.
pub fn export_csv(
    dir: &Path,
    report: &PredictionReport,
    generated_at: NaiveDateTime,
) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;
    let stem = format!(
        "ride_prediction_{}",
        generated_at.format("%Y%m%d_%H%M%S_%3f")
    );
    let (path, file) = create_unique(dir, &stem)?;
    write_csv(file, report)?;
    Ok(path)
}

fn create_unique(dir: &Path, stem: &str) -> Result<(PathBuf, File), ExportError> {
    let mut attempt = 0u32;
    loop {
        let name = match attempt {
            0 => format!("{stem}.csv"),
            n => format!("{stem}_{n}.csv"),
        };
        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(err) => return Err(err.into()),
        }
    }
}
