use super::features::RawFeatureRecord;
use serde::Serialize;
use tracing::{debug, warn};

/// How the encoded columns relate to the model's declared schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SchemaAlignment {
    /// Columns match the declared schema exactly. Lists what had to be repaired.
    Verified {
        zero_filled: Vec<String>,
        dropped: Vec<String>,
    },
    /// No schema was declared; columns are the raw one-hot expansion.
    Unverified,
}

/// Ordered column/value mapping handed to the classifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodedFeatureVector {
    columns: Vec<String>,
    values: Vec<f64>,
    alignment: SchemaAlignment,
}

impl EncodedFeatureVector {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|name| name == column)
            .map(|idx| self.values[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    pub fn alignment(&self) -> &SchemaAlignment {
        &self.alignment
    }

    pub fn is_schema_verified(&self) -> bool {
        matches!(self.alignment, SchemaAlignment::Verified { .. })
    }
}

pub fn one_hot_column(field: &str, value: &str) -> String {
    format!("{field}_{value}")
}

/// Expand categoricals and align the row to `expected_columns` when given.
///
/// Expected columns missing from the expansion are zero-filled and columns the
/// schema does not list are dropped. Without a schema the expansion passes
/// through untouched and the vector is marked unverified.
pub fn encode(
    record: &RawFeatureRecord,
    expected_columns: Option<&[String]>,
) -> EncodedFeatureVector {
    let mut expanded: Vec<(String, f64)> = record
        .numeric_columns()
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect();
    for (field, value) in record.categorical_columns() {
        expanded.push((one_hot_column(field, value), 1.0));
    }

    let Some(expected) = expected_columns else {
        warn!(
            columns = expanded.len(),
            "model declares no feature schema; prediction is schema-unverified"
        );
        let (columns, values) = expanded.into_iter().unzip();
        return EncodedFeatureVector {
            columns,
            values,
            alignment: SchemaAlignment::Unverified,
        };
    };

    let mut zero_filled = Vec::new();
    let mut values = Vec::with_capacity(expected.len());
    for column in expected {
        match expanded.iter().find(|(name, _)| name == column) {
            Some((_, value)) => values.push(*value),
            None => {
                zero_filled.push(column.clone());
                values.push(0.0);
            }
        }
    }

    let dropped: Vec<String> = expanded
        .into_iter()
        .filter(|(name, _)| !expected.contains(name))
        .map(|(name, _)| name)
        .collect();

    if dropped.is_empty() {
        debug!(
            zero_filled = zero_filled.len(),
            "encoded row aligned to model schema"
        );
    } else {
        warn!(
            ?dropped,
            zero_filled = zero_filled.len(),
            "encoded columns missing from model schema were dropped"
        );
    }

    EncodedFeatureVector {
        columns: expected.to_vec(),
        values,
        alignment: SchemaAlignment::Verified {
            zero_filled,
            dropped,
        },
    }
}
