//! Sensor dataset loading and feature derivation
//!
//! Flattens the nested reading document into the tabular representation
//! the trainer consumes. Hour-of-day and day-of-week are derived from the
//! timestamp here and nowhere else, so training and forecasting cannot
//! disagree on the convention. Day-of-week runs Monday = 0 .. Sunday = 6.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike};
use shared::models::{RawReading, SensorDocument};

use crate::error::{AppError, AppResult};

/// Ordered feature names; the classifier consumes vectors in exactly this
/// order and any deviation is a contract violation.
pub const FEATURE_NAMES: [&str; 7] = ["temp", "hum", "P", "K", "pH", "hora", "dia_semana"];

/// Number of model features
pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// One flattened reading: numeric model inputs plus the retained label and
/// bookkeeping columns
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub timestamp: NaiveDateTime,
    pub temp: f64,
    pub hum: f64,
    /// Phosphorus flag encoded as 0/1
    pub p: u8,
    /// Potassium flag encoded as 0/1
    pub k: u8,
    pub ph: f64,
    /// Hour of day, 0-23
    pub hour: u32,
    /// Day of week, Monday = 0 .. Sunday = 6
    pub weekday: u32,
    pub irrigation_state: String,
    pub irrigation_reason: String,
}

impl FeatureRow {
    /// Feature vector in [`FEATURE_NAMES`] order
    pub fn features(&self) -> [f64; FEATURE_COUNT] {
        [
            self.temp,
            self.hum,
            f64::from(self.p),
            f64::from(self.k),
            self.ph,
            f64::from(self.hour),
            f64::from(self.weekday),
        ]
    }

    /// Feature vector reusing this row's environmental readings with the
    /// time features replaced, for synthetic forecast inputs
    pub fn features_at(&self, hour: u32, weekday: u32) -> [f64; FEATURE_COUNT] {
        let mut features = self.features();
        features[5] = f64::from(hour);
        features[6] = f64::from(weekday);
        features
    }
}

/// Flattened, chronologically ordered dataset
///
/// Row order mirrors the input document; the last row defines "now" for
/// forecasting.
#[derive(Debug, Clone)]
pub struct SensorDataset {
    rows: Vec<FeatureRow>,
}

impl SensorDataset {
    /// Read and flatten a sensor data document from disk
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => AppError::NotFound(path.display().to_string()),
            _ => AppError::Storage(format!("reading {}: {}", path.display(), e)),
        })?;

        let document: SensorDocument = serde_json::from_str(&raw)
            .map_err(|e| AppError::MalformedDocument(e.to_string()))?;

        Self::from_document(&document)
    }

    /// Flatten an already-parsed document
    ///
    /// Each reading is decoded individually so the error names the index of
    /// the first malformed one. No row is synthesized for a bad reading.
    pub fn from_document(document: &SensorDocument) -> AppResult<Self> {
        let mut rows = Vec::with_capacity(document.leituras.len());

        for (index, value) in document.leituras.iter().enumerate() {
            let reading: RawReading = serde_json::from_value(value.clone())
                .map_err(|e| AppError::MalformedRecord {
                    index,
                    reason: e.to_string(),
                })?;

            let timestamp = parse_timestamp(&reading.timestamp).ok_or_else(|| {
                AppError::MalformedRecord {
                    index,
                    reason: format!("unparseable timestamp \"{}\"", reading.timestamp),
                }
            })?;

            let (hour, weekday) = time_features(timestamp);

            rows.push(FeatureRow {
                timestamp,
                temp: reading.temp,
                hum: reading.hum,
                p: u8::from(reading.p),
                k: u8::from(reading.k),
                ph: reading.ph,
                hour,
                weekday,
                irrigation_state: reading.irrigation.state.clone(),
                irrigation_reason: reading.irrigation.reason.clone(),
            });
        }

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The most recent reading; defines "now" for forecasting
    pub fn last_row(&self) -> Option<&FeatureRow> {
        self.rows.last()
    }
}

/// Parse one of the accepted ISO-8601 timestamp forms
///
/// RFC 3339 input keeps its local clock time; the zone-less forms are
/// taken as-is, matching how the original exports were recorded.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
}

/// Hour-of-day and day-of-week (Monday = 0) for a timestamp
///
/// Used on both the training and forecasting paths.
pub fn time_features(timestamp: NaiveDateTime) -> (u32, u32) {
    (timestamp.hour(), timestamp.weekday().num_days_from_monday())
}
