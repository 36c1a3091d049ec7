//! Hourly irrigation forecast
//!
//! Projects the classifier across the next hourly slots after the last
//! known reading. Environmental readings stay frozen across the horizon;
//! only the time-derived features advance. That is a known modeling
//! simplification of the deployed system, kept deliberately.

use chrono::Duration;
use shared::models::ForecastEntry;

use crate::error::AppResult;
use crate::ml::dataset::{time_features, FeatureRow};
use crate::ml::encoding::LabelCodec;
use crate::ml::model::IrrigationClassifier;

/// Default forecast horizon in hours
pub const DEFAULT_HORIZON_HOURS: usize = 24;

/// Predict the irrigation state for each of the next `horizon` hours
///
/// Requires an already trained (or loaded) model together with the codec
/// that encoded its labels; callers wanting train-on-demand compose that
/// explicitly before calling (see `SensorDataAnalyzer::ensure_model`).
/// Entries come back in strictly ascending order, one per hour, starting
/// one hour after `last_row`.
pub fn forecast_next_hours(
    model: &IrrigationClassifier,
    codec: &LabelCodec,
    last_row: &FeatureRow,
    horizon: usize,
) -> AppResult<Vec<ForecastEntry>> {
    let mut entries = Vec::with_capacity(horizon);

    for offset in 1..=horizon as i64 {
        let timestamp = last_row.timestamp + Duration::hours(offset);
        let (hour, weekday) = time_features(timestamp);

        let prediction = model.predict(&last_row.features_at(hour, weekday))?;
        let probability = prediction
            .probabilities
            .iter()
            .copied()
            .fold(0.0_f64, f64::max);

        entries.push(ForecastEntry {
            timestamp,
            predicted_state: codec.decode(prediction.code)?.to_string(),
            probability,
        });
    }

    Ok(entries)
}
