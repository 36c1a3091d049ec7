//! Forecast models

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One hourly irrigation-state prediction with its confidence
///
/// Produced in strictly increasing timestamp order, one entry per hour.
/// The dashboard consumes this structure verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Future timestamp the prediction applies to
    pub timestamp: NaiveDateTime,
    /// Decoded irrigation-state label
    #[serde(rename = "previsao")]
    pub predicted_state: String,
    /// Highest class probability, in [0, 1]
    #[serde(rename = "probabilidade")]
    pub probability: f64,
}
