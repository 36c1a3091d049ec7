//! Sensor reading models
//!
//! Mirrors the JSON document produced by the field controller: a top-level
//! `leituras` array of nested readings, plus the relational collections the
//! CRUD layer imports from the same file. Portuguese wire keys are kept so
//! existing exports stay loadable.

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::farm::{CropType, CultivationArea, SensorDevice};

/// Top-level sensor data document
///
/// Readings are kept as raw JSON values so the loader can report the index
/// of the first malformed reading instead of failing opaquely on the whole
/// document. The sibling collections are consumed by the CRUD layer only.
#[derive(Debug, Clone, Deserialize)]
pub struct SensorDocument {
    /// Chronologically ordered raw readings; order is significant
    pub leituras: Vec<serde_json::Value>,
    #[serde(default)]
    pub tipo_cultura: Vec<CropType>,
    #[serde(default)]
    pub area_cultivo: Vec<CultivationArea>,
    #[serde(default)]
    pub sensor: Vec<SensorDevice>,
}

/// One nested sensor sample with its irrigation sub-object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReading {
    /// ISO-8601 timestamp as written by the controller
    pub timestamp: String,
    /// Air temperature in degrees Celsius
    pub temp: f64,
    /// Relative humidity in percent
    pub hum: f64,
    /// Phosphorus sensor reading
    #[serde(rename = "P", deserialize_with = "bool_like")]
    pub p: bool,
    /// Potassium sensor reading
    #[serde(rename = "K", deserialize_with = "bool_like")]
    pub k: bool,
    /// Soil pH
    #[serde(rename = "pH")]
    pub ph: f64,
    /// Irrigation state and the reason the controller recorded for it
    #[serde(rename = "irrigacao")]
    pub irrigation: IrrigationEvent,
}

/// Irrigation state and reason recorded alongside a reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrigationEvent {
    #[serde(rename = "estado")]
    pub state: String,
    #[serde(rename = "motivo")]
    pub reason: String,
}

/// Accept JSON booleans, 0/1 integers, or "true"/"false" strings for the
/// nutrient flags. The firmware emits booleans; older exports carry 0/1.
fn bool_like<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolLike {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    match BoolLike::deserialize(deserializer)? {
        BoolLike::Bool(b) => Ok(b),
        BoolLike::Int(0) => Ok(false),
        BoolLike::Int(1) => Ok(true),
        BoolLike::Int(other) => Err(serde::de::Error::custom(format!(
            "expected 0 or 1, got {}",
            other
        ))),
        BoolLike::Text(s) => match s.to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected a boolean-like value, got \"{}\"",
                other
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading_json(p: &str, k: &str) -> String {
        format!(
            r#"{{
                "timestamp": "2024-11-02T14:00:00",
                "temp": 27.4,
                "hum": 61.0,
                "P": {},
                "K": {},
                "pH": 6.3,
                "irrigacao": {{"estado": "ligada", "motivo": "umidade baixa"}}
            }}"#,
            p, k
        )
    }

    #[test]
    fn test_reading_with_boolean_flags() {
        let reading: RawReading = serde_json::from_str(&reading_json("true", "false")).unwrap();
        assert!(reading.p);
        assert!(!reading.k);
        assert_eq!(reading.irrigation.state, "ligada");
        assert_eq!(reading.irrigation.reason, "umidade baixa");
    }

    #[test]
    fn test_reading_with_numeric_flags() {
        let reading: RawReading = serde_json::from_str(&reading_json("1", "0")).unwrap();
        assert!(reading.p);
        assert!(!reading.k);
    }

    #[test]
    fn test_reading_with_string_flags() {
        let reading: RawReading =
            serde_json::from_str(&reading_json("\"true\"", "\"false\"")).unwrap();
        assert!(reading.p);
        assert!(!reading.k);
    }

    #[test]
    fn test_reading_rejects_out_of_domain_flag() {
        assert!(serde_json::from_str::<RawReading>(&reading_json("7", "0")).is_err());
    }

    #[test]
    fn test_reading_requires_irrigation_fields() {
        let json = r#"{
            "timestamp": "2024-11-02T14:00:00",
            "temp": 27.4,
            "hum": 61.0,
            "P": true,
            "K": false,
            "pH": 6.3,
            "irrigacao": {"estado": "ligada"}
        }"#;
        assert!(serde_json::from_str::<RawReading>(json).is_err());
    }

    #[test]
    fn test_document_sibling_collections_are_optional() {
        let json = r#"{"leituras": []}"#;
        let doc: SensorDocument = serde_json::from_str(json).unwrap();
        assert!(doc.leituras.is_empty());
        assert!(doc.tipo_cultura.is_empty());
        assert!(doc.area_cultivo.is_empty());
        assert!(doc.sensor.is_empty());
    }
}
