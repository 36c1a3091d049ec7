//! Farm registry models
//!
//! Relational entities carried in the sensor data document alongside the
//! readings. They are persisted by the CRUD layer; the analysis pipeline
//! never reads them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A cultivated crop type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropType {
    #[serde(rename = "id_cultura")]
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "data_plantio")]
    pub planted_on: NaiveDate,
}

/// A cultivation area planted with a single crop type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CultivationArea {
    #[serde(rename = "id_area")]
    pub id: i64,
    #[serde(rename = "id_cultura")]
    pub crop_type_id: i64,
    #[serde(rename = "area_extensao")]
    pub extension_hectares: f64,
    #[serde(rename = "end_localizacao")]
    pub location: String,
}

/// A physical sensor installed in a cultivation area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorDevice {
    #[serde(rename = "id_sensor")]
    pub id: i64,
    #[serde(rename = "id_area")]
    pub area_id: i64,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "modelo")]
    pub model: String,
}
