//! Business logic services for the Farm Sensor Monitoring Platform

pub mod analysis;

pub use analysis::SensorDataAnalyzer;
