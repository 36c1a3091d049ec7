//! Shared types and models for the Farm Sensor Monitoring Platform
//!
//! This crate contains the wire-format types shared between the analysis
//! pipeline, the database CRUD layer and the dashboard, so every component
//! compiles against the same definitions.

pub mod models;

pub use models::*;
