//! Error handling for the Farm Sensor Monitoring Platform
//!
//! The pipeline fails fast and surfaces the specific error kind; callers
//! (menu, dashboard) decide how to present it. No retries happen here.

use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Input errors
    #[error("malformed reading at index {index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    #[error("malformed sensor document: {0}")]
    MalformedDocument(String),

    // Label encoding errors
    #[error("unknown irrigation-state label: {0}")]
    UnknownLabel(String),

    #[error("unknown irrigation-state code: {0}")]
    UnknownCode(u32),

    // Training errors
    #[error("dataset has {0} rows; at least 2 are required for training")]
    EmptyDataset(usize),

    #[error("training partition only contains the label \"{0}\"; the classifier cannot discriminate")]
    DegenerateLabels(String),

    #[error("no trained model available; train or load one first")]
    ModelNotTrained,

    // Persistence errors
    #[error("model artifact not found: {0}")]
    NotFound(String),

    #[error("corrupt model artifact: {0}")]
    CorruptArtifact(String),

    #[error("storage error: {0}")]
    Storage(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for the pipeline
pub type AppResult<T> = Result<T, AppError>;
