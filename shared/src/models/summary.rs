//! Exploratory dataset summary models
//!
//! The numbers behind the exploratory-analysis dashboard page, exposed as
//! data so the page does not re-derive them.

use serde::{Deserialize, Serialize};

/// Descriptive statistics for one numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub column: String,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// How often one irrigation state appears in the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateCount {
    pub state: String,
    pub count: usize,
}

/// Pearson correlation between numeric columns
///
/// `values[i][j]` correlates `columns[i]` with `columns[j]`; the diagonal
/// is always 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

/// Descriptive summary of a loaded dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub row_count: usize,
    pub columns: Vec<ColumnSummary>,
    /// Occurrences per irrigation state, in first-seen order
    pub state_counts: Vec<StateCount>,
    pub correlation: CorrelationMatrix,
}
