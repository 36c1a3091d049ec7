//! Model evaluation models
//!
//! Structured training metrics for the dashboard. The pipeline never
//! preformats these as strings; rendering is the presentation layer's job.

use serde::{Deserialize, Serialize};

/// Relative contribution of one feature to the model's decisions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    /// Non-negative; importances across all features sum to 1.0
    pub importance: f64,
}

/// Precision/recall/F1 for a single irrigation-state class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    /// Number of test samples whose true class is this one
    pub support: usize,
}

/// Unweighted or support-weighted metric averages across classes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

/// Per-class metrics over the test partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub macro_avg: AverageMetrics,
    pub weighted_avg: AverageMetrics,
    pub accuracy: f64,
}

/// Class-by-class count matrix over the test partition
///
/// `counts[i][j]` is the number of test samples with true class `labels[i]`
/// predicted as `labels[j]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub labels: Vec<String>,
    pub counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    /// Total number of test samples counted in the matrix
    pub fn total(&self) -> usize {
        self.counts.iter().map(|row| row.iter().sum::<usize>()).sum()
    }

    /// Samples on the diagonal (predicted correctly)
    pub fn correct(&self) -> usize {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, row)| row.get(i).copied().unwrap_or(0))
            .sum()
    }
}

/// Everything the trainer reports after a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Fraction of test-partition predictions matching the true class
    pub accuracy: f64,
    /// Ranked descending by importance
    pub feature_importance: Vec<FeatureImportance>,
    pub classification_report: ClassificationReport,
    pub confusion_matrix: ConfusionMatrix,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confusion_matrix_totals() {
        let matrix = ConfusionMatrix {
            labels: vec!["desligada".to_string(), "ligada".to_string()],
            counts: vec![vec![8, 2], vec![1, 9]],
        };
        assert_eq!(matrix.total(), 20);
        assert_eq!(matrix.correct(), 17);
    }

    #[test]
    fn test_confusion_matrix_empty() {
        let matrix = ConfusionMatrix {
            labels: vec![],
            counts: vec![],
        };
        assert_eq!(matrix.total(), 0);
        assert_eq!(matrix.correct(), 0);
    }
}
