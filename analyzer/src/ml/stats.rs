//! Exploratory dataset summary
//!
//! Descriptive statistics for the dashboard's exploratory-analysis page:
//! per-column spread, irrigation-state counts and the correlation between
//! the continuous sensor columns.

use shared::models::{ColumnSummary, CorrelationMatrix, DatasetSummary, StateCount};

use crate::error::{AppError, AppResult};
use crate::ml::dataset::FeatureRow;

/// Continuous columns the summary describes
const NUMERIC_COLUMNS: [&str; 3] = ["temp", "hum", "pH"];

/// Summarize a flattened dataset
pub fn summarize(rows: &[FeatureRow]) -> AppResult<DatasetSummary> {
    if rows.is_empty() {
        return Err(AppError::EmptyDataset(0));
    }

    let series: [Vec<f64>; 3] = [
        rows.iter().map(|row| row.temp).collect(),
        rows.iter().map(|row| row.hum).collect(),
        rows.iter().map(|row| row.ph).collect(),
    ];

    let columns = NUMERIC_COLUMNS
        .iter()
        .zip(&series)
        .map(|(name, values)| ColumnSummary {
            column: name.to_string(),
            mean: mean(values),
            std_dev: std_dev(values),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
        .collect();

    let mut state_counts: Vec<StateCount> = Vec::new();
    for row in rows {
        match state_counts
            .iter_mut()
            .find(|entry| entry.state == row.irrigation_state)
        {
            Some(entry) => entry.count += 1,
            None => state_counts.push(StateCount {
                state: row.irrigation_state.clone(),
                count: 1,
            }),
        }
    }

    let values = (0..series.len())
        .map(|i| {
            (0..series.len())
                .map(|j| {
                    if i == j {
                        1.0
                    } else {
                        pearson(&series[i], &series[j])
                    }
                })
                .collect()
        })
        .collect();

    Ok(DatasetSummary {
        row_count: rows.len(),
        columns,
        state_counts,
        correlation: CorrelationMatrix {
            columns: NUMERIC_COLUMNS.iter().map(|name| name.to_string()).collect(),
            values,
        },
    })
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation; 0.0 for a single observation
fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let center = mean(values);
    let variance = values
        .iter()
        .map(|value| (value - center).powi(2))
        .sum::<f64>()
        / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Pearson correlation; 0.0 when either column has no variance
fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let mean_a = mean(a);
    let mean_b = mean(b);

    let mut covariance = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        covariance += (x - mean_a) * (y - mean_b);
        var_a += (x - mean_a).powi(2);
        var_b += (y - mean_b).powi(2);
    }

    let denominator = (var_a * var_b).sqrt();
    if denominator == 0.0 {
        0.0
    } else {
        covariance / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::dataset::parse_timestamp;

    fn row(temp: f64, hum: f64, ph: f64, state: &str) -> FeatureRow {
        FeatureRow {
            timestamp: parse_timestamp("2024-11-04T08:00:00").unwrap(),
            temp,
            hum,
            p: 1,
            k: 0,
            ph,
            hour: 8,
            weekday: 0,
            irrigation_state: state.to_string(),
            irrigation_reason: "teste".to_string(),
        }
    }

    #[test]
    fn test_summary_counts_and_columns() {
        let rows = vec![
            row(20.0, 50.0, 6.0, "ligada"),
            row(30.0, 70.0, 7.0, "desligada"),
            row(25.0, 60.0, 6.5, "ligada"),
        ];

        let summary = summarize(&rows).unwrap();
        assert_eq!(summary.row_count, 3);
        assert_eq!(summary.columns.len(), 3);

        let temp = &summary.columns[0];
        assert_eq!(temp.column, "temp");
        assert!((temp.mean - 25.0).abs() < 1e-9);
        assert_eq!(temp.min, 20.0);
        assert_eq!(temp.max, 30.0);

        // First-seen order, counts summing to the row count
        assert_eq!(summary.state_counts[0].state, "ligada");
        assert_eq!(summary.state_counts[0].count, 2);
        assert_eq!(summary.state_counts[1].count, 1);
        let total: usize = summary.state_counts.iter().map(|entry| entry.count).sum();
        assert_eq!(total, summary.row_count);
    }

    #[test]
    fn test_correlation_diagonal_and_symmetry() {
        let rows = vec![
            row(20.0, 52.0, 6.1, "ligada"),
            row(24.0, 58.0, 6.3, "ligada"),
            row(28.0, 64.0, 6.2, "desligada"),
            row(32.0, 71.0, 6.6, "desligada"),
        ];

        let summary = summarize(&rows).unwrap();
        let matrix = &summary.correlation;
        for i in 0..3 {
            assert_eq!(matrix.values[i][i], 1.0);
            for j in 0..3 {
                assert!((matrix.values[i][j] - matrix.values[j][i]).abs() < 1e-9);
                assert!(matrix.values[i][j].abs() <= 1.0 + 1e-9);
            }
        }

        // temp and hum rise together in this data
        assert!(matrix.values[0][1] > 0.9);
    }

    #[test]
    fn test_zero_variance_column_yields_zero_correlation() {
        let rows = vec![
            row(25.0, 50.0, 6.0, "ligada"),
            row(25.0, 60.0, 6.5, "ligada"),
            row(25.0, 70.0, 7.0, "desligada"),
        ];

        let summary = summarize(&rows).unwrap();
        assert_eq!(summary.correlation.values[0][1], 0.0);
        assert_eq!(summary.correlation.values[0][0], 1.0);
        assert_eq!(summary.columns[0].std_dev, 0.0);
    }

    #[test]
    fn test_empty_dataset_rejected() {
        assert!(matches!(summarize(&[]), Err(AppError::EmptyDataset(0))));
    }
}
