//! Training pipeline for the irrigation classifier
//!
//! Splits the flattened dataset 80/20 with a fixed seed, fits the ensemble
//! on the training partition and evaluates it on the held-out partition.
//! Everything the trainer reports is structured data; formatting belongs to
//! the dashboard.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use shared::models::{
    AverageMetrics, ClassMetrics, ClassificationReport, ConfusionMatrix, FeatureImportance,
    TrainingReport,
};

use crate::error::{AppError, AppResult};
use crate::ml::dataset::{FeatureRow, FEATURE_COUNT, FEATURE_NAMES};
use crate::ml::encoding::LabelCodec;
use crate::ml::model::IrrigationClassifier;

/// Knobs for a training run
#[derive(Debug, Clone)]
pub struct TrainingOptions {
    /// Number of trees in the ensemble
    pub n_trees: usize,
    /// Seed for the split, the bootstrap resamples and the importance
    /// permutations
    pub seed: u64,
    /// Fraction of rows held out for evaluation
    pub test_fraction: f64,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            n_trees: 100,
            seed: 42,
            test_fraction: 0.2,
        }
    }
}

/// A trained model, the codec that owns its label space, and the
/// evaluation report
#[derive(Debug)]
pub struct TrainingOutcome {
    pub model: IrrigationClassifier,
    pub codec: LabelCodec,
    pub report: TrainingReport,
}

/// Train and evaluate the classifier over the flattened dataset
pub fn train_model(rows: &[FeatureRow], options: &TrainingOptions) -> AppResult<TrainingOutcome> {
    if rows.len() < 2 {
        return Err(AppError::EmptyDataset(rows.len()));
    }

    // The codec is fit once over the full corpus before any encoding; the
    // same instance decodes predictions later.
    let codec = LabelCodec::fit(rows.iter().map(|row| row.irrigation_state.as_str()));

    let features: Vec<[f64; FEATURE_COUNT]> = rows.iter().map(FeatureRow::features).collect();
    let targets: Vec<u32> = rows
        .iter()
        .map(|row| codec.encode(&row.irrigation_state))
        .collect::<AppResult<_>>()?;

    let (train_indices, test_indices) =
        split_indices(rows.len(), options.test_fraction, options.seed);

    let train_x: Vec<[f64; FEATURE_COUNT]> =
        train_indices.iter().map(|&i| features[i]).collect();
    let train_y: Vec<u32> = train_indices.iter().map(|&i| targets[i]).collect();
    let test_x: Vec<[f64; FEATURE_COUNT]> = test_indices.iter().map(|&i| features[i]).collect();
    let test_y: Vec<u32> = test_indices.iter().map(|&i| targets[i]).collect();

    let first = train_y[0];
    if train_y.iter().all(|&code| code == first) {
        return Err(AppError::DegenerateLabels(codec.decode(first)?.to_string()));
    }

    let model = IrrigationClassifier::fit(
        &train_x,
        &train_y,
        codec.len(),
        options.n_trees,
        options.seed,
    )?;

    let predicted: Vec<u32> = model
        .predict_batch(&test_x)?
        .iter()
        .map(|prediction| prediction.code)
        .collect();

    let accuracy = accuracy(&predicted, &test_y);
    let feature_importance =
        permutation_importance(&model, &test_x, &test_y, accuracy, options.seed)?;
    let classification_report = classification_report(&codec, &test_y, &predicted, accuracy)?;
    let confusion_matrix = confusion_matrix(&codec, &test_y, &predicted)?;

    Ok(TrainingOutcome {
        model,
        codec,
        report: TrainingReport {
            accuracy,
            feature_importance,
            classification_report,
            confusion_matrix,
        },
    })
}

/// Shuffled, unstratified split of `0..n` into train and test indices
///
/// The test size rounds up so the evaluation partition is never empty, and
/// at least one row always stays in the training partition.
fn split_indices(n: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));

    let n_test = ((n as f64 * test_fraction).ceil() as usize).clamp(1, n - 1);
    let test = indices[..n_test].to_vec();
    let train = indices[n_test..].to_vec();
    (train, test)
}

/// Fraction of predictions exactly matching the true code
fn accuracy(predicted: &[u32], truth: &[u32]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let correct = predicted
        .iter()
        .zip(truth)
        .filter(|(p, t)| p == t)
        .count();
    correct as f64 / truth.len() as f64
}

/// Permutation importance over the test partition
///
/// One column at a time is shuffled (seeded) and the accuracy drop against
/// the baseline is recorded. Negative drops count as zero; scores are
/// normalized to sum 1.0, falling back to a uniform ranking when the model
/// is insensitive to every column.
fn permutation_importance(
    model: &IrrigationClassifier,
    test_x: &[[f64; FEATURE_COUNT]],
    test_y: &[u32],
    baseline: f64,
    seed: u64,
) -> AppResult<Vec<FeatureImportance>> {
    let mut drops = [0.0f64; FEATURE_COUNT];

    for feature in 0..FEATURE_COUNT {
        let mut column: Vec<f64> = test_x.iter().map(|row| row[feature]).collect();
        column.shuffle(&mut StdRng::seed_from_u64(
            seed.wrapping_add(feature as u64 + 1),
        ));

        let mut permuted = test_x.to_vec();
        for (row, value) in permuted.iter_mut().zip(column) {
            row[feature] = value;
        }

        let predicted: Vec<u32> = model
            .predict_batch(&permuted)?
            .iter()
            .map(|prediction| prediction.code)
            .collect();
        drops[feature] = (baseline - accuracy(&predicted, test_y)).max(0.0);
    }

    let total: f64 = drops.iter().sum();
    let mut ranking: Vec<FeatureImportance> = FEATURE_NAMES
        .iter()
        .zip(drops)
        .map(|(name, drop)| FeatureImportance {
            feature: name.to_string(),
            importance: if total > 0.0 {
                drop / total
            } else {
                1.0 / FEATURE_COUNT as f64
            },
        })
        .collect();

    ranking.sort_by(|a, b| {
        b.importance
            .partial_cmp(&a.importance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(ranking)
}

/// Per-class precision/recall/F1 with macro and support-weighted averages
fn classification_report(
    codec: &LabelCodec,
    truth: &[u32],
    predicted: &[u32],
    accuracy: f64,
) -> AppResult<ClassificationReport> {
    let n_classes = codec.len();
    let total = truth.len();
    let mut classes = Vec::with_capacity(n_classes);

    let mut macro_sums = (0.0, 0.0, 0.0);
    let mut weighted_sums = (0.0, 0.0, 0.0);

    for code in 0..n_classes as u32 {
        let true_positives = truth
            .iter()
            .zip(predicted)
            .filter(|(t, p)| **t == code && **p == code)
            .count();
        let predicted_positives = predicted.iter().filter(|&&p| p == code).count();
        let support = truth.iter().filter(|&&t| t == code).count();

        let precision = ratio(true_positives, predicted_positives);
        let recall = ratio(true_positives, support);
        let f1_score = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        macro_sums.0 += precision;
        macro_sums.1 += recall;
        macro_sums.2 += f1_score;

        let weight = support as f64;
        weighted_sums.0 += precision * weight;
        weighted_sums.1 += recall * weight;
        weighted_sums.2 += f1_score * weight;

        classes.push(ClassMetrics {
            label: codec.decode(code)?.to_string(),
            precision,
            recall,
            f1_score,
            support,
        });
    }

    let class_count = n_classes.max(1) as f64;
    let sample_count = total.max(1) as f64;

    Ok(ClassificationReport {
        classes,
        macro_avg: AverageMetrics {
            precision: macro_sums.0 / class_count,
            recall: macro_sums.1 / class_count,
            f1_score: macro_sums.2 / class_count,
        },
        weighted_avg: AverageMetrics {
            precision: weighted_sums.0 / sample_count,
            recall: weighted_sums.1 / sample_count,
            f1_score: weighted_sums.2 / sample_count,
        },
        accuracy,
    })
}

/// Class-by-class count matrix; `counts[true][predicted]`
fn confusion_matrix(
    codec: &LabelCodec,
    truth: &[u32],
    predicted: &[u32],
) -> AppResult<ConfusionMatrix> {
    let n_classes = codec.len();
    let mut counts = vec![vec![0usize; n_classes]; n_classes];

    for (&t, &p) in truth.iter().zip(predicted) {
        counts[t as usize][p as usize] += 1;
    }

    let labels = (0..n_classes as u32)
        .map(|code| codec.decode(code).map(str::to_string))
        .collect::<AppResult<_>>()?;

    Ok(ConfusionMatrix { labels, counts })
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_is_deterministic() {
        let (train_a, test_a) = split_indices(50, 0.2, 42);
        let (train_b, test_b) = split_indices(50, 0.2, 42);
        assert_eq!(train_a, train_b);
        assert_eq!(test_a, test_b);
    }

    #[test]
    fn test_split_sizes_round_up_test() {
        let (train, test) = split_indices(10, 0.25, 42);
        assert_eq!(test.len(), 3);
        assert_eq!(train.len(), 7);
    }

    #[test]
    fn test_split_never_empties_either_partition() {
        let (train, test) = split_indices(2, 0.2, 42);
        assert_eq!(train.len(), 1);
        assert_eq!(test.len(), 1);
    }

    #[test]
    fn test_split_partitions_are_disjoint_and_complete() {
        let (mut train, mut test) = split_indices(23, 0.2, 9);
        train.append(&mut test);
        train.sort_unstable();
        assert_eq!(train, (0..23).collect::<Vec<_>>());
    }

    #[test]
    fn test_accuracy() {
        assert_eq!(accuracy(&[0, 1, 1, 0], &[0, 1, 0, 0]), 0.75);
        assert_eq!(accuracy(&[], &[]), 0.0);
    }

    #[test]
    fn test_classification_report_perfect_predictions() {
        let codec = LabelCodec::fit(["desligada", "ligada"]);
        let truth = [0, 0, 1, 1, 1];
        let report = classification_report(&codec, &truth, &truth, 1.0).unwrap();

        assert_eq!(report.classes.len(), 2);
        for class in &report.classes {
            assert_eq!(class.precision, 1.0);
            assert_eq!(class.recall, 1.0);
            assert_eq!(class.f1_score, 1.0);
        }
        assert_eq!(report.classes[0].support, 2);
        assert_eq!(report.classes[1].support, 3);
        assert_eq!(report.macro_avg.f1_score, 1.0);
        assert_eq!(report.weighted_avg.f1_score, 1.0);
    }

    #[test]
    fn test_classification_report_handles_absent_predictions() {
        let codec = LabelCodec::fit(["desligada", "ligada"]);
        // Class 1 is never predicted: precision and recall must be 0, not NaN.
        let report = classification_report(&codec, &[0, 1], &[0, 0], 0.5).unwrap();
        let ligada = &report.classes[1];
        assert_eq!(ligada.precision, 0.0);
        assert_eq!(ligada.recall, 0.0);
        assert_eq!(ligada.f1_score, 0.0);
    }

    #[test]
    fn test_confusion_matrix_counts() {
        let codec = LabelCodec::fit(["desligada", "ligada"]);
        let matrix = confusion_matrix(&codec, &[0, 0, 1, 1], &[0, 1, 1, 1]).unwrap();

        assert_eq!(matrix.labels, vec!["desligada", "ligada"]);
        assert_eq!(matrix.counts, vec![vec![1, 1], vec![0, 2]]);
        assert_eq!(matrix.total(), 4);
        assert_eq!(matrix.correct(), 3);
    }
}
