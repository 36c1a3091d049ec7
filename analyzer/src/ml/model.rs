//! Irrigation-state classifier
//!
//! A bagged ensemble of decision trees over the 7-column feature vector.
//! Each tree is fit on a bootstrap resample drawn from a deterministic RNG,
//! so two fits with the same data and seed produce identical models. The
//! class distribution of a prediction is the fraction of trees voting for
//! each class.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_classifier::{
    DecisionTreeClassifier, DecisionTreeClassifierParameters,
};

use crate::error::{AppError, AppResult};
use crate::ml::dataset::FEATURE_COUNT;

type Tree = DecisionTreeClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>;

/// Ensemble of decision trees voting on the irrigation-state code
#[derive(Debug, Serialize, Deserialize)]
pub struct IrrigationClassifier {
    trees: Vec<Tree>,
    n_classes: usize,
}

/// One prediction with its full class distribution
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Winning class code; ties go to the lowest code
    pub code: u32,
    /// `probabilities[c]` is the fraction of trees voting for class `c`;
    /// the entries sum to 1.0
    pub probabilities: Vec<f64>,
}

impl IrrigationClassifier {
    /// Fit `n_trees` trees on bootstrap resamples of the training data
    ///
    /// `targets` must be codes below `n_classes`. The caller guards the
    /// dataset-size and label-diversity preconditions; this only checks
    /// structural consistency.
    pub fn fit(
        features: &[[f64; FEATURE_COUNT]],
        targets: &[u32],
        n_classes: usize,
        n_trees: usize,
        seed: u64,
    ) -> AppResult<Self> {
        if features.is_empty() || n_trees == 0 {
            return Err(AppError::Internal(
                "classifier fit requires at least one sample and one tree".to_string(),
            ));
        }
        if features.len() != targets.len() {
            return Err(AppError::Internal(format!(
                "feature/target length mismatch: {} vs {}",
                features.len(),
                targets.len()
            )));
        }

        let n_samples = features.len();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut trees = Vec::with_capacity(n_trees);

        for _ in 0..n_trees {
            let mut flat = Vec::with_capacity(n_samples * FEATURE_COUNT);
            let mut y = Vec::with_capacity(n_samples);
            for _ in 0..n_samples {
                let pick = rng.gen_range(0..n_samples);
                flat.extend_from_slice(&features[pick]);
                y.push(targets[pick]);
            }

            let matrix = DenseMatrix::new(n_samples, FEATURE_COUNT, flat, false);
            let tree: Tree =
                DecisionTreeClassifier::fit(&matrix, &y, DecisionTreeClassifierParameters::default())
                    .map_err(|e| AppError::Internal(format!("decision tree fit failed: {}", e)))?;
            trees.push(tree);
        }

        Ok(Self { trees, n_classes })
    }

    /// Predict the class and vote distribution for one feature vector
    pub fn predict(&self, features: &[f64; FEATURE_COUNT]) -> AppResult<Prediction> {
        let matrix = DenseMatrix::new(1, FEATURE_COUNT, features.to_vec(), false);

        let mut votes = vec![0usize; self.n_classes];
        for tree in &self.trees {
            let predicted = tree
                .predict(&matrix)
                .map_err(|e| AppError::Internal(format!("tree prediction failed: {}", e)))?;
            let code = predicted[0] as usize;
            if code >= votes.len() {
                return Err(AppError::Internal(format!(
                    "tree voted for out-of-range class {}",
                    code
                )));
            }
            votes[code] += 1;
        }

        let total = self.trees.len() as f64;
        let probabilities: Vec<f64> = votes.iter().map(|&v| v as f64 / total).collect();

        let mut best = 0;
        for (code, &probability) in probabilities.iter().enumerate() {
            if probability > probabilities[best] {
                best = code;
            }
        }

        Ok(Prediction {
            code: best as u32,
            probabilities,
        })
    }

    /// Predict each row of a batch
    pub fn predict_batch(
        &self,
        rows: &[[f64; FEATURE_COUNT]],
    ) -> AppResult<Vec<Prediction>> {
        rows.iter().map(|row| self.predict(row)).collect()
    }

    /// Number of classes the ensemble votes over
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Number of trees in the ensemble
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}
