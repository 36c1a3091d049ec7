//! Sensor data analysis service
//!
//! The facade the menu and dashboard drive. Each instance owns its label
//! codec and trained model exclusively; instances never share them, and
//! all paths come in through [`Config`] at construction.

use std::path::PathBuf;

use shared::models::{DatasetSummary, ForecastEntry, TrainingReport};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::ml::dataset::SensorDataset;
use crate::ml::encoding::LabelCodec;
use crate::ml::forecast::forecast_next_hours;
use crate::ml::model::IrrigationClassifier;
use crate::ml::persistence::{load_model, save_model};
use crate::ml::stats::summarize;
use crate::ml::training::{train_model, TrainingOptions, TrainingOutcome};

/// Model and codec pair; the codec always matches the data the model was
/// trained on
struct TrainedState {
    model: IrrigationClassifier,
    codec: LabelCodec,
}

/// Analysis service over one sensor data source
pub struct SensorDataAnalyzer {
    source_path: PathBuf,
    artifact_path: PathBuf,
    options: TrainingOptions,
    horizon_hours: usize,
    trained: Option<TrainedState>,
    last_report: Option<TrainingReport>,
}

impl SensorDataAnalyzer {
    /// Create an analyzer from explicit configuration
    pub fn new(config: &Config) -> Self {
        Self {
            source_path: PathBuf::from(&config.data.source_path),
            artifact_path: PathBuf::from(&config.model.artifact_path),
            options: TrainingOptions {
                n_trees: config.model.n_trees,
                seed: config.model.seed,
                test_fraction: config.model.test_fraction,
            },
            horizon_hours: config.forecast.horizon_hours,
            trained: None,
            last_report: None,
        }
    }

    /// Load and flatten the configured data source
    pub fn load_data(&self) -> AppResult<SensorDataset> {
        SensorDataset::load(&self.source_path)
    }

    /// Descriptive statistics for the exploratory-analysis page
    pub fn summarize(&self) -> AppResult<DatasetSummary> {
        let dataset = self.load_data()?;
        summarize(dataset.rows())
    }

    /// Train the classifier on the data source and keep it on this instance
    pub fn train_model(&mut self) -> AppResult<TrainingReport> {
        let dataset = self.load_data()?;
        tracing::info!("Training irrigation classifier on {} readings", dataset.len());

        let TrainingOutcome {
            model,
            codec,
            report,
        } = train_model(dataset.rows(), &self.options)?;

        tracing::info!("Model trained, accuracy {:.4}", report.accuracy);
        self.trained = Some(TrainedState { model, codec });
        self.last_report = Some(report.clone());
        Ok(report)
    }

    /// Make sure a model is available: reuse the current one, otherwise
    /// load the persisted artifact, otherwise train from the data source
    ///
    /// This is the explicit composition callers use instead of relying on
    /// hidden training inside the forecasting call.
    pub fn ensure_model(&mut self) -> AppResult<()> {
        if self.trained.is_some() {
            return Ok(());
        }
        match self.load_saved_model() {
            Ok(()) => Ok(()),
            Err(AppError::NotFound(_)) => self.train_model().map(|_| ()),
            Err(e) => Err(e),
        }
    }

    /// Forecast the next hours from the last known reading
    ///
    /// Fails with [`AppError::ModelNotTrained`] when no model has been
    /// trained or loaded; compose with [`Self::ensure_model`] for the
    /// train-if-absent behavior.
    pub fn predict_next_24h(&self) -> AppResult<Vec<ForecastEntry>> {
        let state = self.trained.as_ref().ok_or(AppError::ModelNotTrained)?;

        let dataset = self.load_data()?;
        let last_row = dataset.last_row().ok_or(AppError::EmptyDataset(0))?;

        forecast_next_hours(&state.model, &state.codec, last_row, self.horizon_hours)
    }

    /// Persist the current model and codec to the configured artifact path
    pub fn save_model(&self) -> AppResult<PathBuf> {
        let state = self.trained.as_ref().ok_or(AppError::ModelNotTrained)?;

        let id = save_model(&state.codec, &state.model, &self.artifact_path)?;
        tracing::info!(
            "Model artifact {} saved to {}",
            id,
            self.artifact_path.display()
        );
        Ok(self.artifact_path.clone())
    }

    /// Replace the current model with the persisted artifact
    pub fn load_saved_model(&mut self) -> AppResult<()> {
        let artifact = load_model(&self.artifact_path)?;
        tracing::info!(
            "Model artifact {} loaded from {}",
            artifact.id,
            self.artifact_path.display()
        );
        self.trained = Some(TrainedState {
            model: artifact.model,
            codec: artifact.codec,
        });
        Ok(())
    }

    /// Report from the most recent training run on this instance
    pub fn last_report(&self) -> Option<&TrainingReport> {
        self.last_report.as_ref()
    }

    /// Whether a model is currently available
    pub fn has_model(&self) -> bool {
        self.trained.is_some()
    }
}
