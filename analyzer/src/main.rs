//! Farm Sensor Monitoring Platform - Analysis Pipeline
//!
//! Trains the irrigation classifier on the exported sensor readings,
//! reports the evaluation metrics, projects the next 24 hours and persists
//! the trained model for the dashboard.

use farm_sensor_analyzer::config::Config;
use farm_sensor_analyzer::services::SensorDataAnalyzer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fsm_analyzer=info,farm_sensor_analyzer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Farm Sensor Monitoring analysis pipeline");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Data source: {}", config.data.source_path);

    let mut analyzer = SensorDataAnalyzer::new(&config);

    // Train and report
    let report = analyzer.train_model()?;

    tracing::info!("Accuracy: {:.2}", report.accuracy);
    for entry in &report.feature_importance {
        tracing::info!("Feature importance: {} = {:.4}", entry.feature, entry.importance);
    }
    for class in &report.classification_report.classes {
        tracing::info!(
            "Class {}: precision {:.2}, recall {:.2}, f1 {:.2}, support {}",
            class.label,
            class.precision,
            class.recall,
            class.f1_score,
            class.support
        );
    }

    // Forecast the next 24 hours
    let predictions = analyzer.predict_next_24h()?;
    tracing::info!("Forecast for the next {} hours:", predictions.len());
    for prediction in &predictions {
        tracing::info!(
            "{}: {} (probability {:.2})",
            prediction.timestamp,
            prediction.predicted_state,
            prediction.probability
        );
    }

    // Persist the trained model
    let path = analyzer.save_model()?;
    tracing::info!("Model saved to {}", path.display());

    Ok(())
}
