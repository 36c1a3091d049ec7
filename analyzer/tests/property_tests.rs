//! Property-based tests for the codec, time derivation and forecast horizon

use std::sync::OnceLock;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use farm_sensor_analyzer::ml::dataset::{parse_timestamp, time_features, FeatureRow};
use farm_sensor_analyzer::ml::encoding::LabelCodec;
use farm_sensor_analyzer::ml::forecast::forecast_next_hours;
use farm_sensor_analyzer::ml::model::IrrigationClassifier;
use proptest::prelude::*;

fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2020, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// One small model shared across proptest cases; only the start timestamp
/// varies per case.
fn shared_model() -> &'static (IrrigationClassifier, LabelCodec) {
    static MODEL: OnceLock<(IrrigationClassifier, LabelCodec)> = OnceLock::new();
    MODEL.get_or_init(|| {
        let codec = LabelCodec::fit(["desligada", "ligada"]);

        let mut features = Vec::new();
        let mut targets = Vec::new();
        for i in 0..20 {
            let jitter = f64::from(i) * 0.1;
            features.push([20.0 + jitter, 80.0, 1.0, 0.0, 6.5, 6.0, 1.0]);
            targets.push(0);
            features.push([34.0 + jitter, 30.0, 0.0, 1.0, 5.5, 15.0, 4.0]);
            targets.push(1);
        }

        let model = IrrigationClassifier::fit(&features, &targets, 2, 5, 42).unwrap();
        (model, codec)
    })
}

proptest! {
    #[test]
    fn codec_round_trips_every_fitted_label(
        labels in proptest::collection::vec("[a-z]{1,12}", 1..20)
    ) {
        let codec = LabelCodec::fit(labels.iter().map(String::as_str));

        for label in &labels {
            let code = codec.encode(label).unwrap();
            prop_assert_eq!(codec.decode(code).unwrap(), label.as_str());
        }

        // Codes are contiguous: every code below len decodes, the next fails.
        for code in 0..codec.len() as u32 {
            prop_assert!(codec.decode(code).is_ok());
        }
        prop_assert!(codec.decode(codec.len() as u32).is_err());
    }

    #[test]
    fn time_features_stay_in_range(
        days in 0i64..3650,
        hours in 0i64..24,
        minutes in 0i64..60
    ) {
        let timestamp =
            epoch() + Duration::days(days) + Duration::hours(hours) + Duration::minutes(minutes);

        let (hour, weekday) = time_features(timestamp);
        prop_assert!(hour <= 23);
        prop_assert!(weekday <= 6);
        prop_assert_eq!(hour as i64, hours);
    }

    #[test]
    fn parse_round_trips_formatted_timestamps(days in 0i64..3650, secs in 0i64..86400) {
        let timestamp = epoch() + Duration::days(days) + Duration::seconds(secs);
        let formatted = timestamp.format("%Y-%m-%dT%H:%M:%S").to_string();

        prop_assert_eq!(parse_timestamp(&formatted), Some(timestamp));
    }

    #[test]
    fn forecast_horizon_holds_for_any_start(days in 0i64..3650, secs in 0i64..86400) {
        let timestamp = epoch() + Duration::days(days) + Duration::seconds(secs);
        let (hour, weekday) = time_features(timestamp);
        let (model, codec) = shared_model();

        let last_row = FeatureRow {
            timestamp,
            temp: 25.0,
            hum: 60.0,
            p: 1,
            k: 0,
            ph: 6.2,
            hour,
            weekday,
            irrigation_state: "ligada".to_string(),
            irrigation_reason: "umidade baixa".to_string(),
        };

        let entries = forecast_next_hours(model, codec, &last_row, 24).unwrap();
        prop_assert_eq!(entries.len(), 24);
        prop_assert_eq!(entries[0].timestamp, timestamp + Duration::hours(1));

        for pair in entries.windows(2) {
            prop_assert_eq!(pair[1].timestamp - pair[0].timestamp, Duration::hours(1));
        }
        for entry in &entries {
            prop_assert!((0.0..=1.0).contains(&entry.probability));
            prop_assert!(codec.labels().contains(&entry.predicted_state));
        }
    }
}
