//! Summary rendering
//!
//! This module renders computed summaries in two forms:
//! - A fixed-format, human-readable text line (3 decimals, `.` separator)
//! - A JSON payload with producer metadata for machine consumers

use chrono::Utc;
use std::fmt;
use uuid::Uuid;

use crate::error::WorkoutError;
use crate::types::{SummaryLine, SummaryPayload, SummaryProducer, WorkoutKind};
use crate::{PRODUCER_NAME, WORKOUT_STATS_VERSION};

/// Render the summary text line.
///
/// Every number is printed fixed-point with exactly three decimals. Rust's
/// float formatting is locale-independent, so the separator is always `.`.
pub fn format_summary(
    label: &str,
    duration_hours: f64,
    distance_km: f64,
    speed_kmh: f64,
    calories_kcal: f64,
) -> String {
    format!(
        "Тип тренировки: {}; Длительность: {:.3} ч.; Дистанция: {:.3} км; \
         Ср. скорость: {:.3} км/ч; Потрачено ккал: {:.3}.",
        label, duration_hours, distance_km, speed_kmh, calories_kcal
    )
}

impl fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_summary(
            &self.training_label,
            self.duration_hours,
            self.distance_km,
            self.speed_kmh,
            self.calories_kcal,
        ))
    }
}

/// Encoder for JSON summary payloads
pub struct SummaryEncoder {
    instance_id: String,
}

impl Default for SummaryEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SummaryEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Encode a summary line into a JSON payload
    pub fn encode(&self, kind: WorkoutKind, line: &SummaryLine) -> SummaryPayload {
        SummaryPayload {
            producer: SummaryProducer {
                name: PRODUCER_NAME.to_string(),
                version: WORKOUT_STATS_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            workout_type: kind.code().to_string(),
            label: line.training_label.clone(),
            duration_hours: line.duration_hours,
            distance_km: line.distance_km,
            speed_kmh: line.speed_kmh,
            calories_kcal: line.calories_kcal,
            computed_at_utc: Utc::now().to_rfc3339(),
        }
    }

    /// Encode to JSON string
    pub fn encode_to_json(
        &self,
        kind: WorkoutKind,
        line: &SummaryLine,
    ) -> Result<String, WorkoutError> {
        let payload = self.encode(kind, line);
        Ok(serde_json::to_string(&payload)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::WorkoutFactory;
    use crate::types::LabelStyle;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use proptest::sample::select;

    fn running_line() -> SummaryLine {
        SummaryLine {
            training_label: "Running".to_string(),
            duration_hours: 1.0,
            distance_km: 9.75,
            speed_kmh: 9.75,
            calories_kcal: 699.75,
        }
    }

    #[test]
    fn test_format_summary() {
        let text = format_summary("SWM", 1.0, 0.9935999999999999, 1.0, 336.00000000000006);
        assert_eq!(
            text,
            "Тип тренировки: SWM; Длительность: 1.000 ч.; Дистанция: 0.994 км; \
             Ср. скорость: 1.000 км/ч; Потрачено ккал: 336.000."
        );
    }

    #[test]
    fn test_display_matches_format() {
        let line = running_line();
        assert_eq!(
            line.to_string(),
            "Тип тренировки: Running; Длительность: 1.000 ч.; Дистанция: 9.750 км; \
             Ср. скорость: 9.750 км/ч; Потрачено ккал: 699.750."
        );
    }

    #[test]
    fn test_no_scientific_notation() {
        let text = format_summary("RUN", 1e-7, 12345678.9, 0.0, -2.5);
        assert!(text.contains("Длительность: 0.000 ч."));
        assert!(text.contains("Дистанция: 12345678.900 км"));
        assert!(text.contains("Потрачено ккал: -2.500."));
        assert!(!text.contains('e'));
    }

    #[test]
    fn test_encode_payload() {
        let encoder = SummaryEncoder::with_instance_id("test-instance".to_string());
        let payload = encoder.encode(WorkoutKind::Running, &running_line());

        assert_eq!(payload.producer.name, PRODUCER_NAME);
        assert_eq!(payload.producer.instance_id, "test-instance");
        assert_eq!(payload.workout_type, "RUN");
        assert_eq!(payload.label, "Running");
        assert_eq!(payload.calories_kcal, 699.75);
    }

    #[test]
    fn test_encode_to_json() {
        let encoder = SummaryEncoder::new();
        let json = encoder
            .encode_to_json(WorkoutKind::Running, &running_line())
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["workout_type"], "RUN");
        assert_eq!(value["distance_km"], 9.75);
        assert!(value["computed_at_utc"].as_str().is_some());
        assert!(!encoder.instance_id().is_empty());
    }

    /// Read the four numbers back out of a rendered line
    fn parse_numbers(text: &str) -> Vec<f64> {
        text.split(": ")
            .skip(2)
            .map(|part| {
                part.split(|c: char| c != '.' && c != '-' && !c.is_ascii_digit())
                    .next()
                    .unwrap()
                    .trim_end_matches('.')
                    .parse()
                    .unwrap()
            })
            .collect()
    }

    proptest! {
        #[test]
        fn prop_rendered_numbers_match_metrics(
            kind in select(WorkoutKind::ALL.to_vec()),
            action in 0u32..100_000,
            duration in 0.1f64..10.0,
            weight in 30.0f64..200.0,
            height in 1u32..250,
            pool in 10u32..100,
            laps in 0u32..200,
        ) {
            let mut readings = vec![action as f64, duration, weight];
            match kind {
                WorkoutKind::Running => {}
                WorkoutKind::RaceWalking => readings.push(height as f64),
                WorkoutKind::Swimming => readings.extend([pool as f64, laps as f64]),
            }

            let record = WorkoutFactory::build(kind.code(), &readings).unwrap();
            let line = record.summary(LabelStyle::Name).unwrap();
            let numbers = parse_numbers(&line.to_string());

            let raw = [
                record.duration(),
                record.distance(),
                record.mean_speed(),
                record.calories_burned(),
            ];
            prop_assert_eq!(numbers.len(), raw.len());
            for (parsed, value) in numbers.iter().zip(raw) {
                prop_assert!(
                    (parsed - value).abs() <= 0.0005 + 1e-9,
                    "rendered {} for {}",
                    parsed,
                    value
                );
            }
        }
    }
}
