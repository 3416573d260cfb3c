//! Pipeline orchestration
//!
//! This module provides the public API for workout-stats.
//! It orchestrates the full flow from raw readings to rendered summaries.

use tracing::{debug, warn};

use crate::error::WorkoutError;
use crate::factory::WorkoutFactory;
use crate::formatter::SummaryEncoder;
use crate::schema::{demo_packages, PackageAdapter, WorkoutPackage};
use crate::types::{LabelStyle, SummaryLine, SummaryPayload, WorkoutKind};

/// Compute one workout and render its summary line.
///
/// # Arguments
/// * `type_code` - Workout type code (RUN, WLK, SWM)
/// * `readings` - Positional readings for that type
/// * `label_style` - Whether the line shows the display name or the code
///
/// # Example
/// ```ignore
/// let line = workout_summary("RUN", &[15000.0, 1.0, 75.0], LabelStyle::Name)?;
/// ```
pub fn workout_summary(
    type_code: &str,
    readings: &[f64],
    label_style: LabelStyle,
) -> Result<String, WorkoutError> {
    let record = WorkoutFactory::build(type_code, readings)?;
    Ok(record.summary(label_style)?.to_string())
}

/// Compute a batch of packages, one result per package in input order.
///
/// A failing package does not stop the batch.
pub fn process_packages(
    packages: &[WorkoutPackage],
    label_style: LabelStyle,
) -> Vec<Result<ProcessedWorkout, WorkoutError>> {
    WorkoutProcessor::with_label_style(label_style).process_batch(packages)
}

/// Render the embedded demo batch
pub fn run_demo(label_style: LabelStyle) -> Result<Vec<String>, WorkoutError> {
    WorkoutProcessor::with_label_style(label_style)
        .process_batch(&demo_packages())
        .into_iter()
        .map(|result| result.map(|processed| processed.summary.to_string()))
        .collect()
}

/// A package that went through the whole pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedWorkout {
    pub kind: WorkoutKind,
    pub summary: SummaryLine,
}

/// Configured processor for summarizing workout packages.
///
/// Holds the label style and the JSON encoder so that all summaries from one
/// processor share a producer instance ID.
pub struct WorkoutProcessor {
    label_style: LabelStyle,
    encoder: SummaryEncoder,
}

impl Default for WorkoutProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkoutProcessor {
    /// Create a new processor with default settings
    pub fn new() -> Self {
        Self::with_label_style(LabelStyle::default())
    }

    /// Create a processor with a specific label style
    pub fn with_label_style(label_style: LabelStyle) -> Self {
        Self {
            label_style,
            encoder: SummaryEncoder::new(),
        }
    }

    pub fn label_style(&self) -> LabelStyle {
        self.label_style
    }

    /// Build and compute a single package
    pub fn process(&self, package: &WorkoutPackage) -> Result<ProcessedWorkout, WorkoutError> {
        let record = package.to_record()?;
        let summary = record.summary(self.label_style)?;
        debug!(
            workout_type = record.kind().code(),
            calories = summary.calories_kcal,
            "computed workout summary"
        );
        Ok(ProcessedWorkout {
            kind: record.kind(),
            summary,
        })
    }

    /// Process packages in order, one result per package
    pub fn process_batch(
        &self,
        packages: &[WorkoutPackage],
    ) -> Vec<Result<ProcessedWorkout, WorkoutError>> {
        packages
            .iter()
            .enumerate()
            .map(|(index, package)| {
                self.process(package).map_err(|e| {
                    warn!(
                        index,
                        workout_type = %package.workout_type,
                        error = %e,
                        "workout package rejected"
                    );
                    e
                })
            })
            .collect()
    }

    /// Process packages in order, stopping at the first failing package.
    ///
    /// With `keep_going`, failing packages are logged once each and skipped,
    /// and the remaining packages are still processed. Without it, the first
    /// failure is returned as `PackageFailed` and later packages are never
    /// built.
    pub fn process_all(
        &self,
        packages: &[WorkoutPackage],
        keep_going: bool,
    ) -> Result<Vec<ProcessedWorkout>, WorkoutError> {
        let mut processed = Vec::with_capacity(packages.len());

        for (index, package) in packages.iter().enumerate() {
            match self.process(package) {
                Ok(workout) => processed.push(workout),
                Err(e) if keep_going => {
                    warn!(
                        index,
                        workout_type = %package.workout_type,
                        error = %e,
                        "skipping workout package"
                    );
                }
                Err(e) => {
                    return Err(WorkoutError::PackageFailed {
                        index,
                        source: Box::new(e),
                    })
                }
            }
        }

        Ok(processed)
    }

    /// Encode a processed workout as a JSON payload
    pub fn encode(&self, processed: &ProcessedWorkout) -> SummaryPayload {
        self.encoder.encode(processed.kind, &processed.summary)
    }

    /// Process NDJSON packages into text lines, stopping at the first error
    pub fn process_ndjson(&self, ndjson: &str) -> Result<Vec<String>, WorkoutError> {
        let packages = PackageAdapter::parse_ndjson(ndjson)?;
        packages
            .iter()
            .map(|package| self.process(package).map(|p| p.summary.to_string()))
            .collect()
    }

    /// Process one package into a JSON payload string
    pub fn process_to_json(&self, package: &WorkoutPackage) -> Result<String, WorkoutError> {
        let processed = self.process(package)?;
        self.encoder.encode_to_json(processed.kind, &processed.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_demo_batch_output() {
        let lines = run_demo(LabelStyle::Name).unwrap();

        assert_eq!(
            lines,
            vec![
                "Тип тренировки: Swimming; Длительность: 1.000 ч.; Дистанция: 0.994 км; \
                 Ср. скорость: 1.000 км/ч; Потрачено ккал: 336.000."
                    .to_string(),
                "Тип тренировки: Running; Длительность: 1.000 ч.; Дистанция: 9.750 км; \
                 Ср. скорость: 9.750 км/ч; Потрачено ккал: 699.750."
                    .to_string(),
                "Тип тренировки: SportsWalking; Длительность: 1.000 ч.; Дистанция: 5.850 км; \
                 Ср. скорость: 5.850 км/ч; Потрачено ккал: 157.500."
                    .to_string(),
            ]
        );
    }

    #[test]
    fn test_demo_batch_with_codes() {
        let lines = run_demo(LabelStyle::Code).unwrap();

        assert!(lines[0].starts_with("Тип тренировки: SWM;"));
        assert!(lines[1].starts_with("Тип тренировки: RUN;"));
        assert!(lines[2].starts_with("Тип тренировки: WLK;"));
    }

    #[test]
    fn test_workout_summary() {
        let line = workout_summary("RUN", &[15000.0, 1.0, 75.0], LabelStyle::Code).unwrap();
        assert!(line.ends_with("Потрачено ккал: 699.750."));
    }

    #[test]
    fn test_workout_summary_unknown_type() {
        let result = workout_summary("XYZ", &[1.0, 1.0, 1.0], LabelStyle::Name);
        assert!(matches!(result, Err(WorkoutError::UnknownWorkoutType(code)) if code == "XYZ"));
    }

    #[test]
    fn test_batch_keeps_order_and_isolates_failures() {
        let packages = vec![
            WorkoutPackage::new("RUN", vec![15000.0, 1.0, 75.0]),
            WorkoutPackage::new("XYZ", vec![1.0, 1.0, 1.0]),
            WorkoutPackage::new("SWM", vec![720.0, 1.0, 80.0, 25.0, 40.0]),
        ];

        let results = process_packages(&packages, LabelStyle::Name);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().kind, WorkoutKind::Running);
        assert!(matches!(results[1], Err(WorkoutError::UnknownWorkoutType(_))));
        assert_eq!(results[2].as_ref().unwrap().kind, WorkoutKind::Swimming);
    }

    #[test]
    fn test_process_all_aborts_at_first_failure() {
        let processor = WorkoutProcessor::new();
        let packages = vec![
            WorkoutPackage::new("RUN", vec![15000.0, 1.0, 75.0]),
            WorkoutPackage::new("RUN", vec![15000.0, 1.0]),
            WorkoutPackage::new("XYZ", vec![1.0, 1.0, 1.0]),
        ];

        match processor.process_all(&packages, false) {
            Err(WorkoutError::PackageFailed { index, source }) => {
                assert_eq!(index, 1);
                assert!(matches!(*source, WorkoutError::InvalidArgumentCount { .. }));
            }
            other => panic!("expected PackageFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_process_all_failure_message_names_index() {
        let processor = WorkoutProcessor::new();
        let packages = vec![
            WorkoutPackage::new("SWM", vec![720.0, 1.0, 80.0, 25.0, 40.0]),
            WorkoutPackage::new("BIKE", vec![1.0]),
        ];

        let err = processor.process_all(&packages, false).unwrap_err();
        assert_eq!(err.to_string(), "Package 1: Unknown workout type: BIKE");
    }

    #[test]
    fn test_process_all_keep_going_skips_failures() {
        let processor = WorkoutProcessor::with_label_style(LabelStyle::Code);
        let packages = vec![
            WorkoutPackage::new("XYZ", vec![1.0, 1.0, 1.0]),
            WorkoutPackage::new("WLK", vec![9000.0, 1.0, 75.0, 180.0]),
            WorkoutPackage::new("RUN", vec![15000.0, 0.0, 75.0]),
            WorkoutPackage::new("SWM", vec![720.0, 1.0, 80.0, 25.0, 40.0]),
        ];

        let processed = processor.process_all(&packages, true).unwrap();
        let kinds: Vec<WorkoutKind> = processed.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![WorkoutKind::RaceWalking, WorkoutKind::Swimming]);
    }

    #[test]
    fn test_process_all_keeps_input_order() {
        let processor = WorkoutProcessor::new();
        let mut packages = demo_packages();
        packages.reverse();

        let labels: Vec<String> = processor
            .process_all(&packages, false)
            .unwrap()
            .into_iter()
            .map(|p| p.summary.training_label)
            .collect();
        assert_eq!(labels, vec!["SportsWalking", "Running", "Swimming"]);
    }

    #[test]
    fn test_process_ndjson_fails_fast() {
        let processor = WorkoutProcessor::new();
        let ndjson = r#"{"workout_type":"RUN","data":[15000,1,75]}
{"workout_type":"RUN","data":[15000,1]}"#;

        let result = processor.process_ndjson(ndjson);
        assert!(matches!(
            result,
            Err(WorkoutError::InvalidArgumentCount { .. })
        ));
    }

    #[test]
    fn test_process_to_json() {
        let processor = WorkoutProcessor::with_label_style(LabelStyle::Code);
        let package = WorkoutPackage::new("SWM", vec![720.0, 1.0, 80.0, 25.0, 40.0]);

        let json = processor.process_to_json(&package).unwrap();
        let payload: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(payload["workout_type"], "SWM");
        assert_eq!(payload["label"], "SWM");
        assert_eq!(payload["speed_kmh"], 1.0);
    }

    #[test]
    fn test_processor_shares_instance_id() {
        let processor = WorkoutProcessor::new();
        let results = processor.process_batch(&demo_packages());

        let ids: Vec<String> = results
            .iter()
            .map(|r| processor.encode(r.as_ref().unwrap()).producer.instance_id)
            .collect();
        assert!(ids.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(processor.label_style(), LabelStyle::Name);
    }
}
