//! Workout construction from raw readings
//!
//! This module maps a type code and a flat, positional list of sensor readings
//! to a `WorkoutRecord` of the matching kind. Readings are validated before
//! anything is constructed:
//! - The type code must be one of RUN, WLK, SWM
//! - The reading count must equal the kind's arity
//! - Count-like readings must be whole, non-negative and below 2^64

use tracing::debug;

use crate::error::WorkoutError;
use crate::record::WorkoutRecord;
use crate::types::WorkoutKind;

/// Factory for building workout records
pub struct WorkoutFactory;

impl WorkoutFactory {
    /// Build a record from a type code and its readings
    pub fn build(type_code: &str, readings: &[f64]) -> Result<WorkoutRecord, WorkoutError> {
        let kind = WorkoutKind::from_code(type_code)?;
        Self::build_kind(kind, readings)
    }

    /// Build a record of a known kind from its readings
    pub fn build_kind(kind: WorkoutKind, readings: &[f64]) -> Result<WorkoutRecord, WorkoutError> {
        if readings.len() != kind.arity() {
            return Err(WorkoutError::InvalidArgumentCount {
                workout_type: kind.code().to_string(),
                expected: kind.arity(),
                actual: readings.len(),
            });
        }

        let action_count = count(readings[0], "action_count")?;
        let duration_hours = measure(readings[1], "duration_hours")?;
        let weight_kg = measure(readings[2], "weight_kg")?;

        let record = match kind {
            WorkoutKind::Running => WorkoutRecord::running(action_count, duration_hours, weight_kg),
            WorkoutKind::RaceWalking => WorkoutRecord::race_walking(
                action_count,
                duration_hours,
                weight_kg,
                count(readings[3], "height_cm")?,
            ),
            WorkoutKind::Swimming => WorkoutRecord::swimming(
                action_count,
                duration_hours,
                weight_kg,
                count(readings[3], "pool_length_m")?,
                count(readings[4], "pool_lap_count")?,
            ),
        };

        debug!(workout_type = kind.code(), ?record, "built workout record");
        Ok(record)
    }
}

/// Convert a reading that must be a whole, non-negative count.
///
/// `u64::MAX as f64` rounds up to 2^64, so the bound is exclusive.
fn count(value: f64, field: &'static str) -> Result<u64, WorkoutError> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value < u64::MAX as f64 {
        Ok(value as u64)
    } else {
        Err(WorkoutError::InvalidReading { field, value })
    }
}

/// Accept a reading that must be a finite measurement
fn measure(value: f64, field: &'static str) -> Result<f64, WorkoutError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(WorkoutError::InvalidReading { field, value })
    }
}
