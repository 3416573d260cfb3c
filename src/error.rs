//! Error types for workout computation

use thiserror::Error;

/// Errors that can occur while building or summarizing a workout
#[derive(Debug, Error)]
pub enum WorkoutError {
    #[error("Unknown workout type: {0}")]
    UnknownWorkoutType(String),

    #[error("Invalid argument count for {workout_type}: expected {expected}, got {actual}")]
    InvalidArgumentCount {
        workout_type: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid reading for {field}: {value}")]
    InvalidReading { field: &'static str, value: f64 },

    #[error("Domain error: {0}")]
    DomainError(String),

    #[error("Failed to parse workout package: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Package {index}: {source}")]
    PackageFailed {
        index: usize,
        #[source]
        source: Box<WorkoutError>,
    },
}
