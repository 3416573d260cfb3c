//! Workout package definition

use serde::{Deserialize, Serialize};

use crate::error::WorkoutError;
use crate::factory::WorkoutFactory;
use crate::record::WorkoutRecord;
use crate::types::LabelStyle;

/// Raw readings of one workout, as supplied by a data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPackage {
    /// Type code (RUN, WLK, SWM)
    #[serde(alias = "type")]
    pub workout_type: String,
    /// Positional readings for the workout type
    #[serde(alias = "readings")]
    pub data: Vec<f64>,
}

impl WorkoutPackage {
    pub fn new(workout_type: impl Into<String>, data: Vec<f64>) -> Self {
        Self {
            workout_type: workout_type.into(),
            data,
        }
    }

    /// Build the workout record described by this package
    pub fn to_record(&self) -> Result<WorkoutRecord, WorkoutError> {
        WorkoutFactory::build(&self.workout_type, &self.data)
    }

    /// Check that the package builds and yields finite metrics
    pub fn validate(&self) -> Result<(), WorkoutError> {
        self.to_record()?.summary(LabelStyle::Code).map(|_| ())
    }
}

/// The embedded demo batch
pub fn demo_packages() -> Vec<WorkoutPackage> {
    vec![
        WorkoutPackage::new("SWM", vec![720.0, 1.0, 80.0, 25.0, 40.0]),
        WorkoutPackage::new("RUN", vec![15000.0, 1.0, 75.0]),
        WorkoutPackage::new("WLK", vec![9000.0, 1.0, 75.0, 180.0]),
    ]
}
