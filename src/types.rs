//! Core types shared by the factory, records and formatter
//!
//! This module defines the workout kind tag, the label configuration and the
//! summary values produced once a record has been computed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::WorkoutError;

/// Exercise type of a workout record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkoutKind {
    Running,
    RaceWalking,
    Swimming,
}

impl WorkoutKind {
    /// All known kinds, in code-table order
    pub const ALL: [WorkoutKind; 3] = [
        WorkoutKind::Swimming,
        WorkoutKind::Running,
        WorkoutKind::RaceWalking,
    ];

    /// Short type code used by data sources
    pub fn code(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "RUN",
            WorkoutKind::RaceWalking => "WLK",
            WorkoutKind::Swimming => "SWM",
        }
    }

    /// Display name printed in summaries with `LabelStyle::Name`
    pub fn display_name(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "Running",
            WorkoutKind::RaceWalking => "SportsWalking",
            WorkoutKind::Swimming => "Swimming",
        }
    }

    /// Number of readings a package of this kind must carry
    pub fn arity(&self) -> usize {
        match self {
            WorkoutKind::Running => 3,
            WorkoutKind::RaceWalking => 4,
            WorkoutKind::Swimming => 5,
        }
    }

    /// Look up a kind by its exact type code
    pub fn from_code(code: &str) -> Result<Self, WorkoutError> {
        match code {
            "RUN" => Ok(WorkoutKind::Running),
            "WLK" => Ok(WorkoutKind::RaceWalking),
            "SWM" => Ok(WorkoutKind::Swimming),
            other => Err(WorkoutError::UnknownWorkoutType(other.to_string())),
        }
    }

    /// Label for this kind under the given style
    pub fn label(&self, style: LabelStyle) -> &'static str {
        match style {
            LabelStyle::Name => self.display_name(),
            LabelStyle::Code => self.code(),
        }
    }
}

impl FromStr for WorkoutKind {
    type Err = WorkoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WorkoutKind::from_code(s)
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Which label a summary prints as the training type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum LabelStyle {
    /// Display name, e.g. Running
    #[default]
    Name,
    /// Type code, e.g. RUN
    Code,
}

/// Computed metrics of one workout, ready to be rendered
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryLine {
    /// Training type as printed
    pub training_label: String,
    /// Session duration (hours)
    pub duration_hours: f64,
    /// Distance covered (km)
    pub distance_km: f64,
    /// Mean speed (km/h)
    pub speed_kmh: f64,
    /// Energy spent (kcal)
    pub calories_kcal: f64,
}

/// Producer metadata attached to JSON summaries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// JSON form of a workout summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryPayload {
    pub producer: SummaryProducer,
    /// Short type code of the source package
    pub workout_type: String,
    /// Training type as printed in the text line
    pub label: String,
    pub duration_hours: f64,
    pub distance_km: f64,
    pub speed_kmh: f64,
    pub calories_kcal: f64,
    pub computed_at_utc: String,
}
