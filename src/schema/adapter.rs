//! Adapter for reading workout packages from serialized batches

use crate::error::WorkoutError;
use crate::schema::package::WorkoutPackage;

/// Adapter for parsing and validating package batches
pub struct PackageAdapter;

impl PackageAdapter {
    /// Parse a JSON string containing an array of packages
    pub fn parse_array(json: &str) -> Result<Vec<WorkoutPackage>, WorkoutError> {
        let packages: Vec<WorkoutPackage> = serde_json::from_str(json)?;
        Ok(packages)
    }

    /// Parse NDJSON (newline-delimited JSON) containing packages
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<WorkoutPackage>, WorkoutError> {
        let mut packages = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<WorkoutPackage>(trimmed) {
                Ok(package) => packages.push(package),
                Err(e) => {
                    return Err(WorkoutError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        Ok(packages)
    }

    /// Validate a batch of packages, returning only the failures
    pub fn validate_packages(packages: &[WorkoutPackage]) -> Vec<ValidationResult> {
        packages
            .iter()
            .enumerate()
            .filter_map(|(idx, package)| {
                package.validate().err().map(|error| ValidationResult {
                    index: idx,
                    workout_type: package.workout_type.clone(),
                    error,
                })
            })
            .collect()
    }
}

/// A package that failed validation
#[derive(Debug)]
pub struct ValidationResult {
    pub index: usize,
    pub workout_type: String,
    pub error: WorkoutError,
}
