//! Workout package input schema
//!
//! This module defines the batch input unit, a `(workout_type, data)` package
//! as delivered by a data source, and the adapter that parses and validates
//! sequences of packages from NDJSON or JSON arrays.

mod adapter;
mod package;

pub use adapter::*;
pub use package::*;
