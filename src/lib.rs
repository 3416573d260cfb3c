//! workout-stats - Workout statistics from raw sensor readings
//!
//! Computes distance, mean speed and calories for running, race walking and
//! swimming sessions through a deterministic pipeline: package parsing →
//! record construction → metric computation → summary rendering.
//!
//! ## Modules
//!
//! - **Records**: Per-kind formulas over raw readings
//! - **Factory**: Type code + readings → record, with arity and reading checks
//! - **Formatter**: Fixed-format text lines and JSON payloads

pub mod error;
pub mod factory;
pub mod formatter;
pub mod pipeline;
pub mod record;
pub mod schema;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use error::WorkoutError;
pub use factory::WorkoutFactory;
pub use formatter::{format_summary, SummaryEncoder};
pub use pipeline::{
    process_packages, run_demo, workout_summary, ProcessedWorkout, WorkoutProcessor,
};
pub use record::WorkoutRecord;
pub use types::{LabelStyle, SummaryLine, WorkoutKind};

// Schema exports
pub use schema::{demo_packages, PackageAdapter, WorkoutPackage};

/// Crate version embedded in JSON summaries
pub const WORKOUT_STATS_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for JSON summaries
pub const PRODUCER_NAME: &str = "workout-stats";
