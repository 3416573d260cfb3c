//! Workout CLI - Command-line interface for workout-stats
//!
//! Commands:
//! - demo: Render the embedded demo batch
//! - compute: Compute a single workout from positional readings
//! - transform: Process a batch of workout packages (NDJSON or JSON array)
//! - validate: Check packages without rendering summaries

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use workout_stats::schema::{demo_packages, PackageAdapter, WorkoutPackage};
use workout_stats::{
    LabelStyle, ProcessedWorkout, WorkoutError, WorkoutProcessor, WORKOUT_STATS_VERSION,
};

/// Workout - distance, speed and calories from raw sensor readings
#[derive(Parser)]
#[command(name = "workout")]
#[command(author = "Synheart AI Inc")]
#[command(version = WORKOUT_STATS_VERSION)]
#[command(about = "Compute workout statistics from raw sensor readings", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the embedded demo batch
    Demo {
        /// Training label style
        #[arg(long, default_value = "name")]
        label: LabelStyle,

        /// Output format
        #[arg(long, default_value = "text")]
        output_format: OutputFormat,
    },

    /// Compute a single workout
    Compute {
        /// Workout type code (RUN, WLK, SWM)
        workout_type: String,

        /// Positional readings, e.g. `15000 1 75` for RUN
        #[arg(required = true, allow_negative_numbers = true)]
        readings: Vec<f64>,

        /// Training label style
        #[arg(long, default_value = "name")]
        label: LabelStyle,

        /// Output format
        #[arg(long, default_value = "text")]
        output_format: OutputFormat,
    },

    /// Process a batch of workout packages
    Transform {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long)]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "text")]
        output_format: OutputFormat,

        /// Training label style
        #[arg(long, default_value = "name")]
        label: LabelStyle,

        /// Skip failing packages instead of aborting
        #[arg(long)]
        keep_going: bool,
    },

    /// Validate workout packages
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one package per line)
    Ndjson,
    /// JSON array of packages
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary lines
    Text,
    /// Newline-delimited JSON (one summary per line)
    Ndjson,
    /// JSON array of summaries
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let error = CliError::from(e);
            eprintln!(
                "{}",
                serde_json::to_string(&error).unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), WorkoutCliError> {
    match cli.command {
        Commands::Demo {
            label,
            output_format,
        } => cmd_demo(label, output_format),

        Commands::Compute {
            workout_type,
            readings,
            label,
            output_format,
        } => cmd_compute(&workout_type, readings, label, output_format),

        Commands::Transform {
            input,
            output,
            input_format,
            output_format,
            label,
            keep_going,
        } => cmd_transform(
            &input,
            &output,
            input_format,
            output_format,
            label,
            keep_going,
        ),

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),
    }
}

fn cmd_demo(label_style: LabelStyle, output_format: OutputFormat) -> Result<(), WorkoutCliError> {
    let processor = WorkoutProcessor::with_label_style(label_style);
    let processed = processor.process_all(&demo_packages(), false)?;

    print!("{}", format_output(&processor, &processed, &output_format)?);
    Ok(())
}

fn cmd_compute(
    workout_type: &str,
    readings: Vec<f64>,
    label_style: LabelStyle,
    output_format: OutputFormat,
) -> Result<(), WorkoutCliError> {
    let processor = WorkoutProcessor::with_label_style(label_style);
    let package = WorkoutPackage::new(workout_type, readings);
    let processed = processor.process(&package)?;

    print!("{}", format_output(&processor, &[processed], &output_format)?);
    Ok(())
}

fn cmd_transform(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
    label_style: LabelStyle,
    keep_going: bool,
) -> Result<(), WorkoutCliError> {
    let packages = read_packages(input, &input_format)?;

    if packages.is_empty() {
        return Err(WorkoutCliError::NoPackages);
    }
    debug!(count = packages.len(), "read workout packages");

    let processor = WorkoutProcessor::with_label_style(label_style);
    let processed = processor.process_all(&packages, keep_going)?;

    let output_data = format_output(&processor, &processed, &output_format)?;

    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_validate(
    input: &Path,
    input_format: InputFormat,
    json: bool,
) -> Result<(), WorkoutCliError> {
    let packages = read_packages(input, &input_format)?;
    let results = PackageAdapter::validate_packages(&packages);

    let report = ValidationReport {
        total_packages: packages.len(),
        valid_packages: packages.len() - results.len(),
        invalid_packages: results.len(),
        errors: results
            .iter()
            .map(|r| ValidationErrorDetail {
                index: r.index,
                workout_type: r.workout_type.clone(),
                error: r.error.to_string(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total packages:   {}", report.total_packages);
        println!("Valid packages:   {}", report.valid_packages);
        println!("Invalid packages: {}", report.invalid_packages);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!(
                    "  - Package {} (index {}): {}",
                    err.workout_type, err.index, err.error
                );
            }
        }
    }

    if report.invalid_packages > 0 {
        Err(WorkoutCliError::ValidationFailed(report.invalid_packages))
    } else {
        Ok(())
    }
}

// Helper functions

fn read_packages(
    input: &Path,
    input_format: &InputFormat,
) -> Result<Vec<WorkoutPackage>, WorkoutCliError> {
    let input_data = if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    let packages = match input_format {
        InputFormat::Ndjson => PackageAdapter::parse_ndjson(&input_data)?,
        InputFormat::Json => PackageAdapter::parse_array(&input_data)?,
    };
    Ok(packages)
}

fn format_output(
    processor: &WorkoutProcessor,
    processed: &[ProcessedWorkout],
    format: &OutputFormat,
) -> Result<String, WorkoutCliError> {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            for workout in processed {
                output.push_str(&workout.summary.to_string());
                output.push('\n');
            }
            Ok(output)
        }
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for workout in processed {
                lines.push(serde_json::to_string(&processor.encode(workout))?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => {
            let payloads: Vec<_> = processed.iter().map(|w| processor.encode(w)).collect();
            Ok(serde_json::to_string(&payloads)? + "\n")
        }
        OutputFormat::JsonPretty => {
            let payloads: Vec<_> = processed.iter().map(|w| processor.encode(w)).collect();
            Ok(serde_json::to_string_pretty(&payloads)? + "\n")
        }
    }
}

// Error types

#[derive(Debug)]
enum WorkoutCliError {
    Io(io::Error),
    Workout(WorkoutError),
    Json(serde_json::Error),
    NoPackages,
    ValidationFailed(usize),
}

impl From<io::Error> for WorkoutCliError {
    fn from(e: io::Error) -> Self {
        WorkoutCliError::Io(e)
    }
}

impl From<WorkoutError> for WorkoutCliError {
    fn from(e: WorkoutError) -> Self {
        WorkoutCliError::Workout(e)
    }
}

impl From<serde_json::Error> for WorkoutCliError {
    fn from(e: serde_json::Error) -> Self {
        WorkoutCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<WorkoutCliError> for CliError {
    fn from(e: WorkoutCliError) -> Self {
        match e {
            WorkoutCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            WorkoutCliError::Workout(e) => workout_error(e),
            WorkoutCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            WorkoutCliError::NoPackages => CliError {
                code: "NO_PACKAGES".to_string(),
                message: "No workout packages found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            WorkoutCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} packages failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
        }
    }
}

fn workout_error(e: WorkoutError) -> CliError {
    let (code, hint) = error_code(&e);

    CliError {
        code: code.to_string(),
        message: e.to_string(),
        hint: Some(format!("{} (run 'workout validate' for details)", hint)),
    }
}

/// Error code and hint; a failed package reports the code of its cause
fn error_code(e: &WorkoutError) -> (&'static str, &'static str) {
    match e {
        WorkoutError::PackageFailed { source, .. } => error_code(source),
        WorkoutError::UnknownWorkoutType(_) => {
            ("UNKNOWN_WORKOUT_TYPE", "Use one of RUN, WLK, SWM")
        }
        WorkoutError::InvalidArgumentCount { .. } => (
            "INVALID_ARGUMENT_COUNT",
            "RUN takes 3 readings, WLK takes 4, SWM takes 5",
        ),
        WorkoutError::InvalidReading { .. } => (
            "INVALID_READING",
            "Counts must be whole, non-negative numbers",
        ),
        WorkoutError::DomainError(_) => ("DOMAIN_ERROR", "Duration and height must be non-zero"),
        WorkoutError::ParseError(_) | WorkoutError::JsonError(_) => (
            "PARSE_ERROR",
            "Each package needs workout_type and data fields",
        ),
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_packages: usize,
    valid_packages: usize,
    invalid_packages: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    workout_type: String,
    error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workout_error_codes() {
        let cases = vec![
            (WorkoutError::UnknownWorkoutType("XYZ".to_string()), "UNKNOWN_WORKOUT_TYPE"),
            (
                WorkoutError::InvalidArgumentCount {
                    workout_type: "RUN".to_string(),
                    expected: 3,
                    actual: 2,
                },
                "INVALID_ARGUMENT_COUNT",
            ),
            (
                WorkoutError::InvalidReading {
                    field: "height_cm",
                    value: -1.0,
                },
                "INVALID_READING",
            ),
            (WorkoutError::DomainError("speed is inf".to_string()), "DOMAIN_ERROR"),
            (WorkoutError::ParseError("line 1".to_string()), "PARSE_ERROR"),
        ];

        for (error, expected) in cases {
            let cli_error = CliError::from(WorkoutCliError::from(error));
            assert_eq!(cli_error.code, expected);
            assert!(cli_error.hint.unwrap().ends_with("(run 'workout validate' for details)"));
        }
    }

    #[test]
    fn test_json_error_maps_to_parse_error() {
        let json_error = serde_json::from_str::<WorkoutPackage>("{").unwrap_err();
        let cli_error = workout_error(WorkoutError::from(json_error));
        assert_eq!(cli_error.code, "PARSE_ERROR");
    }

    #[test]
    fn test_failed_package_reports_cause_and_index() {
        let processor = WorkoutProcessor::new();
        let packages = vec![
            WorkoutPackage::new("RUN", vec![15000.0, 1.0, 75.0]),
            WorkoutPackage::new("RUN", vec![15000.0, 1.0]),
        ];
        let error = processor.process_all(&packages, false).unwrap_err();

        let cli_error = CliError::from(WorkoutCliError::from(error));
        assert_eq!(cli_error.code, "INVALID_ARGUMENT_COUNT");
        assert_eq!(
            cli_error.message,
            "Package 1: Invalid argument count for RUN: expected 3, got 2"
        );
    }

    #[test]
    fn test_cli_only_error_codes() {
        assert_eq!(CliError::from(WorkoutCliError::NoPackages).code, "NO_PACKAGES");

        let failed = CliError::from(WorkoutCliError::ValidationFailed(2));
        assert_eq!(failed.code, "VALIDATION_FAILED");
        assert_eq!(failed.message, "2 packages failed validation");
    }

    #[test]
    fn test_label_flag_parses_into_label_style() {
        let cli = Cli::try_parse_from(["workout", "demo", "--label", "code"]).unwrap();
        match cli.command {
            Commands::Demo { label, .. } => assert_eq!(label, LabelStyle::Code),
            _ => panic!("expected demo command"),
        }
    }
}
