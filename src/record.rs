//! Workout records and their derived metrics
//!
//! A record holds the raw readings of one session. Distance, mean speed and
//! calories are computed on demand from those readings with fixed per-kind
//! formulas:
//! - Running: speed-driven energy expenditure
//! - Race walking: weight term plus a floor-discretized speed/height term
//! - Swimming: pool-based speed, independent of the stroke count

use crate::error::WorkoutError;
use crate::types::{LabelStyle, SummaryLine, WorkoutKind};

/// Meters in a kilometer
pub const M_IN_KM: f64 = 1000.0;
/// Minutes in an hour
pub const MIN_IN_H: f64 = 60.0;
/// Step length for running and race walking (meters)
pub const LEN_STEP: f64 = 0.65;
/// Stroke length for swimming (meters)
pub const SWIM_LEN_STEP: f64 = 1.38;

const RUN_SPEED_MULTIPLIER: f64 = 18.0;
const RUN_SPEED_SHIFT: f64 = 20.0;

const WALK_WEIGHT_MULTIPLIER: f64 = 0.035;
const WALK_SPEED_HEIGHT_MULTIPLIER: f64 = 0.029;

const SWIM_SPEED_SHIFT: f64 = 1.1;
const SWIM_WEIGHT_MULTIPLIER: f64 = 2.0;

/// Readings common to every workout kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Session {
    /// Steps or strokes. Readings arrive as `f64`, so counts above 2^53
    /// are already rounded by the time they reach here.
    pub action_count: u64,
    /// Session duration (hours)
    pub duration_hours: f64,
    /// Participant mass (kg)
    pub weight_kg: f64,
}

/// One workout session of a specific kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorkoutRecord {
    Running {
        session: Session,
    },
    RaceWalking {
        session: Session,
        height_cm: u64,
    },
    Swimming {
        session: Session,
        pool_length_m: u64,
        pool_lap_count: u64,
    },
}

impl WorkoutRecord {
    pub fn running(action_count: u64, duration_hours: f64, weight_kg: f64) -> Self {
        WorkoutRecord::Running {
            session: Session {
                action_count,
                duration_hours,
                weight_kg,
            },
        }
    }

    pub fn race_walking(
        action_count: u64,
        duration_hours: f64,
        weight_kg: f64,
        height_cm: u64,
    ) -> Self {
        WorkoutRecord::RaceWalking {
            session: Session {
                action_count,
                duration_hours,
                weight_kg,
            },
            height_cm,
        }
    }

    pub fn swimming(
        action_count: u64,
        duration_hours: f64,
        weight_kg: f64,
        pool_length_m: u64,
        pool_lap_count: u64,
    ) -> Self {
        WorkoutRecord::Swimming {
            session: Session {
                action_count,
                duration_hours,
                weight_kg,
            },
            pool_length_m,
            pool_lap_count,
        }
    }

    pub fn kind(&self) -> WorkoutKind {
        match self {
            WorkoutRecord::Running { .. } => WorkoutKind::Running,
            WorkoutRecord::RaceWalking { .. } => WorkoutKind::RaceWalking,
            WorkoutRecord::Swimming { .. } => WorkoutKind::Swimming,
        }
    }

    pub fn session(&self) -> &Session {
        match self {
            WorkoutRecord::Running { session }
            | WorkoutRecord::RaceWalking { session, .. }
            | WorkoutRecord::Swimming { session, .. } => session,
        }
    }

    /// Training label under the given style
    pub fn label(&self, style: LabelStyle) -> &'static str {
        self.kind().label(style)
    }

    /// Session duration (hours)
    pub fn duration(&self) -> f64 {
        self.session().duration_hours
    }

    /// Length of one step or stroke (meters)
    fn step_length(&self) -> f64 {
        match self {
            WorkoutRecord::Running { .. } | WorkoutRecord::RaceWalking { .. } => LEN_STEP,
            WorkoutRecord::Swimming { .. } => SWIM_LEN_STEP,
        }
    }

    /// Distance covered (km), from the action count and step length
    pub fn distance(&self) -> f64 {
        self.session().action_count as f64 * self.step_length() / M_IN_KM
    }

    /// Mean speed over the whole session (km/h)
    ///
    /// Swimming derives speed from the pool, not from `distance()`.
    pub fn mean_speed(&self) -> f64 {
        match self {
            WorkoutRecord::Running { session } | WorkoutRecord::RaceWalking { session, .. } => {
                self.distance() / session.duration_hours
            }
            WorkoutRecord::Swimming {
                session,
                pool_length_m,
                pool_lap_count,
            } => {
                let pool_distance_m = (*pool_length_m as u128 * *pool_lap_count as u128) as f64;
                pool_distance_m / M_IN_KM / session.duration_hours
            }
        }
    }

    /// Energy spent during the session (kcal)
    pub fn calories_burned(&self) -> f64 {
        let speed = self.mean_speed();
        match self {
            WorkoutRecord::Running { session } => {
                let coefficient = RUN_SPEED_MULTIPLIER * speed - RUN_SPEED_SHIFT;
                (coefficient * session.weight_kg / M_IN_KM) * (session.duration_hours * MIN_IN_H)
            }
            WorkoutRecord::RaceWalking { session, height_cm } => {
                let speed_height = floor_div(speed.powi(2), *height_cm as f64);
                let weight_term = WALK_WEIGHT_MULTIPLIER * session.weight_kg;
                let speed_term = speed_height * WALK_SPEED_HEIGHT_MULTIPLIER * session.weight_kg;
                (weight_term + speed_term) * (session.duration_hours * MIN_IN_H)
            }
            WorkoutRecord::Swimming { session, .. } => {
                (speed + SWIM_SPEED_SHIFT) * SWIM_WEIGHT_MULTIPLIER * session.weight_kg
            }
        }
    }

    /// Compute all metrics into a summary line.
    ///
    /// Fails with `DomainError` when any metric is not finite, e.g. for a
    /// zero duration or a zero height.
    pub fn summary(&self, style: LabelStyle) -> Result<SummaryLine, WorkoutError> {
        let duration_hours = self.duration();
        let distance_km = self.distance();
        let speed_kmh = self.mean_speed();
        let calories_kcal = self.calories_burned();

        for (metric, value) in [
            ("duration", duration_hours),
            ("distance", distance_km),
            ("speed", speed_kmh),
            ("calories", calories_kcal),
        ] {
            if !value.is_finite() {
                return Err(WorkoutError::DomainError(format!(
                    "{} workout produced non-finite {} ({})",
                    self.kind().code(),
                    metric,
                    value
                )));
            }
        }

        Ok(SummaryLine {
            training_label: self.label(style).to_string(),
            duration_hours,
            distance_km,
            speed_kmh,
            calories_kcal,
        })
    }
}

/// Floor division derived from the fmod remainder rather than `(a / b).floor()`,
/// so values just below an integer quotient are not rounded up. A zero divisor
/// yields NaN.
fn floor_div(dividend: f64, divisor: f64) -> f64 {
    let rem = dividend % divisor;
    let mut div = (dividend - rem) / divisor;
    if rem != 0.0 && ((divisor < 0.0) != (rem < 0.0)) {
        div -= 1.0;
    }
    if div != 0.0 {
        let mut floored = div.floor();
        if div - floored > 0.5 {
            floored += 1.0;
        }
        floored
    } else {
        0.0_f64.copysign(dividend / divisor)
    }
}
