//! Error types.
//!
//! Only contract failures are errors. Soft constraint violations
//! (double bookings, overload, gaps) are fitness penalties, and a
//! repair that finds no alternative simply leaves the gene as is.

use std::fmt;

use crate::validation::ValidationError;

/// Result alias for timetabling operations.
pub type Result<T> = std::result::Result<T, TimetableError>;

/// Errors raised by the GA core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimetableError {
    /// Greedy construction could not place a course slot.
    #[error("cannot schedule course '{course_id}' for year '{year_id}': {reason}")]
    InfeasibleSchedule {
        course_id: String,
        year_id: String,
        reason: InfeasibleReason,
    },

    /// Two individuals (or paired slices) disagree in length.
    #[error("structural mismatch: {left} vs {right}")]
    StructuralMismatch { left: usize, right: usize },

    /// Selection was asked to pick from nothing.
    #[error("population is empty")]
    EmptyPopulation,

    /// Run parameters rejected by `GaConfig::validate`.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Catalog rejected by `validate_catalog`.
    #[error("invalid catalog: {} problem(s)", .0.len())]
    InvalidCatalog(Vec<ValidationError>),
}

/// Why a course slot could not be placed during construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfeasibleReason {
    /// Every qualified teacher is at capacity (or none exists).
    NoQualifiedTeacher,
    /// The year already uses every timeslot.
    NoFreeTimeslot,
    /// The catalog has no classrooms.
    NoClassroom,
}

impl fmt::Display for InfeasibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::NoQualifiedTeacher => "no qualified teacher with remaining capacity",
            Self::NoFreeTimeslot => "no free timeslot left for the year",
            Self::NoClassroom => "no classroom available",
        };
        f.write_str(msg)
    }
}
