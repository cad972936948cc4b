//! GA-based timetable optimization.
//!
//! # Encoding
//!
//! An [`Individual`] is one gene list per study year. A gene places one
//! course slot: teacher, classroom and timeslot. Lists are owned, so a
//! child never aliases its parents.
//!
//! # Pipeline
//!
//! | Step | Module |
//! |------|--------|
//! | Greedy construction | [`init`] |
//! | Penalty scoring | [`fitness`] |
//! | Whole-year crossover, field and swap mutation | [`operators`] |
//! | Conflict and gap repair | [`repair`] |
//! | Tournament / roulette selection | [`selection`] |
//! | Generation loop, resets, termination | [`runner`] |
//!
//! [`TimetableProblem`] binds a catalog and a [`GaConfig`] to these steps;
//! [`GaRunner`] drives a complete run.

mod chromosome;
mod config;
pub mod fitness;
pub mod init;
pub mod operators;
mod problem;
pub mod repair;
pub mod runner;
pub mod selection;

pub use chromosome::{Gene, Individual, Population};
pub use config::{GaConfig, PenaltyWeights};
pub use fitness::{FitnessBreakdown, FitnessEvaluator};
pub use operators::{GeneticOperators, MutationKind};
pub use problem::TimetableProblem;
pub use repair::RepairSummary;
pub use runner::{
    EvolutionController, GaResult, GaRunner, GenerationReport, ResetCause, Step, Termination,
};
pub use selection::Selection;
