//! GA run configuration.

use serde::{Deserialize, Serialize};

use super::selection::Selection;
use crate::error::{Result, TimetableError};

/// Penalty applied per detected violation.
///
/// All weights are added to the score as-is, so they should be negative
/// (or zero to switch a check off).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyWeights {
    /// Teacher booked twice at the same timeslot.
    pub teacher_conflict: f64,
    /// Classroom booked twice at the same timeslot.
    pub classroom_conflict: f64,
    /// Year attending two classes at the same timeslot.
    pub year_conflict: f64,
    /// Per idle slot between two classes of a year on the same day.
    pub gap_per_slot: f64,
    /// Per teacher whose workload exceeds its cap.
    pub workload_overflow: f64,
    /// Per slot scheduled on one of the teacher's unavailable days.
    pub unavailable_day: f64,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            teacher_conflict: -10.0,
            classroom_conflict: -10.0,
            year_conflict: -10.0,
            gap_per_slot: -5.0,
            workload_overflow: -11.0,
            unavailable_day: 0.0,
        }
    }
}

impl PenaltyWeights {
    pub fn with_teacher_conflict(mut self, w: f64) -> Self {
        self.teacher_conflict = w;
        self
    }

    pub fn with_classroom_conflict(mut self, w: f64) -> Self {
        self.classroom_conflict = w;
        self
    }

    pub fn with_year_conflict(mut self, w: f64) -> Self {
        self.year_conflict = w;
        self
    }

    pub fn with_gap_per_slot(mut self, w: f64) -> Self {
        self.gap_per_slot = w;
        self
    }

    pub fn with_workload_overflow(mut self, w: f64) -> Self {
        self.workload_overflow = w;
        self
    }

    pub fn with_unavailable_day(mut self, w: f64) -> Self {
        self.unavailable_day = w;
        self
    }

    fn all(&self) -> [f64; 6] {
        [
            self.teacher_conflict,
            self.classroom_conflict,
            self.year_conflict,
            self.gap_per_slot,
            self.workload_overflow,
            self.unavailable_day,
        ]
    }
}

/// Configuration for a timetabling GA run.
///
/// # Examples
///
/// ```
/// use u_timetable::ga::{GaConfig, Selection};
///
/// let config = GaConfig::default()
///     .with_population_size(20)
///     .with_mutation_rate(0.2)
///     .with_selection(Selection::Tournament { size: 4 })
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Individuals per generation.
    pub population_size: usize,
    /// Per-year probability of a field mutation.
    pub mutation_rate: f64,
    /// Per-year probability of swapping two genes' timeslots.
    pub swap_rate: f64,
    /// Generation budget. Resets consume budget too.
    pub max_generations: usize,
    /// Parent selection strategy.
    pub selection: Selection,
    /// Stop as soon as the best score reaches this value.
    pub stop_threshold: f64,
    /// Reinitialize when the worst score falls to this value.
    pub reset_threshold: f64,
    /// Length of one timeslot in minutes.
    pub slot_minutes: u32,
    /// Hours a teacher may exceed its cap during construction.
    pub construction_slack_hours: f64,
    /// Fitness penalty weights.
    pub weights: PenaltyWeights,
    /// Whether to evaluate fitness in parallel (requires the `parallel` feature).
    pub parallel: bool,
    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 10,
            mutation_rate: 0.1,
            swap_rate: 0.05,
            max_generations: 1000,
            selection: Selection::Tournament { size: 3 },
            stop_threshold: 0.0,
            reset_threshold: -600.0,
            slot_minutes: 45,
            construction_slack_hours: 1.0,
            weights: PenaltyWeights::default(),
            parallel: true,
            seed: None,
        }
    }
}

impl GaConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_mutation_rate(mut self, p: f64) -> Self {
        self.mutation_rate = p;
        self
    }

    pub fn with_swap_rate(mut self, p: f64) -> Self {
        self.swap_rate = p;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.selection = Selection::Tournament { size: k };
        self
    }

    pub fn with_stop_threshold(mut self, threshold: f64) -> Self {
        self.stop_threshold = threshold;
        self
    }

    pub fn with_reset_threshold(mut self, threshold: f64) -> Self {
        self.reset_threshold = threshold;
        self
    }

    pub fn with_slot_minutes(mut self, minutes: u32) -> Self {
        self.slot_minutes = minutes;
        self
    }

    pub fn with_construction_slack(mut self, hours: f64) -> Self {
        self.construction_slack_hours = hours;
        self
    }

    pub fn with_weights(mut self, weights: PenaltyWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(TimetableError::InvalidConfig(msg));

        if self.population_size < 2 {
            return invalid("population_size must be at least 2".into());
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return invalid(format!("mutation_rate ({}) must be in [0, 1]", self.mutation_rate));
        }
        if !(0.0..=1.0).contains(&self.swap_rate) {
            return invalid(format!("swap_rate ({}) must be in [0, 1]", self.swap_rate));
        }
        if self.max_generations == 0 {
            return invalid("max_generations must be at least 1".into());
        }
        if let Selection::Tournament { size } = self.selection {
            if size < 2 {
                return invalid(format!("tournament size ({size}) must be at least 2"));
            }
        }
        if self.slot_minutes == 0 {
            return invalid("slot_minutes must be at least 1".into());
        }
        if !self.construction_slack_hours.is_finite() || self.construction_slack_hours < 0.0 {
            return invalid(format!(
                "construction_slack_hours ({}) must be a non-negative number",
                self.construction_slack_hours
            ));
        }
        if self.reset_threshold.is_nan()
            || self.stop_threshold.is_nan()
            || self.reset_threshold >= self.stop_threshold
        {
            return invalid(format!(
                "reset_threshold ({}) must be below stop_threshold ({})",
                self.reset_threshold, self.stop_threshold
            ));
        }
        if self.weights.all().iter().any(|w| !w.is_finite()) {
            return invalid("penalty weights must be finite".into());
        }
        Ok(())
    }
}
