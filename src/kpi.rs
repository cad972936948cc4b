//! Timetable quality metrics (KPIs).
//!
//! Computes reporting indicators for a finished timetable.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Hard conflicts | Teacher + classroom + year double bookings |
//! | Gap slots | Idle periods between classes, over all years and days |
//! | Teacher utilization | Scheduled hours / max hours, per teacher |
//! | Avg utilization | Mean teacher utilization |
//! | Room occupancy | Booked (room, slot) pairs / (rooms x timeslots) |

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::ga::{Individual, TimetableProblem};

/// Timetable performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableKpi {
    /// Fitness score of the timetable.
    pub fitness: f64,
    /// Teacher, classroom and year double bookings combined.
    pub hard_conflicts: usize,
    /// Idle slots between classes.
    pub gap_slots: usize,
    /// Teachers over their cap.
    pub overloaded_teachers: usize,
    /// Scheduled hours per teacher (teachers without classes are absent).
    pub hours_by_teacher: HashMap<String, f64>,
    /// Scheduled hours / max hours per teacher with a positive cap.
    pub utilization_by_teacher: HashMap<String, f64>,
    /// Mean of `utilization_by_teacher` (0.0 when empty).
    pub avg_utilization: f64,
    /// Fraction of (classroom, timeslot) pairs in use (0.0..1.0).
    pub room_occupancy: f64,
}

impl TimetableKpi {
    /// Computes KPIs for `individual` under `problem`'s catalog and weights.
    pub fn calculate(individual: &Individual, problem: &TimetableProblem) -> Self {
        let breakdown = problem.breakdown(individual);
        let fitness = breakdown.score(problem.evaluator().weights());

        let utilization_by_teacher: HashMap<String, f64> = problem
            .catalog
            .teachers
            .iter()
            .filter(|t| t.max_hours > 0.0)
            .map(|t| {
                let hours = breakdown.teacher_hours.get(&t.id).copied().unwrap_or(0.0);
                (t.id.clone(), hours / t.max_hours)
            })
            .collect();
        let avg_utilization = if utilization_by_teacher.is_empty() {
            0.0
        } else {
            utilization_by_teacher.values().sum::<f64>() / utilization_by_teacher.len() as f64
        };

        let capacity = problem.catalog.classrooms.len() * problem.catalog.timeslots.len();
        let booked: HashSet<_> = individual
            .genes()
            .map(|g| (g.classroom_id.as_str(), g.slot_key()))
            .collect();
        let room_occupancy = if capacity == 0 {
            0.0
        } else {
            (booked.len() as f64 / capacity as f64).min(1.0)
        };

        Self {
            fitness,
            hard_conflicts: breakdown.teacher_conflicts
                + breakdown.classroom_conflicts
                + breakdown.year_conflicts,
            gap_slots: breakdown.gap_slots,
            overloaded_teachers: breakdown.overloaded_teachers,
            hours_by_teacher: breakdown.teacher_hours.into_iter().collect(),
            utilization_by_teacher,
            avg_utilization,
            room_occupancy,
        }
    }

    /// Whether the timetable has no hard conflict and no overloaded teacher.
    pub fn is_feasible(&self) -> bool {
        self.hard_conflicts == 0 && self.overloaded_teachers == 0
    }

    /// Whether the timetable meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_gap_slots: usize, min_utilization: f64) -> bool {
        self.is_feasible()
            && self.gap_slots <= max_gap_slots
            && self.avg_utilization >= min_utilization
    }
}
