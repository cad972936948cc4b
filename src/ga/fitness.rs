//! Penalty-based fitness evaluation.
//!
//! # Scoring
//!
//! One pass over every gene keeps three occupancy maps keyed by
//! `(day, slot_index)`: per teacher, per classroom and per year. A gene
//! whose key is already present in a map costs that map's conflict
//! weight; the three checks are independent. Teacher workload grows by
//! one slot per gene whether or not it conflicts.
//!
//! After the pass:
//! - each idle slot between two classes of a year on the same day costs
//!   `gap_per_slot`,
//! - each teacher over its cap costs `workload_overflow` once,
//! - each slot on a teacher's unavailable day costs `unavailable_day`.
//!
//! Higher is better; 0 means no detected penalty. Evaluation is a pure
//! function of its inputs.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::chromosome::Individual;
use super::config::PenaltyWeights;
use crate::models::{Catalog, Day, SlotKey};

/// Violation counts of one individual.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FitnessBreakdown {
    /// Genes whose teacher was already booked at that slot.
    pub teacher_conflicts: usize,
    /// Genes whose classroom was already booked at that slot.
    pub classroom_conflicts: usize,
    /// Genes whose year already had a class at that slot.
    pub year_conflicts: usize,
    /// Idle slots between classes, summed over years and days.
    pub gap_slots: usize,
    /// Teachers whose workload exceeds their cap.
    pub overloaded_teachers: usize,
    /// Slots placed on a teacher's unavailable day.
    pub unavailable_day_hits: usize,
    /// Accumulated hours per teacher.
    pub teacher_hours: BTreeMap<String, f64>,
}

impl FitnessBreakdown {
    /// Weighted score of these counts.
    pub fn score(&self, weights: &PenaltyWeights) -> f64 {
        self.teacher_conflicts as f64 * weights.teacher_conflict
            + self.classroom_conflicts as f64 * weights.classroom_conflict
            + self.year_conflicts as f64 * weights.year_conflict
            + self.gap_slots as f64 * weights.gap_per_slot
            + self.overloaded_teachers as f64 * weights.workload_overflow
            + self.unavailable_day_hits as f64 * weights.unavailable_day
    }

    /// Whether no hard conflict (teacher, classroom, year) was found.
    pub fn is_conflict_free(&self) -> bool {
        self.teacher_conflicts == 0 && self.classroom_conflicts == 0 && self.year_conflicts == 0
    }
}

/// Scores individuals against penalty weights.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    weights: PenaltyWeights,
    slot_hours: f64,
    unavailable: HashMap<String, BTreeSet<Day>>,
}

struct Tally<'a> {
    teacher_conflicts: usize,
    classroom_conflicts: usize,
    year_conflicts: usize,
    gap_slots: usize,
    unavailable_day_hits: usize,
    teacher_hours: HashMap<&'a str, f64>,
}

impl FitnessEvaluator {
    /// Creates an evaluator for slots of `slot_minutes`.
    pub fn new(weights: PenaltyWeights, slot_minutes: u32) -> Self {
        Self {
            weights,
            slot_hours: slot_minutes as f64 / 60.0,
            unavailable: HashMap::new(),
        }
    }

    /// Records the teachers' unavailable days from a catalog.
    pub fn with_unavailability(mut self, catalog: &Catalog) -> Self {
        self.unavailable = catalog
            .teachers
            .iter()
            .filter(|t| !t.unavailable_days.is_empty())
            .map(|t| (t.id.clone(), t.unavailable_days.clone()))
            .collect();
        self
    }

    /// Penalty weights in use.
    pub fn weights(&self) -> &PenaltyWeights {
        &self.weights
    }

    /// Scores an individual. Teachers missing from `teacher_max_hours`
    /// are uncapped.
    pub fn evaluate(
        &self,
        individual: &Individual,
        teacher_max_hours: &HashMap<String, f64>,
    ) -> f64 {
        let tally = self.tally(individual);
        let overloaded = count_overloaded(&tally.teacher_hours, teacher_max_hours);

        tally.teacher_conflicts as f64 * self.weights.teacher_conflict
            + tally.classroom_conflicts as f64 * self.weights.classroom_conflict
            + tally.year_conflicts as f64 * self.weights.year_conflict
            + tally.gap_slots as f64 * self.weights.gap_per_slot
            + overloaded as f64 * self.weights.workload_overflow
            + tally.unavailable_day_hits as f64 * self.weights.unavailable_day
    }

    /// Counts violations without weighting them.
    pub fn breakdown(
        &self,
        individual: &Individual,
        teacher_max_hours: &HashMap<String, f64>,
    ) -> FitnessBreakdown {
        let tally = self.tally(individual);
        let overloaded_teachers = count_overloaded(&tally.teacher_hours, teacher_max_hours);

        FitnessBreakdown {
            teacher_conflicts: tally.teacher_conflicts,
            classroom_conflicts: tally.classroom_conflicts,
            year_conflicts: tally.year_conflicts,
            gap_slots: tally.gap_slots,
            overloaded_teachers,
            unavailable_day_hits: tally.unavailable_day_hits,
            teacher_hours: tally
                .teacher_hours
                .into_iter()
                .map(|(id, hours)| (id.to_string(), hours))
                .collect(),
        }
    }

    fn tally<'a>(&self, individual: &'a Individual) -> Tally<'a> {
        let mut teacher_busy: HashSet<(&str, SlotKey)> = HashSet::new();
        let mut classroom_busy: HashSet<(&str, SlotKey)> = HashSet::new();
        let mut year_busy: HashSet<(&str, SlotKey)> = HashSet::new();
        let mut tally = Tally {
            teacher_conflicts: 0,
            classroom_conflicts: 0,
            year_conflicts: 0,
            gap_slots: 0,
            unavailable_day_hits: 0,
            teacher_hours: HashMap::new(),
        };

        for genes in &individual.years {
            let mut day_slots: BTreeMap<Day, Vec<u32>> = BTreeMap::new();

            for gene in genes {
                let key = gene.slot_key();

                if !teacher_busy.insert((gene.teacher_id.as_str(), key)) {
                    tally.teacher_conflicts += 1;
                }
                *tally
                    .teacher_hours
                    .entry(gene.teacher_id.as_str())
                    .or_insert(0.0) += self.slot_hours;

                if !classroom_busy.insert((gene.classroom_id.as_str(), key)) {
                    tally.classroom_conflicts += 1;
                }
                if !year_busy.insert((gene.year_id.as_str(), key)) {
                    tally.year_conflicts += 1;
                }

                if self
                    .unavailable
                    .get(&gene.teacher_id)
                    .is_some_and(|days| days.contains(&gene.timeslot.day))
                {
                    tally.unavailable_day_hits += 1;
                }

                day_slots.entry(key.0).or_default().push(key.1);
            }

            for slots in day_slots.values_mut() {
                tally.gap_slots += gap_slots(slots);
            }
        }

        tally
    }
}

/// Sorts `slots` and sums the idle periods between neighbours.
pub(crate) fn gap_slots(slots: &mut [u32]) -> usize {
    slots.sort_unstable();
    slots
        .windows(2)
        .map(|w| w[1].saturating_sub(w[0]).saturating_sub(1) as usize)
        .sum()
}

fn count_overloaded(hours: &HashMap<&str, f64>, caps: &HashMap<String, f64>) -> usize {
    hours
        .iter()
        .filter(|(id, worked)| caps.get(**id).is_some_and(|&cap| **worked > cap + 1e-9))
        .count()
}
