//! Constraint-aware population initialization.
//!
//! # Algorithm
//!
//! Greedy, one individual at a time:
//! 1. For each year, for each course of its curriculum, compute the
//!    number of slots the course needs.
//! 2. For each slot, keep the teachers qualified for the course whose
//!    workload plus one slot stays within their cap, and the timeslots
//!    the year has not used yet.
//! 3. Pick a teacher and a timeslot uniformly at random, and a classroom
//!    that is free at that timeslot when one exists.
//!
//! There is no backtracking. When step 2 leaves nothing to choose from,
//! construction fails with [`TimetableError::InfeasibleSchedule`] and the
//! caller decides whether to adjust the catalog.
//!
//! # Construction slack
//!
//! Teacher workload counters start at `-slack_hours`, so greedy
//! construction may overshoot a cap by up to that many hours. The
//! fitness function penalizes the overshoot afterwards.

use std::collections::{HashMap, HashSet};

use rand::Rng;
use tracing::{debug, warn};

use super::chromosome::{Gene, Individual, Population};
use crate::error::{InfeasibleReason, Result, TimetableError};
use crate::models::{Catalog, Course, SlotKey, Teacher, Timeslot, Year};

const CAPACITY_EPSILON: f64 = 1e-9;

/// Builds `size` individuals.
pub fn initialize<R: Rng>(
    size: usize,
    catalog: &Catalog,
    slot_minutes: u32,
    slack_hours: f64,
    rng: &mut R,
) -> Result<Population> {
    let population = (0..size)
        .map(|_| initialize_individual(catalog, slot_minutes, slack_hours, rng))
        .collect::<Result<Population>>()
        .inspect_err(|e| warn!(error = %e, "population initialization failed"))?;

    debug!(
        size,
        genes = population.first().map_or(0, Individual::gene_count),
        "initialized population"
    );
    Ok(population)
}

/// Builds one individual.
pub fn initialize_individual<R: Rng>(
    catalog: &Catalog,
    slot_minutes: u32,
    slack_hours: f64,
    rng: &mut R,
) -> Result<Individual> {
    let slot_hours = slot_minutes as f64 / 60.0;
    let mut workload: HashMap<&str, f64> = catalog
        .teachers
        .iter()
        .map(|t| (t.id.as_str(), -slack_hours))
        .collect();
    let mut classroom_busy: HashSet<(&str, SlotKey)> = HashSet::new();
    let mut years = Vec::with_capacity(catalog.years.len());

    for year in &catalog.years {
        let mut used: HashSet<SlotKey> = HashSet::new();
        let mut genes = Vec::with_capacity(year.slots_needed(slot_minutes));

        for course in &year.curriculum {
            for _ in 0..course.slots_needed(slot_minutes) {
                let teachers: Vec<&Teacher> = catalog
                    .teachers
                    .iter()
                    .filter(|t| {
                        t.can_teach(&course.id)
                            && workload[t.id.as_str()] + slot_hours
                                <= t.max_hours + CAPACITY_EPSILON
                    })
                    .collect();
                if teachers.is_empty() {
                    return Err(infeasible(course, year, InfeasibleReason::NoQualifiedTeacher));
                }

                let free: Vec<&Timeslot> = catalog
                    .timeslots
                    .iter()
                    .filter(|ts| !used.contains(&ts.key()))
                    .collect();
                if free.is_empty() {
                    return Err(infeasible(course, year, InfeasibleReason::NoFreeTimeslot));
                }
                if catalog.classrooms.is_empty() {
                    return Err(infeasible(course, year, InfeasibleReason::NoClassroom));
                }

                let teacher = teachers[rng.random_range(0..teachers.len())];
                let timeslot = free[rng.random_range(0..free.len())];
                let key = timeslot.key();

                let open_rooms: Vec<&str> = catalog
                    .classrooms
                    .iter()
                    .map(|c| c.id.as_str())
                    .filter(|id| !classroom_busy.contains(&(*id, key)))
                    .collect();
                let classroom_id = if open_rooms.is_empty() {
                    catalog.classrooms[rng.random_range(0..catalog.classrooms.len())]
                        .id
                        .as_str()
                } else {
                    open_rooms[rng.random_range(0..open_rooms.len())]
                };

                if let Some(hours) = workload.get_mut(teacher.id.as_str()) {
                    *hours += slot_hours;
                }
                used.insert(key);
                classroom_busy.insert((classroom_id, key));

                genes.push(Gene::new(
                    &year.id,
                    &course.id,
                    &teacher.id,
                    classroom_id,
                    timeslot.clone(),
                ));
            }
        }

        years.push(genes);
    }

    Ok(Individual::new(years))
}

fn infeasible(course: &Course, year: &Year, reason: InfeasibleReason) -> TimetableError {
    TimetableError::InfeasibleSchedule {
        course_id: course.id.clone(),
        year_id: year.id.clone(),
        reason,
    }
}
