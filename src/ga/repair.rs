//! Greedy post-recombination repair.
//!
//! # Pass 1: conflicts
//!
//! Genes are visited in year order while teacher and classroom occupancy
//! and teacher workload are tracked, as in fitness evaluation. A gene is
//! reassigned a teacher when its teacher is already booked at that slot
//! or one more slot would push the teacher past its cap. The cap check
//! looks one slot ahead: a teacher still below its cap is relieved as
//! soon as the next slot would overshoot it, not only once the workload
//! has reached the cap. Candidates, in
//! order of preference:
//! 1. qualified teachers free at that slot with capacity left,
//! 2. any qualified teacher,
//! 3. any teacher, when the course has no qualified teacher at all.
//!
//! A gene whose classroom is already booked at that slot moves to a
//! classroom free there, or to any classroom when none is.
//!
//! # Pass 2: gaps
//!
//! For each year and day, the gene right after an idle stretch is moved
//! back to the slot following its predecessor when that timeslot exists
//! and both its teacher and classroom are free there. Moves cascade
//! along the day. Gaps that cannot be closed stay.
//!
//! Repair never adds or removes genes and never changes a gene's course
//! or year.

use std::collections::{BTreeMap, HashMap};

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::trace;

use super::chromosome::{Gene, Individual};
use crate::models::{Catalog, Day, SlotKey, Teacher};

const CAPACITY_EPSILON: f64 = 1e-9;

/// What a repair call changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairSummary {
    /// Genes that got a different teacher.
    pub teachers_reassigned: usize,
    /// Genes that got a different classroom.
    pub classrooms_reassigned: usize,
    /// Genes moved to close a gap.
    pub genes_shifted: usize,
}

impl RepairSummary {
    /// Whether the individual was left untouched.
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Booking counts per `(resource, slot)`.
#[derive(Debug, Default)]
struct Occupancy(HashMap<(String, SlotKey), usize>);

impl Occupancy {
    fn is_free(&self, id: &str, key: SlotKey) -> bool {
        !self.0.contains_key(&(id.to_string(), key))
    }

    fn book(&mut self, id: &str, key: SlotKey) {
        *self.0.entry((id.to_string(), key)).or_insert(0) += 1;
    }

    fn release(&mut self, id: &str, key: SlotKey) {
        let entry = (id.to_string(), key);
        if let Some(count) = self.0.get_mut(&entry) {
            *count -= 1;
            if *count == 0 {
                self.0.remove(&entry);
            }
        }
    }
}

/// Repairs `individual` in place.
pub fn repair<R: Rng>(
    individual: &mut Individual,
    catalog: &Catalog,
    teacher_max_hours: &HashMap<String, f64>,
    slot_minutes: u32,
    rng: &mut R,
) -> RepairSummary {
    let slot_hours = slot_minutes as f64 / 60.0;
    let mut summary = RepairSummary::default();
    let mut teachers = Occupancy::default();
    let mut classrooms = Occupancy::default();
    let mut workload: HashMap<String, f64> = HashMap::new();

    for gene in individual.years.iter_mut().flatten() {
        let key = gene.slot_key();

        let worked = workload.get(&gene.teacher_id).copied().unwrap_or(0.0);
        let over_cap = teacher_max_hours
            .get(&gene.teacher_id)
            .is_some_and(|&cap| worked + slot_hours > cap + CAPACITY_EPSILON);
        if !teachers.is_free(&gene.teacher_id, key) || over_cap {
            let pick = pick_teacher(
                gene,
                catalog,
                &teachers,
                &workload,
                teacher_max_hours,
                slot_hours,
                rng,
            );
            if let Some(id) = pick.filter(|id| *id != gene.teacher_id) {
                gene.teacher_id = id.to_string();
                summary.teachers_reassigned += 1;
            }
        }
        teachers.book(&gene.teacher_id, key);
        *workload.entry(gene.teacher_id.clone()).or_insert(0.0) += slot_hours;

        if !classrooms.is_free(&gene.classroom_id, key) {
            let open: Vec<&str> = catalog
                .classrooms
                .iter()
                .map(|c| c.id.as_str())
                .filter(|id| classrooms.is_free(id, key))
                .collect();
            let pick = if open.is_empty() {
                catalog.classrooms.choose(rng).map(|c| c.id.as_str())
            } else {
                open.choose(rng).copied()
            };
            if let Some(id) = pick.filter(|id| *id != gene.classroom_id) {
                gene.classroom_id = id.to_string();
                summary.classrooms_reassigned += 1;
            }
        }
        classrooms.book(&gene.classroom_id, key);
    }

    for genes in &mut individual.years {
        summary.genes_shifted += close_gaps(genes, catalog, &mut teachers, &mut classrooms);
    }

    if !summary.is_noop() {
        trace!(
            teachers = summary.teachers_reassigned,
            classrooms = summary.classrooms_reassigned,
            shifted = summary.genes_shifted,
            "repaired individual"
        );
    }
    summary
}

fn pick_teacher<'a, R: Rng>(
    gene: &Gene,
    catalog: &'a Catalog,
    busy: &Occupancy,
    workload: &HashMap<String, f64>,
    caps: &HashMap<String, f64>,
    slot_hours: f64,
    rng: &mut R,
) -> Option<&'a str> {
    let key = gene.slot_key();
    let qualified = catalog.qualified_teachers(&gene.course_id);
    if qualified.is_empty() {
        return catalog.teachers.choose(rng).map(|t| t.id.as_str());
    }

    let has_room = |t: &Teacher| {
        let worked = workload.get(&t.id).copied().unwrap_or(0.0);
        !caps
            .get(&t.id)
            .is_some_and(|&cap| worked + slot_hours > cap + CAPACITY_EPSILON)
    };
    let free: Vec<&Teacher> = qualified
        .iter()
        .copied()
        .filter(|t| busy.is_free(&t.id, key) && has_room(t))
        .collect();

    free.choose(rng)
        .or_else(|| qualified.choose(rng))
        .map(|t| t.id.as_str())
}

/// Closes gaps day by day within one year; returns the number of moves.
fn close_gaps(
    genes: &mut [Gene],
    catalog: &Catalog,
    teachers: &mut Occupancy,
    classrooms: &mut Occupancy,
) -> usize {
    let mut by_day: BTreeMap<Day, Vec<usize>> = BTreeMap::new();
    for (i, gene) in genes.iter().enumerate() {
        by_day.entry(gene.timeslot.day).or_default().push(i);
    }

    let mut shifted = 0;
    for (day, mut indices) in by_day {
        indices.sort_by_key(|&i| genes[i].timeslot.slot_index);

        for w in 1..indices.len() {
            let prev = genes[indices[w - 1]].timeslot.slot_index;
            let gene = &mut genes[indices[w]];
            if gene.timeslot.slot_index <= prev + 1 {
                continue;
            }
            let Some(target) = catalog.timeslot_at(day, prev + 1) else {
                continue;
            };
            let (from, to) = (gene.slot_key(), target.key());
            if !teachers.is_free(&gene.teacher_id, to)
                || !classrooms.is_free(&gene.classroom_id, to)
            {
                continue;
            }

            teachers.release(&gene.teacher_id, from);
            classrooms.release(&gene.classroom_id, from);
            teachers.book(&gene.teacher_id, to);
            classrooms.book(&gene.classroom_id, to);
            gene.timeslot = target.clone();
            shifted += 1;
        }
    }
    shifted
}
