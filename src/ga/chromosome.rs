//! Year-partitioned timetable chromosome.
//!
//! # Encoding
//!
//! An individual holds one gene list per study year, in catalog year
//! order. Each gene is one course slot: the course, its teacher, its
//! classroom and the timeslot it occupies. A course needing `n` slots
//! contributes `n` genes to its year's list.
//!
//! Genes own their data. Cloning an individual is a deep copy, so no two
//! individuals ever share gene storage.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::{Catalog, SlotKey, Timeslot};

/// One scheduled course slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gene {
    /// Study year this slot belongs to.
    pub year_id: String,
    /// Course taught.
    pub course_id: String,
    /// Assigned teacher.
    pub teacher_id: String,
    /// Assigned classroom.
    pub classroom_id: String,
    /// Occupied timeslot.
    pub timeslot: Timeslot,
}

impl Gene {
    /// Creates a gene.
    pub fn new(
        year_id: impl Into<String>,
        course_id: impl Into<String>,
        teacher_id: impl Into<String>,
        classroom_id: impl Into<String>,
        timeslot: Timeslot,
    ) -> Self {
        Self {
            year_id: year_id.into(),
            course_id: course_id.into(),
            teacher_id: teacher_id.into(),
            classroom_id: classroom_id.into(),
            timeslot,
        }
    }

    /// `(day, slot_index)` of the occupied timeslot.
    #[inline]
    pub fn slot_key(&self) -> SlotKey {
        self.timeslot.key()
    }
}

/// A complete candidate timetable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Individual {
    /// Gene lists, one per year, in catalog year order.
    pub years: Vec<Vec<Gene>>,
}

/// Candidate timetables of one generation.
pub type Population = Vec<Individual>;

impl Individual {
    /// Creates an individual from per-year gene lists.
    pub fn new(years: Vec<Vec<Gene>>) -> Self {
        Self { years }
    }

    /// Number of years.
    #[inline]
    pub fn year_count(&self) -> usize {
        self.years.len()
    }

    /// Total number of genes.
    pub fn gene_count(&self) -> usize {
        self.years.iter().map(Vec::len).sum()
    }

    /// Iterates over all genes in year order.
    pub fn genes(&self) -> impl Iterator<Item = &Gene> {
        self.years.iter().flatten()
    }

    /// Whether any year uses the same `(day, slot_index)` twice.
    pub fn has_year_clash(&self) -> bool {
        self.years.iter().any(|genes| {
            let mut seen = HashSet::new();
            genes.iter().any(|g| !seen.insert(g.slot_key()))
        })
    }

    /// Whether every gene's teacher is qualified for its course.
    pub fn teachers_qualified(&self, catalog: &Catalog) -> bool {
        self.genes().all(|g| {
            catalog
                .teacher(&g.teacher_id)
                .is_some_and(|t| t.can_teach(&g.course_id))
        })
    }

    /// Validates the shape against a catalog: one list per year, each
    /// holding as many genes of each course as the course needs.
    pub fn is_valid(&self, catalog: &Catalog, slot_minutes: u32) -> bool {
        if self.years.len() != catalog.years.len() {
            return false;
        }
        self.years.iter().zip(&catalog.years).all(|(genes, year)| {
            genes.iter().all(|g| g.year_id == year.id)
                && year.curriculum.iter().all(|course| {
                    let expected = course.slots_needed(slot_minutes);
                    genes.iter().filter(|g| g.course_id == course.id).count() == expected
                })
        })
    }
}
