//! Domain catalog.
//!
//! The catalog is the read-only input of a run: years with their
//! curricula, teachers, classrooms and the timeslot grid. It is passed
//! explicitly to every GA operation and never mutated during a run.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Classroom, Day, Teacher, Timeslot, Year};

/// Reference data for a timetabling problem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Study years, in the order individuals store them.
    pub years: Vec<Year>,
    /// Available teachers.
    pub teachers: Vec<Teacher>,
    /// Available classrooms.
    pub classrooms: Vec<Classroom>,
    /// Timeslot grid.
    pub timeslots: Vec<Timeslot>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a year.
    pub fn with_year(mut self, year: Year) -> Self {
        self.years.push(year);
        self
    }

    /// Adds a teacher.
    pub fn with_teacher(mut self, teacher: Teacher) -> Self {
        self.teachers.push(teacher);
        self
    }

    /// Adds a classroom.
    pub fn with_classroom(mut self, classroom: Classroom) -> Self {
        self.classrooms.push(classroom);
        self
    }

    /// Adds timeslots.
    pub fn with_timeslots(mut self, timeslots: impl IntoIterator<Item = Timeslot>) -> Self {
        self.timeslots.extend(timeslots);
        self
    }

    /// Finds a teacher by ID.
    pub fn teacher(&self, id: &str) -> Option<&Teacher> {
        self.teachers.iter().find(|t| t.id == id)
    }

    /// Teachers qualified for a course.
    pub fn qualified_teachers(&self, course_id: &str) -> Vec<&Teacher> {
        self.teachers
            .iter()
            .filter(|t| t.can_teach(course_id))
            .collect()
    }

    /// Finds the timeslot at `(day, slot_index)`.
    pub fn timeslot_at(&self, day: Day, slot_index: u32) -> Option<&Timeslot> {
        self.timeslots
            .iter()
            .find(|ts| ts.day == day && ts.slot_index == slot_index)
    }

    /// Teacher ID → weekly cap in hours.
    pub fn max_hours_by_teacher(&self) -> HashMap<String, f64> {
        self.teachers
            .iter()
            .map(|t| (t.id.clone(), t.max_hours))
            .collect()
    }

    /// Total number of genes an individual built from this catalog holds.
    pub fn gene_count(&self, slot_minutes: u32) -> usize {
        self.years.iter().map(|y| y.slots_needed(slot_minutes)).sum()
    }
}
