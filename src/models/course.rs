//! Course and study-year models.

use serde::{Deserialize, Serialize};

/// A course with a weekly teaching requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Unique course identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Weekly teaching time in hours.
    pub required_hours: f64,
}

impl Course {
    /// Creates a course.
    pub fn new(id: impl Into<String>, required_hours: f64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            required_hours,
        }
    }

    /// Sets the course name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Number of whole slots of `slot_minutes` covering the requirement.
    ///
    /// Rounds down: a partial trailing slot is not scheduled.
    pub fn slots_needed(&self, slot_minutes: u32) -> usize {
        if slot_minutes == 0 || self.required_hours <= 0.0 {
            return 0;
        }
        // Epsilon keeps 2.25h / 45min at exactly 3 slots.
        ((self.required_hours * 60.0) / slot_minutes as f64 + 1e-9).floor() as usize
    }
}

/// A study year (student cohort) and its ordered curriculum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Year {
    /// Unique year identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Courses taught to this year, in scheduling order.
    pub curriculum: Vec<Course>,
}

impl Year {
    /// Creates a year with an empty curriculum.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            curriculum: Vec::new(),
        }
    }

    /// Sets the year name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Appends a course to the curriculum.
    pub fn with_course(mut self, course: Course) -> Self {
        self.curriculum.push(course);
        self
    }

    /// Total slots this year needs per week.
    pub fn slots_needed(&self, slot_minutes: u32) -> usize {
        self.curriculum
            .iter()
            .map(|c| c.slots_needed(slot_minutes))
            .sum()
    }
}
