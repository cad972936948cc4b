//! Teacher and classroom models.
//!
//! Teachers are the constrained resource of a timetable: each one may
//! only teach the courses it is qualified for, and its weekly load is
//! capped by `max_hours`. Classrooms carry no constraints beyond not
//! hosting two classes at once.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::Day;

/// A teacher that can be assigned to course slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    /// Unique teacher identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Courses this teacher may teach.
    pub qualified_course_ids: BTreeSet<String>,
    /// Weekly teaching cap in hours.
    pub max_hours: f64,
    /// Days the teacher should not be scheduled.
    #[serde(default)]
    pub unavailable_days: BTreeSet<Day>,
}

impl Teacher {
    /// Creates a teacher with no qualifications and the given cap.
    pub fn new(id: impl Into<String>, max_hours: f64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            qualified_course_ids: BTreeSet::new(),
            max_hours,
            unavailable_days: BTreeSet::new(),
        }
    }

    /// Sets the teacher name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a course qualification.
    pub fn with_course(mut self, course_id: impl Into<String>) -> Self {
        self.qualified_course_ids.insert(course_id.into());
        self
    }

    /// Adds several course qualifications.
    pub fn with_courses<I, S>(mut self, course_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.qualified_course_ids
            .extend(course_ids.into_iter().map(Into::into));
        self
    }

    /// Marks a day as unavailable.
    pub fn with_unavailable_day(mut self, day: Day) -> Self {
        self.unavailable_days.insert(day);
        self
    }

    /// Whether this teacher may teach `course_id`.
    #[inline]
    pub fn can_teach(&self, course_id: &str) -> bool {
        self.qualified_course_ids.contains(course_id)
    }

    /// Whether this teacher is available on `day`.
    #[inline]
    pub fn is_available_on(&self, day: Day) -> bool {
        !self.unavailable_days.contains(&day)
    }
}

/// A classroom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classroom {
    /// Unique classroom identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
}

impl Classroom {
    /// Creates a classroom.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
        }
    }

    /// Sets the classroom name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
