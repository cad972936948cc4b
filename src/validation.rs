//! Input validation for timetabling catalogs.
//!
//! Checks structural integrity of the catalog before a run. Detects:
//! - Duplicate IDs (years, teachers, classrooms, timeslot keys)
//! - Empty catalogs (no years, classrooms or timeslots)
//! - Curriculum courses no teacher is qualified for
//! - The same course declared with different hours in two curricula
//! - Malformed timeslots and hour values
//! - Years needing more slots than the grid offers
//!
//! Validation reports every problem it finds instead of stopping at the
//! first one. It does not check teacher capacity against demand: overload
//! is a soft constraint handled by the fitness function.

use std::collections::{HashMap, HashSet};

use crate::models::Catalog;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID (or timeslot key).
    DuplicateId,
    /// A required collection is empty.
    EmptyCatalog,
    /// A curriculum course has no qualified teacher.
    UnteachableCourse,
    /// A course ID appears with different required hours.
    InconsistentCourse,
    /// A timeslot ends before it starts.
    InvalidTimeslot,
    /// Negative or non-finite hours.
    InvalidHours,
    /// A year needs more slots than there are timeslots.
    InsufficientTimeslots,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a catalog for runs with `slot_minutes`-long slots.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_catalog(catalog: &Catalog, slot_minutes: u32) -> ValidationResult {
    let mut errors = Vec::new();

    if catalog.years.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyCatalog,
            "Catalog has no years",
        ));
    }
    if catalog.classrooms.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyCatalog,
            "Catalog has no classrooms",
        ));
    }
    if catalog.timeslots.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyCatalog,
            "Catalog has no timeslots",
        ));
    }

    check_duplicates(
        "year",
        catalog.years.iter().map(|y| y.id.as_str()),
        &mut errors,
    );
    check_duplicates(
        "teacher",
        catalog.teachers.iter().map(|t| t.id.as_str()),
        &mut errors,
    );
    check_duplicates(
        "classroom",
        catalog.classrooms.iter().map(|c| c.id.as_str()),
        &mut errors,
    );

    // Timeslots
    let mut keys = HashSet::new();
    for ts in &catalog.timeslots {
        if !keys.insert(ts.key()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate timeslot: {:?} slot {}", ts.day, ts.slot_index),
            ));
        }
        if ts.end_minute <= ts.start_minute {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTimeslot,
                format!("Timeslot {ts} ends before it starts"),
            ));
        }
    }

    // Teachers
    for teacher in &catalog.teachers {
        if !teacher.max_hours.is_finite() || teacher.max_hours < 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidHours,
                format!("Teacher '{}' has invalid max hours {}", teacher.id, teacher.max_hours),
            ));
        }
    }

    // Curricula
    let mut declared_hours: HashMap<&str, f64> = HashMap::new();
    let mut reported_unteachable: HashSet<&str> = HashSet::new();
    for year in &catalog.years {
        for course in &year.curriculum {
            if !course.required_hours.is_finite() || course.required_hours < 0.0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidHours,
                    format!(
                        "Course '{}' in year '{}' has invalid hours {}",
                        course.id, year.id, course.required_hours
                    ),
                ));
            }

            match declared_hours.get(course.id.as_str()) {
                Some(&hours) if (hours - course.required_hours).abs() > 1e-9 => {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::InconsistentCourse,
                        format!(
                            "Course '{}' declared with {}h and {}h",
                            course.id, hours, course.required_hours
                        ),
                    ));
                }
                Some(_) => {}
                None => {
                    declared_hours.insert(&course.id, course.required_hours);
                }
            }

            if !catalog.teachers.iter().any(|t| t.can_teach(&course.id))
                && reported_unteachable.insert(&course.id)
            {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnteachableCourse,
                    format!("No teacher is qualified for course '{}'", course.id),
                ));
            }
        }

        let needed = year.slots_needed(slot_minutes);
        if needed > catalog.timeslots.len() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InsufficientTimeslots,
                format!(
                    "Year '{}' needs {} slots but only {} exist",
                    year.id,
                    needed,
                    catalog.timeslots.len()
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_duplicates<'a>(
    entity: &str,
    ids: impl Iterator<Item = &'a str>,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {entity} ID: {id}"),
            ));
        }
    }
}
