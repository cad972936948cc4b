//! Timetabling domain models.
//!
//! Provides the read-only reference data of a timetabling problem.
//! The GA core consumes these types but never mutates them.
//!
//! # Domain Mappings
//!
//! | u-timetable | School | University | Training center |
//! |-------------|--------|------------|-----------------|
//! | Year | Grade | Cohort | Course group |
//! | Course | Subject | Module | Session type |
//! | Teacher | Teacher | Lecturer | Instructor |
//! | Classroom | Room | Lecture hall | Lab |
//! | Timeslot | Period | Lecture slot | Session slot |

mod catalog;
mod course;
mod teacher;
mod timeslot;

pub use catalog::Catalog;
pub use course::{Course, Year};
pub use teacher::{Classroom, Teacher};
pub use timeslot::{Day, SlotKey, Timeslot};
