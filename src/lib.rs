//! Course timetabling with a genetic algorithm.
//!
//! Assigns every course slot of every study year a teacher, a classroom
//! and a weekly timeslot, then evolves the assignment to remove double
//! bookings, teacher overload and idle gaps.
//!
//! # Modules
//!
//! - **`models`**: Domain catalog: `Year`, `Course`, `Teacher`, `Classroom`,
//!   `Timeslot`
//! - **`ga`**: Chromosome, construction, fitness, operators, repair,
//!   selection and the evolution loop
//! - **`validation`**: Catalog integrity checks (duplicate IDs, unteachable
//!   courses, timeslot grid)
//! - **`kpi`**: Quality indicators of a finished timetable
//! - **`error`**: Error type shared by all fallible operations
//!
//! # Quick start
//!
//! ```
//! use u_timetable::ga::{GaConfig, GaRunner};
//! use u_timetable::models::{Catalog, Classroom, Course, Day, Teacher, Timeslot, Year};
//!
//! let catalog = Catalog::new()
//!     .with_teacher(Teacher::new("T1", 20.0).with_courses(["math", "physics"]))
//!     .with_teacher(Teacher::new("T2", 20.0).with_course("math"))
//!     .with_classroom(Classroom::new("R101"))
//!     .with_classroom(Classroom::new("R102"))
//!     .with_year(
//!         Year::new("Y1")
//!             .with_course(Course::new("math", 1.5))
//!             .with_course(Course::new("physics", 0.75)),
//!     )
//!     .with_year(Year::new("Y2").with_course(Course::new("math", 1.5)))
//!     .with_timeslots(Timeslot::consecutive(Day::Monday, 1, 480, 45, 6));
//!
//! let config = GaConfig::default().with_max_generations(50).with_seed(42);
//! let result = GaRunner::run(&catalog, &config).unwrap();
//! assert!(result.best.is_valid(&catalog, 45));
//! ```

pub mod error;
pub mod ga;
pub mod kpi;
pub mod models;
pub mod validation;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::{Result, TimetableError};
