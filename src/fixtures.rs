//! Shared catalogs for unit tests.

use crate::models::{Catalog, Classroom, Course, Day, Teacher, Timeslot, Year};

/// Three-year school with seven Sunday and seven Monday periods.
pub(crate) fn school_catalog() -> Catalog {
    Catalog::new()
        .with_teacher(Teacher::new("T1", 20.0).with_courses(["math", "physics"]))
        .with_teacher(Teacher::new("T2", 15.0).with_course("chemistry"))
        .with_teacher(Teacher::new("T3", 18.0).with_courses(["math", "biology"]))
        .with_teacher(Teacher::new("T4", 22.0).with_courses(["english", "history"]))
        .with_classroom(Classroom::new("R101"))
        .with_classroom(Classroom::new("R102"))
        .with_classroom(Classroom::new("LAB1"))
        .with_year(
            Year::new("Y1")
                .with_course(Course::new("math", 1.5))
                .with_course(Course::new("physics", 0.75))
                .with_course(Course::new("chemistry", 0.75))
                .with_course(Course::new("english", 0.75)),
        )
        .with_year(
            Year::new("Y2")
                .with_course(Course::new("math", 1.5))
                .with_course(Course::new("biology", 0.75))
                .with_course(Course::new("chemistry", 0.75))
                .with_course(Course::new("history", 0.75)),
        )
        .with_year(
            Year::new("Y3")
                .with_course(Course::new("physics", 0.75))
                .with_course(Course::new("english", 0.75))
                .with_course(Course::new("history", 0.75)),
        )
        .with_timeslots(Timeslot::consecutive(Day::Sunday, 1, 480, 45, 7))
        .with_timeslots(Timeslot::consecutive(Day::Monday, 8, 480, 45, 7))
}

/// Two years with one single-slot course each, taught by disjoint teachers.
pub(crate) fn two_year_catalog() -> Catalog {
    Catalog::new()
        .with_teacher(Teacher::new("T1", 10.0).with_course("c1"))
        .with_teacher(Teacher::new("T2", 10.0).with_course("c2"))
        .with_classroom(Classroom::new("R1"))
        .with_classroom(Classroom::new("R2"))
        .with_year(Year::new("Y1").with_course(Course::new("c1", 0.75)))
        .with_year(Year::new("Y2").with_course(Course::new("c2", 0.75)))
        .with_timeslots(Timeslot::consecutive(Day::Sunday, 1, 480, 45, 2))
        .with_timeslots(Timeslot::consecutive(Day::Monday, 3, 480, 45, 2))
}

/// One teacher whose cap is below the single course's requirement.
///
/// The course needs three 45-minute slots (2.25h) against a 1.5h cap.
pub(crate) fn overloaded_catalog() -> Catalog {
    Catalog::new()
        .with_teacher(Teacher::new("T1", 1.5).with_course("c"))
        .with_classroom(Classroom::new("R1"))
        .with_year(Year::new("Y1").with_course(Course::new("c", 2.25)))
        .with_timeslots(Timeslot::consecutive(Day::Sunday, 1, 480, 45, 3))
}
