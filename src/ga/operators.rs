//! Genetic operators for timetables.
//!
//! - **Crossover**: whole-year swap. Each year's gene list is inherited
//!   intact from one parent, so per-year slot uniqueness survives.
//! - **Mutation**: per year, with probability `mutation_rate`, one gene
//!   gets a new teacher, classroom or timeslot ([`MutationKind`]).
//! - **Swap mutation**: per year, with probability `swap_rate`, two genes
//!   exchange timeslots. The year's slot set is unchanged; only which
//!   course sits where moves.
//!
//! Mutation does not re-check feasibility; [`super::repair`] handles
//! the consequences.
//!
//! # Usage
//!
//! ```
//! use u_timetable::ga::operators::GeneticOperators;
//!
//! let ops = GeneticOperators::default();
//! assert!((ops.mutation_rate - 0.1).abs() < 1e-10);
//! ```

use rand::Rng;
use rand::seq::IndexedRandom;

use super::chromosome::{Gene, Individual};
use crate::error::{Result, TimetableError};
use crate::models::{Catalog, Timeslot};

/// A single-field gene change, carrying the new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    /// Reassign the teacher.
    Teacher(String),
    /// Reassign the classroom.
    Classroom(String),
    /// Move to another timeslot.
    Timeslot(Timeslot),
}

impl MutationKind {
    /// Draws a mutation for `gene`, choosing the field uniformly.
    ///
    /// Returns `None` when the chosen field has no candidate (no
    /// qualified teacher, or an empty catalog list).
    pub fn random<R: Rng>(gene: &Gene, catalog: &Catalog, rng: &mut R) -> Option<Self> {
        match rng.random_range(0..3) {
            0 => catalog
                .qualified_teachers(&gene.course_id)
                .choose(rng)
                .map(|t| Self::Teacher(t.id.clone())),
            1 => catalog
                .classrooms
                .choose(rng)
                .map(|c| Self::Classroom(c.id.clone())),
            _ => catalog
                .timeslots
                .choose(rng)
                .map(|ts| Self::Timeslot(ts.clone())),
        }
    }

    /// Replaces the corresponding field of `gene`.
    pub fn apply(self, gene: &mut Gene) {
        match self {
            Self::Teacher(id) => gene.teacher_id = id,
            Self::Classroom(id) => gene.classroom_id = id,
            Self::Timeslot(ts) => gene.timeslot = ts,
        }
    }
}

/// Clamps a rate to `[0, 1]`; NaN counts as 0.
fn probability(rate: f64) -> f64 {
    if rate.is_nan() {
        0.0
    } else {
        rate.clamp(0.0, 1.0)
    }
}

/// Uniform whole-year crossover.
///
/// For each year index, child 1 takes parent 1's list and child 2 takes
/// parent 2's, or the other way round, with probability 0.5. Children are
/// deep copies.
///
/// # Errors
/// [`TimetableError::StructuralMismatch`] if the parents hold a different
/// number of years.
pub fn crossover<R: Rng>(
    p1: &Individual,
    p2: &Individual,
    rng: &mut R,
) -> Result<(Individual, Individual)> {
    if p1.year_count() != p2.year_count() {
        return Err(TimetableError::StructuralMismatch {
            left: p1.year_count(),
            right: p2.year_count(),
        });
    }

    let mut c1 = Vec::with_capacity(p1.year_count());
    let mut c2 = Vec::with_capacity(p2.year_count());
    for (a, b) in p1.years.iter().zip(&p2.years) {
        if rng.random_bool(0.5) {
            c1.push(a.clone());
            c2.push(b.clone());
        } else {
            c1.push(b.clone());
            c2.push(a.clone());
        }
    }

    Ok((Individual::new(c1), Individual::new(c2)))
}

/// Field mutation: at most one gene per year changes.
///
/// `mutation_rate` is clamped to `[0, 1]` (NaN disables mutation).
pub fn mutate<R: Rng>(
    individual: &mut Individual,
    mutation_rate: f64,
    catalog: &Catalog,
    rng: &mut R,
) {
    for genes in &mut individual.years {
        if genes.is_empty() || !rng.random_bool(probability(mutation_rate)) {
            continue;
        }
        let idx = rng.random_range(0..genes.len());
        if let Some(kind) = MutationKind::random(&genes[idx], catalog, rng) {
            kind.apply(&mut genes[idx]);
        }
    }
}

/// Swap mutation: exchanges the timeslots of two genes within a year.
///
/// `swap_rate` is clamped like `mutation_rate` in [`mutate`].
pub fn swap_mutation<R: Rng>(individual: &mut Individual, swap_rate: f64, rng: &mut R) {
    for genes in &mut individual.years {
        let len = genes.len();
        if len < 2 || !rng.random_bool(probability(swap_rate)) {
            continue;
        }
        let i = rng.random_range(0..len);
        let j = rng.random_range(0..len);
        if i != j {
            let (lo, hi) = (i.min(j), i.max(j));
            let (left, right) = genes.split_at_mut(hi);
            std::mem::swap(&mut left[lo].timeslot, &mut right[0].timeslot);
        }
    }
}

/// Crossover and mutation with configured rates.
#[derive(Debug, Clone)]
pub struct GeneticOperators {
    /// Per-year probability of a field mutation.
    pub mutation_rate: f64,
    /// Per-year probability of a timeslot swap.
    pub swap_rate: f64,
}

impl Default for GeneticOperators {
    fn default() -> Self {
        Self {
            mutation_rate: 0.1,
            swap_rate: 0.05,
        }
    }
}

impl GeneticOperators {
    /// Creates operators with the given rates (clamped to `[0, 1]`, NaN as 0).
    pub fn new(mutation_rate: f64, swap_rate: f64) -> Self {
        Self {
            mutation_rate: probability(mutation_rate),
            swap_rate: probability(swap_rate),
        }
    }

    /// Performs whole-year crossover.
    pub fn crossover<R: Rng>(
        &self,
        p1: &Individual,
        p2: &Individual,
        rng: &mut R,
    ) -> Result<(Individual, Individual)> {
        crossover(p1, p2, rng)
    }

    /// Applies field mutation, then swap mutation.
    pub fn mutate<R: Rng>(&self, individual: &mut Individual, catalog: &Catalog, rng: &mut R) {
        mutate(individual, self.mutation_rate, catalog, rng);
        swap_mutation(individual, self.swap_rate, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::ga::fitness::FitnessEvaluator;
    use crate::ga::init::{initialize, initialize_individual};
    use crate::ga::PenaltyWeights;
    use crate::models::Day;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn parents(seed: u64) -> (Catalog, Individual, Individual) {
        let catalog = fixtures::school_catalog();
        let mut rng = SmallRng::seed_from_u64(seed);
        let p1 = initialize_individual(&catalog, 45, 1.0, &mut rng).unwrap();
        let p2 = initialize_individual(&catalog, 45, 1.0, &mut rng).unwrap();
        (catalog, p1, p2)
    }

    #[test]
    fn test_mutation_kind_apply() {
        let mut gene = Gene::new(
            "Y1",
            "math",
            "T1",
            "R101",
            Timeslot::new(Day::Sunday, 1, 480, 525),
        );

        MutationKind::Teacher("T3".into()).apply(&mut gene);
        MutationKind::Classroom("LAB1".into()).apply(&mut gene);
        MutationKind::Timeslot(Timeslot::new(Day::Monday, 9, 525, 570)).apply(&mut gene);

        assert_eq!(gene.teacher_id, "T3");
        assert_eq!(gene.classroom_id, "LAB1");
        assert_eq!(gene.slot_key(), (Day::Monday, 9));
        assert_eq!(gene.course_id, "math");
        assert_eq!(gene.year_id, "Y1");
    }

    #[test]
    fn test_random_teacher_mutation_is_qualified() {
        let catalog = fixtures::school_catalog();
        let gene = Gene::new("Y1", "math", "T1", "R101", Timeslot::new(Day::Sunday, 1, 480, 525));
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..100 {
            if let Some(MutationKind::Teacher(id)) = MutationKind::random(&gene, &catalog, &mut rng)
            {
                assert!(id == "T1" || id == "T3");
            }
        }
    }

    #[test]
    fn test_teacher_mutation_skipped_without_candidates() {
        let catalog = fixtures::school_catalog();
        let gene = Gene::new("Y1", "latin", "T1", "R101", Timeslot::new(Day::Sunday, 1, 480, 525));
        let mut rng = SmallRng::seed_from_u64(42);

        let mut saw_none = false;
        for _ in 0..100 {
            match MutationKind::random(&gene, &catalog, &mut rng) {
                None => saw_none = true,
                Some(kind) => assert!(!matches!(kind, MutationKind::Teacher(_))),
            }
        }
        assert!(saw_none);
    }

    #[test]
    fn test_crossover_structural_mismatch() {
        let (_, p1, mut p2) = parents(42);
        p2.years.pop();
        let mut rng = SmallRng::seed_from_u64(42);

        let err = crossover(&p1, &p2, &mut rng).unwrap_err();
        assert_eq!(err, TimetableError::StructuralMismatch { left: 3, right: 2 });
    }

    #[test]
    fn test_mutating_child_leaves_parents_untouched() {
        let (catalog, p1, p2) = parents(42);
        let caps = catalog.max_hours_by_teacher();
        let ev = FitnessEvaluator::new(PenaltyWeights::default(), 45);
        let (f1, f2) = (ev.evaluate(&p1, &caps), ev.evaluate(&p2, &caps));
        let (snapshot1, snapshot2) = (p1.clone(), p2.clone());
        let mut rng = SmallRng::seed_from_u64(7);

        let (mut c1, mut c2) = crossover(&p1, &p2, &mut rng).unwrap();
        let ops = GeneticOperators::new(1.0, 1.0);
        for _ in 0..10 {
            ops.mutate(&mut c1, &catalog, &mut rng);
            ops.mutate(&mut c2, &catalog, &mut rng);
        }

        assert_eq!(p1, snapshot1);
        assert_eq!(p2, snapshot2);
        assert_eq!(ev.evaluate(&p1, &caps), f1);
        assert_eq!(ev.evaluate(&p2, &caps), f2);
    }

    #[test]
    fn test_mutation_rate_zero_is_identity() {
        let (catalog, p1, _) = parents(42);
        let mut rng = SmallRng::seed_from_u64(42);
        let mut child = p1.clone();

        GeneticOperators::new(0.0, 0.0).mutate(&mut child, &catalog, &mut rng);
        assert_eq!(child, p1);
    }

    #[test]
    fn test_out_of_range_rates_are_clamped() {
        let (catalog, p1, _) = parents(42);
        let mut rng = SmallRng::seed_from_u64(42);
        let mut child = p1.clone();

        mutate(&mut child, f64::NAN, &catalog, &mut rng);
        swap_mutation(&mut child, -0.5, &mut rng);
        assert_eq!(child, p1);

        mutate(&mut child, 2.0, &catalog, &mut rng);
        swap_mutation(&mut child, f64::INFINITY, &mut rng);
        assert!(child.is_valid(&catalog, 45));

        let ops = GeneticOperators::new(f64::NAN, 3.0);
        assert_eq!(ops.mutation_rate, 0.0);
        assert_eq!(ops.swap_rate, 1.0);
    }

    #[test]
    fn test_mutation_changes_something() {
        let (catalog, p1, _) = parents(42);
        let mut rng = SmallRng::seed_from_u64(42);

        let changed = (0..50).any(|_| {
            let mut child = p1.clone();
            mutate(&mut child, 1.0, &catalog, &mut rng);
            child != p1
        });
        assert!(changed);
    }

    #[test]
    fn test_mutation_keeps_course_and_year() {
        let (catalog, p1, _) = parents(42);
        let mut rng = SmallRng::seed_from_u64(42);
        let mut child = p1.clone();
        for _ in 0..20 {
            mutate(&mut child, 1.0, &catalog, &mut rng);
        }

        assert!(child.is_valid(&catalog, 45));
    }

    #[test]
    fn test_swap_mutation_preserves_slot_set() {
        let catalog = fixtures::school_catalog();
        let mut rng = SmallRng::seed_from_u64(42);
        let population = initialize(5, &catalog, 45, 1.0, &mut rng).unwrap();

        for ind in population {
            let mut child = ind.clone();
            swap_mutation(&mut child, 1.0, &mut rng);
            for (before, after) in ind.years.iter().zip(&child.years) {
                let mut a: Vec<_> = before.iter().map(Gene::slot_key).collect();
                let mut b: Vec<_> = after.iter().map(Gene::slot_key).collect();
                a.sort();
                b.sort();
                assert_eq!(a, b);
            }
            assert!(!child.has_year_clash());
        }
    }

    proptest! {
        #[test]
        fn prop_crossover_inherits_whole_years(seed in any::<u64>()) {
            let (_, p1, p2) = parents(seed);
            let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(1));
            let (c1, c2) = crossover(&p1, &p2, &mut rng).unwrap();

            prop_assert_eq!(c1.year_count(), p1.year_count());
            prop_assert_eq!(c2.year_count(), p2.year_count());
            for i in 0..p1.year_count() {
                let from_p1 = c1.years[i] == p1.years[i] && c2.years[i] == p2.years[i];
                let from_p2 = c1.years[i] == p2.years[i] && c2.years[i] == p1.years[i];
                prop_assert!(from_p1 || from_p2);
            }
        }
    }
}
