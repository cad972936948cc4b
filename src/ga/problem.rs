//! Timetabling GA problem definition.
//!
//! Bridges the read-only [`Catalog`] and the run configuration to the
//! GA steps: construction, scoring, recombination and repair. Every
//! step receives the catalog explicitly through this struct; nothing is
//! read from global state.

use std::collections::HashMap;

use rand::Rng;

use super::chromosome::{Individual, Population};
use super::config::GaConfig;
use super::fitness::{FitnessBreakdown, FitnessEvaluator};
use super::init::initialize;
use super::operators::GeneticOperators;
use super::repair::{RepairSummary, repair};
use crate::error::Result;
use crate::models::Catalog;

/// GA problem definition for school timetabling.
///
/// # Example
/// ```
/// use u_timetable::ga::{GaConfig, TimetableProblem};
/// use u_timetable::models::{Catalog, Classroom, Course, Day, Teacher, Timeslot, Year};
/// use rand::SeedableRng;
///
/// let catalog = Catalog::new()
///     .with_teacher(Teacher::new("T1", 10.0).with_course("math"))
///     .with_classroom(Classroom::new("R1"))
///     .with_year(Year::new("Y1").with_course(Course::new("math", 1.5)))
///     .with_timeslots(Timeslot::consecutive(Day::Monday, 1, 480, 45, 4));
///
/// let problem = TimetableProblem::from_config(catalog, &GaConfig::default());
/// let mut rng = rand::rngs::SmallRng::seed_from_u64(42);
/// let population = problem.create_population(4, &mut rng).unwrap();
/// assert_eq!(problem.evaluate_all(&population).len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct TimetableProblem {
    /// Read-only catalog for the run.
    pub catalog: Catalog,
    /// Teacher id to maximum weekly hours.
    pub teacher_max_hours: HashMap<String, f64>,
    /// Length of one timeslot in minutes.
    pub slot_minutes: u32,
    /// Hours a teacher may exceed its cap during construction.
    pub construction_slack_hours: f64,
    /// Crossover and mutation rates.
    pub operators: GeneticOperators,
    /// Whether [`evaluate_all`](Self::evaluate_all) may use the thread pool.
    pub parallel: bool,
    evaluator: FitnessEvaluator,
}

impl TimetableProblem {
    /// Creates a problem from a catalog and run parameters.
    pub fn from_config(catalog: Catalog, config: &GaConfig) -> Self {
        let evaluator = FitnessEvaluator::new(config.weights.clone(), config.slot_minutes)
            .with_unavailability(&catalog);

        Self {
            teacher_max_hours: catalog.max_hours_by_teacher(),
            catalog,
            slot_minutes: config.slot_minutes,
            construction_slack_hours: config.construction_slack_hours,
            operators: GeneticOperators::new(config.mutation_rate, config.swap_rate),
            parallel: config.parallel,
            evaluator,
        }
    }

    /// The fitness evaluator in use.
    pub fn evaluator(&self) -> &FitnessEvaluator {
        &self.evaluator
    }

    /// Builds `size` individuals greedily.
    pub fn create_population<R: Rng>(&self, size: usize, rng: &mut R) -> Result<Population> {
        initialize(
            size,
            &self.catalog,
            self.slot_minutes,
            self.construction_slack_hours,
            rng,
        )
    }

    /// Scores one individual.
    pub fn evaluate(&self, individual: &Individual) -> f64 {
        self.evaluator.evaluate(individual, &self.teacher_max_hours)
    }

    /// Violation counts of one individual.
    pub fn breakdown(&self, individual: &Individual) -> FitnessBreakdown {
        self.evaluator.breakdown(individual, &self.teacher_max_hours)
    }

    /// Scores a whole population, in population order.
    pub fn evaluate_all(&self, population: &[Individual]) -> Vec<f64> {
        #[cfg(feature = "parallel")]
        if self.parallel {
            use rayon::prelude::*;
            return population.par_iter().map(|ind| self.evaluate(ind)).collect();
        }

        population.iter().map(|ind| self.evaluate(ind)).collect()
    }

    /// Whole-year crossover.
    pub fn crossover<R: Rng>(
        &self,
        p1: &Individual,
        p2: &Individual,
        rng: &mut R,
    ) -> Result<(Individual, Individual)> {
        self.operators.crossover(p1, p2, rng)
    }

    /// Field and swap mutation.
    pub fn mutate<R: Rng>(&self, individual: &mut Individual, rng: &mut R) {
        self.operators.mutate(individual, &self.catalog, rng);
    }

    /// Conflict and gap repair.
    pub fn repair<R: Rng>(&self, individual: &mut Individual, rng: &mut R) -> RepairSummary {
        repair(
            individual,
            &self.catalog,
            &self.teacher_max_hours,
            self.slot_minutes,
            rng,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::ga::config::PenaltyWeights;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_from_config() {
        let config = GaConfig::default()
            .with_mutation_rate(0.3)
            .with_slot_minutes(45)
            .with_parallel(false);
        let problem = TimetableProblem::from_config(fixtures::school_catalog(), &config);

        assert_eq!(problem.teacher_max_hours.len(), 4);
        assert!((problem.teacher_max_hours["T4"] - 22.0).abs() < 1e-10);
        assert!((problem.operators.mutation_rate - 0.3).abs() < 1e-10);
        assert!(!problem.parallel);
        assert_eq!(problem.evaluator().weights(), &PenaltyWeights::default());
    }

    #[test]
    fn test_two_year_catalog_scores_zero() {
        let problem =
            TimetableProblem::from_config(fixtures::two_year_catalog(), &GaConfig::default());
        let mut rng = SmallRng::seed_from_u64(42);
        let population = problem.create_population(10, &mut rng).unwrap();

        for ind in &population {
            assert_eq!(ind.years[0].len(), 1);
            assert_eq!(ind.years[1].len(), 1);
        }
        assert!(problem.evaluate_all(&population).iter().all(|&f| f == 0.0));
    }

    #[test]
    fn test_overload_penalized_after_init() {
        let problem =
            TimetableProblem::from_config(fixtures::overloaded_catalog(), &GaConfig::default());
        let mut rng = SmallRng::seed_from_u64(42);
        let population = problem.create_population(3, &mut rng).unwrap();

        for ind in &population {
            assert!(problem.evaluate(ind) < 0.0);
            assert_eq!(problem.breakdown(ind).overloaded_teachers, 1);
        }
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let catalog = fixtures::school_catalog();
        let sequential = TimetableProblem::from_config(
            catalog.clone(),
            &GaConfig::default().with_parallel(false),
        );
        let parallel =
            TimetableProblem::from_config(catalog, &GaConfig::default().with_parallel(true));
        let mut rng = SmallRng::seed_from_u64(42);
        let population = sequential.create_population(16, &mut rng).unwrap();

        assert_eq!(
            sequential.evaluate_all(&population),
            parallel.evaluate_all(&population)
        );
    }

    #[test]
    fn test_offspring_pipeline_keeps_shape() {
        let problem =
            TimetableProblem::from_config(fixtures::school_catalog(), &GaConfig::default());
        let mut rng = SmallRng::seed_from_u64(42);
        let population = problem.create_population(2, &mut rng).unwrap();

        let (mut c1, mut c2) = problem
            .crossover(&population[0], &population[1], &mut rng)
            .unwrap();
        for child in [&mut c1, &mut c2] {
            problem.mutate(child, &mut rng);
            problem.repair(child, &mut rng);
            assert!(child.is_valid(&problem.catalog, problem.slot_minutes));
        }
    }
}
