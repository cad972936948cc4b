//! Evolution controller and run driver.
//!
//! # Generation step
//!
//! The current population is already scored when a step starts.
//! 1. If the best score reaches `stop_threshold`, the run converges.
//! 2. If every score is equal, or the worst is at or below
//!    `reset_threshold`, the population is discarded and rebuilt from
//!    scratch.
//! 3. Otherwise a same-sized offspring population is bred: select two
//!    parents, cross them over, mutate and repair both children.
//!
//! Resets count against `max_generations` like regular generations, so
//! a run always terminates. The population produced by the last step is
//! still checked against `stop_threshold` before a run is declared
//! exhausted. The best individual seen across all generations (resets
//! included) is what a run returns.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::chromosome::{Individual, Population};
use super::config::GaConfig;
use super::problem::TimetableProblem;
use crate::error::{Result, TimetableError};
use crate::kpi::TimetableKpi;
use crate::models::Catalog;
use crate::validation::validate_catalog;

/// Why a population was reinitialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResetCause {
    /// Every individual had the same score.
    Uniform,
    /// The worst score fell to `reset_threshold` or below.
    BelowThreshold,
}

/// Outcome of one controller step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Step {
    /// The stop threshold was reached. Terminal.
    Converged,
    /// The population was rebuilt from scratch.
    Reset(ResetCause),
    /// An offspring population replaced the current one.
    Evolved,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Termination {
    /// The best score reached `stop_threshold`.
    Converged,
    /// `max_generations` ran out first.
    Exhausted,
}

/// Per-generation data handed to observers.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    /// Generation the scores belong to (0 = initial population).
    pub generation: usize,
    /// Scores of the population the step judged, in population order.
    pub fitness: Vec<f64>,
    /// Highest score.
    pub best: f64,
    /// Lowest score.
    pub worst: f64,
    /// What the controller did with that population.
    pub step: Step,
}

/// Final result of a run.
#[derive(Debug, Clone, Serialize)]
pub struct GaResult {
    /// Best timetable seen.
    pub best: Individual,
    /// Its score.
    pub best_fitness: f64,
    /// Controller steps taken.
    pub generations: usize,
    /// How many of those steps were resets.
    pub resets: usize,
    /// How the run ended.
    pub termination: Termination,
    /// Quality indicators of `best`.
    pub kpi: TimetableKpi,
}

/// Steps a population through generations.
pub struct EvolutionController {
    problem: TimetableProblem,
    config: GaConfig,
    rng: SmallRng,
    population: Population,
    fitness: Vec<f64>,
    generation: usize,
    resets: usize,
    best: Individual,
    best_fitness: f64,
}

impl EvolutionController {
    /// Builds and scores the initial population.
    ///
    /// # Errors
    /// - [`TimetableError::InvalidConfig`] from [`GaConfig::validate`]
    /// - [`TimetableError::InfeasibleSchedule`] if construction fails
    pub fn new(problem: TimetableProblem, config: GaConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_rng(&mut rand::rng()),
        };

        let population = problem.create_population(config.population_size, &mut rng)?;
        let fitness = problem.evaluate_all(&population);
        let mut controller = Self {
            problem,
            config,
            rng,
            population,
            fitness,
            generation: 0,
            resets: 0,
            best: Individual::default(),
            best_fitness: f64::NEG_INFINITY,
        };
        controller.track_best();
        Ok(controller)
    }

    /// Current population.
    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    /// Scores of the current population.
    pub fn fitness(&self) -> &[f64] {
        &self.fitness
    }

    /// Steps taken so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Resets performed so far.
    pub fn resets(&self) -> usize {
        self.resets
    }

    /// Best individual seen and its score.
    pub fn best(&self) -> (&Individual, f64) {
        (&self.best, self.best_fitness)
    }

    /// The problem being solved.
    pub fn problem(&self) -> &TimetableProblem {
        &self.problem
    }

    /// Performs one step on the current (scored) population.
    pub fn step(&mut self) -> Result<Step> {
        let (best, worst) = extremes(&self.fitness);

        if best >= self.config.stop_threshold {
            return Ok(Step::Converged);
        }

        let cause = if self.fitness.iter().all(|&f| f == self.fitness[0]) {
            Some(ResetCause::Uniform)
        } else if worst <= self.config.reset_threshold {
            Some(ResetCause::BelowThreshold)
        } else {
            None
        };

        self.population = match cause {
            Some(cause) => {
                warn!(
                    generation = self.generation,
                    ?cause,
                    best,
                    worst,
                    "reinitializing population"
                );
                self.resets += 1;
                self.problem
                    .create_population(self.config.population_size, &mut self.rng)?
            }
            None => self.breed()?,
        };
        self.fitness = self.problem.evaluate_all(&self.population);
        self.generation += 1;
        self.track_best();

        Ok(cause.map_or(Step::Evolved, Step::Reset))
    }

    fn breed(&mut self) -> Result<Population> {
        let size = self.config.population_size;
        let mut next = Vec::with_capacity(size + 1);

        while next.len() < size {
            let (p1, p2) =
                self.config
                    .selection
                    .select_pair(&self.population, &self.fitness, &mut self.rng)?;
            let (c1, c2) = self.problem.crossover(p1, p2, &mut self.rng)?;

            for mut child in [c1, c2] {
                self.problem.mutate(&mut child, &mut self.rng);
                self.problem.repair(&mut child, &mut self.rng);
                next.push(child);
            }
        }

        next.truncate(size);
        Ok(next)
    }

    fn track_best(&mut self) {
        let leader = self
            .fitness
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1));
        if let Some((idx, &score)) = leader {
            if score > self.best_fitness {
                self.best_fitness = score;
                self.best = self.population[idx].clone();
            }
        }
    }
}

fn extremes(fitness: &[f64]) -> (f64, f64) {
    fitness
        .iter()
        .fold((f64::NEG_INFINITY, f64::INFINITY), |(hi, lo), &f| {
            (hi.max(f), lo.min(f))
        })
}

/// Runs the timetabling GA.
///
/// # Usage
///
/// ```
/// use u_timetable::ga::{GaConfig, GaRunner, Termination};
/// use u_timetable::models::{Catalog, Classroom, Course, Day, Teacher, Timeslot, Year};
///
/// let catalog = Catalog::new()
///     .with_teacher(Teacher::new("T1", 10.0).with_course("c1"))
///     .with_teacher(Teacher::new("T2", 10.0).with_course("c2"))
///     .with_classroom(Classroom::new("R1"))
///     .with_classroom(Classroom::new("R2"))
///     .with_year(Year::new("Y1").with_course(Course::new("c1", 0.75)))
///     .with_year(Year::new("Y2").with_course(Course::new("c2", 0.75)))
///     .with_timeslots(Timeslot::consecutive(Day::Monday, 1, 480, 45, 4));
///
/// let result = GaRunner::run(&catalog, &GaConfig::default().with_seed(42)).unwrap();
/// assert_eq!(result.termination, Termination::Converged);
/// assert_eq!(result.best_fitness, 0.0);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs to convergence or until the generation budget is spent.
    pub fn run(catalog: &Catalog, config: &GaConfig) -> Result<GaResult> {
        Self::run_with_observer(catalog, config, |_| {})
    }

    /// Like [`run`](Self::run), calling `observer` after every step.
    ///
    /// # Errors
    /// - [`TimetableError::InvalidConfig`] for a rejected configuration
    /// - [`TimetableError::InvalidCatalog`] with every catalog problem found
    /// - [`TimetableError::InfeasibleSchedule`] if construction fails
    pub fn run_with_observer<F>(
        catalog: &Catalog,
        config: &GaConfig,
        mut observer: F,
    ) -> Result<GaResult>
    where
        F: FnMut(&GenerationReport),
    {
        config.validate()?;
        validate_catalog(catalog, config.slot_minutes).map_err(TimetableError::InvalidCatalog)?;

        info!(
            years = catalog.years.len(),
            teachers = catalog.teachers.len(),
            genes = catalog.gene_count(config.slot_minutes),
            population = config.population_size,
            max_generations = config.max_generations,
            "starting timetable GA"
        );

        let problem = TimetableProblem::from_config(catalog.clone(), config);
        let mut controller = EvolutionController::new(problem, config.clone())?;
        let mut termination = Termination::Exhausted;

        while controller.generation() < config.max_generations {
            let generation = controller.generation();
            let fitness = controller.fitness().to_vec();
            let step = controller.step()?;
            let (best, worst) = extremes(&fitness);

            debug!(generation, best, worst, ?step, "generation");
            observer(&GenerationReport {
                generation,
                fitness,
                best,
                worst,
                step,
            });

            if step == Step::Converged {
                termination = Termination::Converged;
                break;
            }
        }

        // The last bred population has not been judged yet.
        if termination == Termination::Exhausted {
            let (best, worst) = extremes(controller.fitness());
            if best >= config.stop_threshold {
                let generation = controller.generation();
                debug!(generation, best, worst, "stop threshold reached on the last generation");
                observer(&GenerationReport {
                    generation,
                    fitness: controller.fitness().to_vec(),
                    best,
                    worst,
                    step: Step::Converged,
                });
                termination = Termination::Converged;
            }
        }

        let (best, best_fitness) = controller.best();
        let kpi = TimetableKpi::calculate(best, controller.problem());
        info!(
            ?termination,
            best_fitness,
            generations = controller.generation(),
            resets = controller.resets(),
            "timetable GA finished"
        );

        Ok(GaResult {
            best: best.clone(),
            best_fitness,
            generations: controller.generation(),
            resets: controller.resets(),
            termination,
            kpi,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::validation::ValidationErrorKind;

    fn controller(catalog: Catalog, config: GaConfig) -> EvolutionController {
        let problem = TimetableProblem::from_config(catalog, &config);
        EvolutionController::new(problem, config).unwrap()
    }

    #[test]
    fn test_uniform_population_resets() {
        // Every individual scores 0, which never reaches a stop threshold of 1.
        let config = GaConfig::default()
            .with_stop_threshold(1.0)
            .with_seed(42);
        let mut ctl = controller(fixtures::two_year_catalog(), config);
        assert!(ctl.fitness().iter().all(|&f| f == 0.0));

        assert_eq!(ctl.step().unwrap(), Step::Reset(ResetCause::Uniform));
        assert_eq!(ctl.resets(), 1);
        assert_eq!(ctl.generation(), 1);
        assert_eq!(ctl.population().len(), 10);
    }

    #[test]
    fn test_low_scores_reset() {
        // Overload is the only penalty and it hits every individual.
        let config = GaConfig::default()
            .with_stop_threshold(1.0)
            .with_reset_threshold(-5.0)
            .with_seed(42);
        let mut ctl = controller(fixtures::overloaded_catalog(), config);

        assert!(matches!(ctl.step().unwrap(), Step::Reset(_)));
        assert_eq!(ctl.resets(), 1);
    }

    #[test]
    fn test_converged_step_is_terminal() {
        let mut ctl = controller(fixtures::two_year_catalog(), GaConfig::default().with_seed(42));
        assert_eq!(ctl.step().unwrap(), Step::Converged);
        assert_eq!(ctl.generation(), 0);
        assert_eq!(ctl.best().1, 0.0);
    }

    #[test]
    fn test_evolution_keeps_population_size() {
        let config = GaConfig::default()
            .with_population_size(7)
            .with_stop_threshold(1.0)
            .with_reset_threshold(-10_000.0)
            .with_seed(42);
        let mut ctl = controller(fixtures::school_catalog(), config);

        for _ in 0..5 {
            ctl.step().unwrap();
            assert_eq!(ctl.population().len(), 7);
            assert_eq!(ctl.fitness().len(), 7);
            for ind in ctl.population() {
                assert!(ind.is_valid(&ctl.problem().catalog, 45));
            }
        }
        assert_eq!(ctl.generation(), 5);
    }

    #[test]
    fn test_best_never_regresses() {
        let config = GaConfig::default()
            .with_stop_threshold(1.0)
            .with_reset_threshold(-10_000.0)
            .with_seed(42);
        let mut ctl = controller(fixtures::school_catalog(), config);

        let mut previous = ctl.best().1;
        for _ in 0..10 {
            ctl.step().unwrap();
            let (best, score) = ctl.best();
            assert!(score >= previous);
            assert_eq!(ctl.problem().evaluate(best), score);
            previous = score;
        }
    }

    #[test]
    fn test_run_converges() {
        let result =
            GaRunner::run(&fixtures::two_year_catalog(), &GaConfig::default().with_seed(42))
                .unwrap();

        assert_eq!(result.termination, Termination::Converged);
        assert_eq!(result.best_fitness, 0.0);
        assert_eq!(result.generations, 0);
        assert!(result.kpi.is_feasible());
    }

    #[test]
    fn test_run_exhausts_budget() {
        let config = GaConfig::default()
            .with_max_generations(8)
            .with_stop_threshold(1.0)
            .with_seed(42);
        let mut reports = Vec::new();
        let result = GaRunner::run_with_observer(&fixtures::school_catalog(), &config, |r| {
            reports.push(r.clone())
        })
        .unwrap();

        assert_eq!(result.termination, Termination::Exhausted);
        assert_eq!(result.generations, 8);
        assert_eq!(reports.len(), 8);
        for (i, report) in reports.iter().enumerate() {
            assert_eq!(report.generation, i);
            assert_eq!(report.fitness.len(), 10);
            assert!(report.best >= report.worst);
            assert!(result.best_fitness >= report.best);
        }
        assert_eq!(
            result.resets,
            reports.iter().filter(|r| matches!(r.step, Step::Reset(_))).count()
        );
    }

    #[test]
    fn test_termination_matches_best_fitness() {
        let stop = -10.0;
        for seed in 0..40 {
            for max_generations in 1..=3 {
                let config = GaConfig::default()
                    .with_max_generations(max_generations)
                    .with_stop_threshold(stop)
                    .with_seed(seed);
                let mut reports = Vec::new();
                let result =
                    GaRunner::run_with_observer(&fixtures::school_catalog(), &config, |r| {
                        reports.push(r.clone())
                    })
                    .unwrap();

                let converged = result.termination == Termination::Converged;
                assert_eq!(converged, result.best_fitness >= stop, "seed {seed}");
                if converged {
                    let last = reports.last().unwrap();
                    assert_eq!(last.step, Step::Converged);
                    assert_eq!(last.best, result.best_fitness);
                } else {
                    assert!(reports.iter().all(|r| r.step != Step::Converged));
                }
            }
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let config = GaConfig::default()
            .with_max_generations(5)
            .with_stop_threshold(1.0)
            .with_seed(7);
        let a = GaRunner::run(&fixtures::school_catalog(), &config).unwrap();
        let b = GaRunner::run(&fixtures::school_catalog(), &config).unwrap();

        assert_eq!(a.best, b.best);
        assert_eq!(a.best_fitness, b.best_fitness);
    }

    #[test]
    fn test_run_rejects_invalid_catalog() {
        let mut catalog = fixtures::two_year_catalog();
        catalog.classrooms.clear();

        match GaRunner::run(&catalog, &GaConfig::default()) {
            Err(TimetableError::InvalidCatalog(errors)) => {
                assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::EmptyCatalog));
            }
            other => panic!("expected invalid catalog, got {other:?}"),
        }
    }

    #[test]
    fn test_run_rejects_invalid_config() {
        let config = GaConfig::default().with_population_size(0);
        assert!(matches!(
            GaRunner::run(&fixtures::two_year_catalog(), &config),
            Err(TimetableError::InvalidConfig(_))
        ));
    }
}
