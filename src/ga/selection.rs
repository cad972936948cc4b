//! Parent selection.
//!
//! Both strategies favor higher fitness (scores are non-positive, 0 is
//! best). Selection only borrows; parents are cloned by crossover.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::chromosome::Individual;
use crate::error::{Result, TimetableError};

/// Parent selection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Selection {
    /// Draw `size` distinct individuals, keep the best two.
    Tournament { size: usize },
    /// Fitness-proportionate draw, shifted so the worst weighs 1.
    Roulette,
}

impl Selection {
    /// Picks two parents, the first at least as fit as the second for
    /// tournaments.
    pub fn select_pair<'a, R: Rng>(
        &self,
        population: &'a [Individual],
        fitness: &[f64],
        rng: &mut R,
    ) -> Result<(&'a Individual, &'a Individual)> {
        match *self {
            Self::Tournament { size } => tournament(population, fitness, size, rng),
            Self::Roulette => {
                let first = roulette(population, fitness, rng)?;
                let second = roulette(population, fitness, rng)?;
                Ok((first, second))
            }
        }
    }
}

fn check(population: &[Individual], fitness: &[f64]) -> Result<()> {
    if population.is_empty() {
        return Err(TimetableError::EmptyPopulation);
    }
    if population.len() != fitness.len() {
        return Err(TimetableError::StructuralMismatch {
            left: population.len(),
            right: fitness.len(),
        });
    }
    Ok(())
}

/// Tournament selection.
///
/// Samples `k` distinct individuals (`k` clamped to `[2, len]`) and
/// returns the two fittest, fittest first. A population of one returns
/// that individual twice.
///
/// # Errors
/// - [`TimetableError::EmptyPopulation`] for an empty population
/// - [`TimetableError::StructuralMismatch`] if `fitness` is not parallel
///   to `population`
pub fn tournament<'a, R: Rng>(
    population: &'a [Individual],
    fitness: &[f64],
    k: usize,
    rng: &mut R,
) -> Result<(&'a Individual, &'a Individual)> {
    check(population, fitness)?;
    let n = population.len();
    if n == 1 {
        return Ok((&population[0], &population[0]));
    }

    let k = k.clamp(2, n);
    let mut contenders = rand::seq::index::sample(rng, n, k).into_vec();
    contenders.sort_by(|&a, &b| fitness[b].total_cmp(&fitness[a]));

    Ok((&population[contenders[0]], &population[contenders[1]]))
}

/// Roulette-wheel selection.
///
/// Weights are `f - min + 1`, so the least fit individual keeps a
/// weight of 1 and better ones draw proportionally more often.
/// Non-finite scores fall back to a uniform draw.
///
/// # Errors
/// Same as [`tournament`].
pub fn roulette<'a, R: Rng>(
    population: &'a [Individual],
    fitness: &[f64],
    rng: &mut R,
) -> Result<&'a Individual> {
    check(population, fitness)?;
    let min = fitness.iter().copied().fold(f64::INFINITY, f64::min);
    let indices: Vec<usize> = (0..population.len()).collect();

    let idx = match indices.choose_weighted(rng, |&i| fitness[i] - min + 1.0) {
        Ok(&i) => i,
        Err(_) => rng.random_range(0..population.len()),
    };
    Ok(&population[idx])
}
