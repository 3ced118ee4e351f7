//! Generation-by-generation GA engine.
//!
//! [`GaEngine`] owns the population and the random generator and exposes
//! each step of a generation separately: evaluation, selection, crossover
//! and replacement. The outer loop (how many generations, when to stop)
//! belongs to the caller; [`GaRunner`](super::GaRunner) is one such caller.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized --initialize--> Ready --evaluate_fitness--> Evaluated
//!                                          ^                    |
//!                                          |             advance_generation
//!                                          +---- Advanced <-----+
//! Evaluated --(stagnation reaches iter_stop)--> Converged
//! ```

use super::config::GaConfig;
use super::selection::Selection;
use super::types::{Ranked, Tour};
use crate::distance::DistanceProvider;
use crate::error::{Error, Result};
use crate::random::rng_from_seed;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::Rng;

/// Lifecycle state of a [`GaEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Built and validated, no population yet.
    Uninitialized,
    /// Population created, not scored.
    Ready,
    /// Population scored and ranked.
    Evaluated,
    /// Population replaced, not scored.
    Advanced,
    /// Best fitness unchanged for `iter_stop` evaluations.
    Converged,
}

impl EngineState {
    fn name(self) -> &'static str {
        match self {
            EngineState::Uninitialized => "uninitialized",
            EngineState::Ready => "ready",
            EngineState::Evaluated => "evaluated",
            EngineState::Advanced => "advanced",
            EngineState::Converged => "converged",
        }
    }
}

/// Genetic algorithm engine over the tours of one distance provider.
///
/// # Usage
///
/// ```
/// use u_tsp_ga::distance::DistanceMatrix;
/// use u_tsp_ga::ga::{GaConfig, GaEngine};
/// use u_tsp_ga::geo::Point;
///
/// let points = vec![
///     Point::new("Oslo", 59.91, 10.75),
///     Point::new("Stockholm", 59.33, 18.07),
///     Point::new("Helsinki", 60.17, 24.94),
///     Point::new("Copenhagen", 55.68, 12.57),
/// ];
/// let distances = DistanceMatrix::new(points).unwrap();
/// let config = GaConfig::default()
///     .with_pop_size(20)
///     .with_k_parents(5)
///     .with_tournament_k(3)
///     .with_seed(42);
///
/// let mut engine = GaEngine::from_config(config, &distances).unwrap();
/// engine.initialize().unwrap();
/// for _ in 0..10 {
///     engine.evaluate_fitness().unwrap();
///     if engine.is_converged() {
///         break;
///     }
///     engine.advance_generation().unwrap();
/// }
/// ```
pub struct GaEngine<'d, D: DistanceProvider + ?Sized, R: Rng = StdRng> {
    config: GaConfig,
    distances: &'d D,
    rng: R,
    state: EngineState,
    population: Vec<Tour<'d, D>>,
    ranked: Vec<Ranked>,
    /// Best fitness of the previous evaluation.
    last_best: Option<f64>,
    stagnation: usize,
    generation: usize,
    /// Population slot holding the individual carried over by elitism.
    elite: Option<usize>,
}

impl<'d, D: DistanceProvider + ?Sized> GaEngine<'d, D, StdRng> {
    /// Builds an engine whose generator is seeded from `config.seed`.
    pub fn from_config(config: GaConfig, distances: &'d D) -> Result<Self> {
        let rng = rng_from_seed(config.seed);
        Self::new(config, distances, rng)
    }
}

impl<'d, D: DistanceProvider + ?Sized, R: Rng> GaEngine<'d, D, R> {
    /// Builds an engine with an explicit generator.
    ///
    /// Validates `config` and rejects an empty point set.
    pub fn new(config: GaConfig, distances: &'d D, rng: R) -> Result<Self> {
        config.validate()?;
        if distances.is_empty() {
            return Err(Error::invalid_configuration("point set is empty"));
        }
        Ok(Self {
            config,
            distances,
            rng,
            state: EngineState::Uninitialized,
            population: Vec::new(),
            ranked: Vec::new(),
            last_best: None,
            stagnation: 0,
            generation: 0,
            elite: None,
        })
    }

    /// Creates `pop_size` random tours.
    pub fn initialize(&mut self) -> Result<()> {
        self.require(&[EngineState::Uninitialized], "initialize")?;
        let distances = self.distances;
        self.population = (0..self.config.pop_size)
            .map(|_| Tour::random(distances, &mut self.rng))
            .collect();
        self.state = EngineState::Ready;
        log::debug!(
            "initialized {} tours over {} points, {} parents per generation",
            self.population.len(),
            distances.len(),
            self.config.parent_count()
        );
        Ok(())
    }

    /// Scores every tour, ranks the population and updates convergence
    /// tracking. Returns the best fitness of this generation.
    pub fn evaluate_fitness(&mut self) -> Result<f64> {
        self.require(&[EngineState::Ready, EngineState::Advanced], "evaluate fitness")?;

        let fitness = evaluate_population(&self.population, self.config.parallel)?;
        let mut ranked: Vec<Ranked> = fitness
            .into_iter()
            .enumerate()
            .map(|(index, fitness)| Ranked { index, fitness })
            .collect();
        ranked.sort_by(|a, b| {
            a.fitness
                .partial_cmp(&b.fitness)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        self.ranked = ranked;

        let best = self.ranked[0].fitness;
        if let Some(last) = self.last_best {
            if last == best {
                self.stagnation += 1;
            } else {
                self.stagnation = 0;
            }
        }
        self.last_best = Some(best);

        self.state = if self.config.iter_stop > 0 && self.stagnation >= self.config.iter_stop {
            EngineState::Converged
        } else {
            EngineState::Evaluated
        };
        Ok(best)
    }

    /// Selects parents with the configured strategy.
    ///
    /// Returns population indices; see [`select_with`](Self::select_with).
    pub fn select(&mut self) -> Result<Vec<usize>> {
        self.select_with(self.config.selection)
    }

    /// Selects parents with a strategy given by name.
    pub fn select_by_name(&mut self, name: &str) -> Result<Vec<usize>> {
        self.select_with(name.parse()?)
    }

    /// Selects [`GaConfig::parent_count`] parents with `selection`.
    pub fn select_with(&mut self, selection: Selection) -> Result<Vec<usize>> {
        self.require_ranked("select parents")?;
        let params = self.config.selection_params();
        selection.select(&self.ranked, &params, &mut self.rng)
    }

    /// Builds one child from the tours at the given population indices.
    pub fn crossover(&mut self, parents: &[usize]) -> Result<Tour<'d, D>> {
        if parents.is_empty() {
            return Err(Error::invalid_configuration("crossover needs at least one parent"));
        }
        let pool = parents
            .iter()
            .map(|&i| {
                self.population.get(i).ok_or_else(|| {
                    Error::invalid_configuration(format!(
                        "parent index {i} outside population of {}",
                        self.population.len()
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(crossover_pool(&pool, &mut self.rng))
    }

    /// Replaces the population with the next generation.
    ///
    /// Selects parents, carries the champion over when elitism is on,
    /// fills the remaining slots with crossover children or fresh random
    /// tours, and mutates every new tour.
    pub fn advance_generation(&mut self) -> Result<()> {
        self.require(&[EngineState::Evaluated], "advance the generation")?;

        let mut parents = self.select()?;
        let pop_size = self.config.pop_size;
        let mut next: Vec<Tour<'d, D>> = Vec::with_capacity(pop_size);

        if self.config.elitism {
            let champion = self.ranked[0].index;
            parents.retain(|&i| i != champion);
            parents.insert(0, champion);
            next.push(self.population[champion].clone());
        }
        log::trace!(
            "generation {}: {} parents {:?}",
            self.generation,
            parents.len(),
            parents
        );

        let pool: Vec<&Tour<'d, D>> = parents.iter().map(|&i| &self.population[i]).collect();
        while next.len() < pop_size {
            let child = if self.rng.random_bool(self.config.crossover_prob) {
                crossover_pool(&pool, &mut self.rng)
            } else {
                Tour::random(self.distances, &mut self.rng)
            };
            next.push(child);
        }

        let carried = usize::from(self.config.elitism);
        for tour in &mut next[carried..] {
            tour.mutate(
                self.config.mutation_prob,
                self.config.mutation_gene_change_percent,
                &mut self.rng,
            );
        }

        self.population = next;
        self.ranked.clear();
        self.elite = self.config.elitism.then_some(0);
        self.generation += 1;
        self.state = EngineState::Advanced;
        Ok(())
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    pub fn distances(&self) -> &'d D {
        self.distances
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Returns `true` once the best fitness has stayed the same for
    /// `iter_stop` consecutive evaluations.
    pub fn is_converged(&self) -> bool {
        self.state == EngineState::Converged
    }

    /// The current population.
    pub fn population(&self) -> &[Tour<'d, D>] {
        &self.population
    }

    /// The ranking of the current population; empty until evaluated.
    pub fn ranked(&self) -> &[Ranked] {
        &self.ranked
    }

    /// Best tour of the current, evaluated population.
    pub fn best(&self) -> Option<&Tour<'d, D>> {
        self.ranked.first().map(|r| &self.population[r.index])
    }

    /// Best fitness of the latest evaluation.
    pub fn best_fitness(&self) -> Option<f64> {
        self.last_best
    }

    /// Consecutive evaluations without a change in best fitness.
    pub fn stagnation(&self) -> usize {
        self.stagnation
    }

    /// Number of completed [`advance_generation`](Self::advance_generation) calls.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// The tour carried over unchanged from the previous generation, if
    /// elitism produced the current population.
    pub fn elite(&self) -> Option<&Tour<'d, D>> {
        self.elite.map(|i| &self.population[i])
    }

    fn require(&self, allowed: &[EngineState], operation: &'static str) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(Error::InvalidState {
                operation,
                state: self.state.name(),
            })
        }
    }

    fn require_ranked(&self, operation: &'static str) -> Result<()> {
        self.require(&[EngineState::Evaluated, EngineState::Converged], operation)
    }
}

/// Crossover over a parent pool: two distinct pool entries are picked at
/// random when the pool has more than two, a single parent pairs with
/// itself.
fn crossover_pool<'d, D, R>(pool: &[&Tour<'d, D>], rng: &mut R) -> Tour<'d, D>
where
    D: DistanceProvider + ?Sized,
    R: Rng,
{
    let (a, b) = match pool.len() {
        1 => (pool[0], pool[0]),
        2 => (pool[0], pool[1]),
        n => {
            let picked = index::sample(rng, n, 2);
            (pool[picked.index(0)], pool[picked.index(1)])
        }
    };
    Tour::crossover(a, b, rng)
}

/// Scores every tour, in order.
fn evaluate_population<D: DistanceProvider + ?Sized>(
    population: &[Tour<'_, D>],
    parallel: bool,
) -> Result<Vec<f64>> {
    #[cfg(feature = "parallel")]
    {
        if parallel {
            use rayon::prelude::*;
            return population.par_iter().map(|t| t.fitness()).collect();
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    population.iter().map(|t| t.fitness()).collect()
}

// ============================================================================
// Tests
// ============================================================================
