//! Full GA runs.
//!
//! [`GaRunner`] drives a [`GaEngine`] for up to `generations` generations,
//! stops early once the best fitness has not changed for `iter_stop`
//! generations, and collects the route of each reported best tour.

use super::config::GaConfig;
use super::engine::GaEngine;
use super::types::RouteRecord;
use crate::distance::DistanceProvider;
use crate::error::{Error, Result};
use crate::geo::Point;
use rand::Rng;

/// Result of a GA run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TspResult {
    /// Chromosome of the shortest tour found during the whole run.
    pub best_tour: Vec<usize>,

    /// Length of `best_tour`.
    pub best_fitness: f64,

    /// Number of generations evaluated.
    pub generations: usize,

    /// Whether the run stopped because the best fitness stagnated.
    pub stagnated: bool,

    /// Best fitness of each evaluated generation.
    pub fitness_history: Vec<f64>,

    /// Routes of the reported best tours, for rendering.
    pub routes: Vec<RouteRecord>,
}

impl TspResult {
    /// Point names of the best tour, in visiting order.
    pub fn best_route_names<'p>(&self, points: &'p [Point]) -> Vec<&'p str> {
        self.best_tour
            .iter()
            .filter_map(|&i| points.get(i).map(|p| p.name.as_str()))
            .collect()
    }
}

/// Executes complete GA runs.
///
/// # Usage
///
/// ```ignore
/// let distances = DistanceMatrix::new(points)?;
/// let config = GaConfig::default().with_pop_size(500).with_seed(42);
/// let result = GaRunner::run(&distances, &config)?;
/// println!("{:.1} km", result.best_fitness);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA with a generator seeded from `config.seed`.
    pub fn run<D: DistanceProvider + ?Sized>(distances: &D, config: &GaConfig) -> Result<TspResult> {
        let engine = GaEngine::from_config(config.clone(), distances)?;
        Self::run_engine(engine)
    }

    /// Runs the GA on an engine that has not been initialized yet.
    pub fn run_engine<D, R>(mut engine: GaEngine<'_, D, R>) -> Result<TspResult>
    where
        D: DistanceProvider + ?Sized,
        R: Rng,
    {
        let config = engine.config().clone();
        if config.generations == 0 {
            return Err(Error::invalid_configuration("generations must be at least 1"));
        }
        engine.initialize()?;

        let mut best: Option<(Vec<usize>, f64)> = None;
        let mut previous: Option<(Vec<usize>, f64)> = None;
        let mut fitness_history = Vec::with_capacity(config.generations);
        let mut routes = Vec::new();
        let mut stagnated = false;

        for generation in 0..config.generations {
            let gen_best = engine.evaluate_fitness()?;
            fitness_history.push(gen_best);
            log::info!("generation #{generation}: best fitness {gen_best:.3}");

            let champion = engine.best().ok_or(Error::InvalidState {
                operation: "read the best tour",
                state: "unranked",
            })?;

            let changed = match &previous {
                None => true,
                Some((tour, fitness)) => tour.as_slice() != champion.chromosome() || gen_best < *fitness,
            };
            if !config.show_only_changes || changed {
                routes.extend(champion.route_records(generation, gen_best)?);
            }

            if best.as_ref().map_or(true, |(_, f)| gen_best < *f) {
                best = Some((champion.chromosome().to_vec(), gen_best));
            }
            previous = Some((champion.chromosome().to_vec(), gen_best));

            if engine.is_converged() {
                log::info!(
                    "best fitness unchanged for {} generations, stopping at generation #{generation}",
                    engine.stagnation()
                );
                stagnated = true;
                break;
            }
            engine.advance_generation()?;
        }

        let (best_tour, best_fitness) = best.ok_or(Error::InvalidState {
            operation: "report the best tour",
            state: "unevaluated",
        })?;
        Ok(TspResult {
            best_tour,
            best_fitness,
            generations: fitness_history.len(),
            stagnated,
            fitness_history,
            routes,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
