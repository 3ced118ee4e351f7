//! GA configuration.
//!
//! [`GaConfig`] holds every parameter of one run. It is validated once, when
//! the engine is built, so a bad value never surfaces mid-run.

use super::selection::{Selection, SelectionParams};
use crate::error::{Error, Result};

/// Configuration for the TSP genetic algorithm.
///
/// # Defaults
///
/// ```
/// use u_tsp_ga::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.pop_size, 5000);
/// assert_eq!(config.generations, 500);
/// assert!(config.elitism);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_tsp_ga::ga::{GaConfig, Selection};
///
/// let config = GaConfig::default()
///     .with_pop_size(200)
///     .with_selection(Selection::Rank)
///     .with_k_parents(20)
///     .with_mutation_prob(0.3)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.parent_count(), 19);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GaConfig {
    /// Number of tours in every generation.
    #[cfg_attr(feature = "serde", serde(alias = "population"))]
    pub pop_size: usize,

    /// Carry the best tour of each generation unchanged into the next one.
    pub elitism: bool,

    /// Probability that a new slot is filled by crossover rather than by a
    /// fresh random tour (0.0–1.0).
    pub crossover_prob: f64,

    /// Probability that each index of the mutation window is swapped
    /// (0.0–1.0).
    pub mutation_prob: f64,

    /// Parents drawn per generation. One slot goes to the elite when
    /// elitism is on; see [`parent_count`](Self::parent_count).
    #[cfg_attr(feature = "serde", serde(alias = "k_best"))]
    pub k_parents: usize,

    /// Parent selection strategy.
    pub selection: Selection,

    /// Fraction of the chromosome, from the front, that mutation may touch
    /// (0.0–1.0).
    #[cfg_attr(feature = "serde", serde(alias = "mut_change"))]
    pub mutation_gene_change_percent: f64,

    /// Tournament sample size. Only used by [`Selection::Tournament`].
    pub tournament_k: usize,

    /// Allow the same tour to be picked as a parent more than once.
    pub same_parents: bool,

    /// Maximum number of generations.
    pub generations: usize,

    /// Generations without a change in best fitness before stopping.
    ///
    /// Set to 0 to disable stagnation-based termination.
    pub iter_stop: usize,

    /// Only report a best route when it differs from the previous
    /// generation's best.
    pub show_only_changes: bool,

    /// Whether to evaluate tours in parallel using rayon.
    ///
    /// Has no effect unless the `parallel` feature is enabled.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            pop_size: 5000,
            elitism: true,
            crossover_prob: 0.95,
            mutation_prob: 0.95,
            k_parents: 100,
            selection: Selection::default(),
            mutation_gene_change_percent: 0.0005,
            tournament_k: 10,
            same_parents: false,
            generations: 500,
            iter_stop: 100,
            show_only_changes: true,
            parallel: true,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_pop_size(mut self, n: usize) -> Self {
        self.pop_size = n;
        self
    }

    /// Enables or disables elitism.
    pub fn with_elitism(mut self, elitism: bool) -> Self {
        self.elitism = elitism;
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_prob(mut self, p: f64) -> Self {
        self.crossover_prob = p;
        self
    }

    /// Sets the per-gene mutation probability.
    pub fn with_mutation_prob(mut self, p: f64) -> Self {
        self.mutation_prob = p;
        self
    }

    /// Sets the number of parents drawn per generation.
    pub fn with_k_parents(mut self, k: usize) -> Self {
        self.k_parents = k;
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    /// Sets the mutation window as a fraction of the chromosome.
    pub fn with_mutation_gene_change_percent(mut self, fraction: f64) -> Self {
        self.mutation_gene_change_percent = fraction;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_k(mut self, k: usize) -> Self {
        self.tournament_k = k;
        self
    }

    /// Allows or forbids duplicate parents.
    pub fn with_same_parents(mut self, same_parents: bool) -> Self {
        self.same_parents = same_parents;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the stagnation patience (0 to disable).
    pub fn with_iter_stop(mut self, n: usize) -> Self {
        self.iter_stop = n;
        self
    }

    /// Reports every generation's best route, or only changed ones.
    pub fn with_show_only_changes(mut self, only_changes: bool) -> Self {
        self.show_only_changes = only_changes;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of parents selection returns each generation:
    /// `k_parents - 1` with elitism, `k_parents` without.
    pub fn parent_count(&self) -> usize {
        if self.elitism {
            self.k_parents.saturating_sub(1)
        } else {
            self.k_parents
        }
    }

    /// Selection parameters derived from this configuration.
    pub fn selection_params(&self) -> SelectionParams {
        SelectionParams {
            count: self.parent_count(),
            tournament_k: self.tournament_k,
            same_parents: self.same_parents,
        }
    }

    /// Validates the configuration.
    ///
    /// Returns [`Error::InvalidConfiguration`] describing the first invalid
    /// parameter.
    pub fn validate(&self) -> Result<()> {
        if self.pop_size < 2 {
            return Err(Error::invalid_configuration(format!(
                "pop_size must be at least 2, got {}",
                self.pop_size
            )));
        }
        for (name, value) in [
            ("crossover_prob", self.crossover_prob),
            ("mutation_prob", self.mutation_prob),
            ("mutation_gene_change_percent", self.mutation_gene_change_percent),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::invalid_configuration(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if self.k_parents == 0 {
            return Err(Error::invalid_configuration("k_parents must be at least 1"));
        }
        self.selection
            .check(self.pop_size, &self.selection_params())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> GaConfig {
        GaConfig::default()
            .with_pop_size(50)
            .with_k_parents(10)
            .with_tournament_k(3)
    }

    #[test]
    fn test_default_config() {
        let config = GaConfig::default();
        assert_eq!(config.pop_size, 5000);
        assert!(config.elitism);
        assert!((config.crossover_prob - 0.95).abs() < 1e-10);
        assert!((config.mutation_prob - 0.95).abs() < 1e-10);
        assert_eq!(config.k_parents, 100);
        assert_eq!(config.selection, Selection::Tournament);
        assert!((config.mutation_gene_change_percent - 0.0005).abs() < 1e-15);
        assert_eq!(config.tournament_k, 10);
        assert!(!config.same_parents);
        assert_eq!(config.generations, 500);
        assert_eq!(config.iter_stop, 100);
        assert!(config.show_only_changes);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GaConfig::default()
            .with_pop_size(200)
            .with_elitism(false)
            .with_crossover_prob(0.8)
            .with_mutation_prob(0.05)
            .with_k_parents(30)
            .with_selection(Selection::Roulette)
            .with_mutation_gene_change_percent(0.1)
            .with_tournament_k(4)
            .with_same_parents(true)
            .with_generations(1000)
            .with_iter_stop(20)
            .with_show_only_changes(false)
            .with_parallel(false)
            .with_seed(42);

        assert_eq!(config.pop_size, 200);
        assert!(!config.elitism);
        assert!((config.crossover_prob - 0.8).abs() < 1e-10);
        assert!((config.mutation_prob - 0.05).abs() < 1e-10);
        assert_eq!(config.k_parents, 30);
        assert_eq!(config.selection, Selection::Roulette);
        assert!((config.mutation_gene_change_percent - 0.1).abs() < 1e-10);
        assert_eq!(config.tournament_k, 4);
        assert!(config.same_parents);
        assert_eq!(config.generations, 1000);
        assert_eq!(config.iter_stop, 20);
        assert!(!config.show_only_changes);
        assert!(!config.parallel);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_parent_count() {
        assert_eq!(small().parent_count(), 9);
        assert_eq!(small().with_elitism(false).parent_count(), 10);
        assert_eq!(small().with_k_parents(1).parent_count(), 0);
    }

    #[test]
    fn test_validate_population_too_small() {
        let config = small().with_pop_size(1).with_k_parents(1);
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_validate_probabilities() {
        for bad in [-0.1, 1.1, f64::NAN] {
            assert!(small().with_crossover_prob(bad).validate().is_err());
            assert!(small().with_mutation_prob(bad).validate().is_err());
            assert!(small()
                .with_mutation_gene_change_percent(bad)
                .validate()
                .is_err());
        }
        assert!(small()
            .with_crossover_prob(0.0)
            .with_mutation_prob(1.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_k_parents() {
        assert!(small().with_k_parents(0).validate().is_err());
        assert!(small().with_k_parents(51).validate().is_err());
        assert!(small()
            .with_selection(Selection::Random)
            .with_k_parents(50)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_tournament_size() {
        assert!(small().with_tournament_k(51).validate().is_err());
        assert!(small().with_tournament_k(0).validate().is_err());
        // 9 parents need 9 distinct winners: k <= 42
        assert!(small().with_tournament_k(42).validate().is_ok());
        assert!(small().with_tournament_k(43).validate().is_err());
        assert!(small()
            .with_tournament_k(50)
            .with_same_parents(true)
            .validate()
            .is_ok());
        // ignored by other strategies
        assert!(small()
            .with_selection(Selection::KBest)
            .with_tournament_k(500)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_k_parents_above_pop_size() {
        // draws with replacement accept any parent count
        assert!(small()
            .with_elitism(false)
            .with_pop_size(4)
            .with_k_parents(6)
            .with_selection(Selection::Random)
            .validate()
            .is_ok());
        assert!(small()
            .with_elitism(false)
            .with_pop_size(4)
            .with_k_parents(6)
            .with_same_parents(true)
            .validate()
            .is_ok());
        // distinct draws and k-best cannot
        for selection in [Selection::Tournament, Selection::Rank, Selection::KBest] {
            assert!(small()
                .with_elitism(false)
                .with_pop_size(4)
                .with_k_parents(6)
                .with_tournament_k(2)
                .with_selection(selection)
                .validate()
                .is_err());
        }
    }

    #[test]
    fn test_zero_generations_left_to_caller() {
        assert!(small().with_generations(0).validate().is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let config = small().with_selection(Selection::Rank).with_seed(7);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"rankselection\""));
        let back: GaConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_accepts_legacy_keys() {
        let json = r#"{
            "population": 300,
            "generations": 50,
            "elitism": true,
            "crossover_prob": 0.9,
            "mutation_prob": 0.5,
            "k_best": 20,
            "selection": "roulettewheel",
            "mut_change": 0.01,
            "iter_stop": 10,
            "tournament_k": 5,
            "same_parents": false
        }"#;
        let config: GaConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.pop_size, 300);
        assert_eq!(config.k_parents, 20);
        assert_eq!(config.selection, Selection::Roulette);
        assert!((config.mutation_gene_change_percent - 0.01).abs() < 1e-15);
        assert!(config.show_only_changes);
        assert!(config.validate().is_ok());
    }
}
