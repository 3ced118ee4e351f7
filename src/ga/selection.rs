//! Parent selection strategies.
//!
//! Every strategy works on a population ranked ascending by fitness (lower
//! tour length first) and returns population indices of the chosen
//! parents. Strategies that can repeat a draw reject repeats unless
//! duplicate parents are allowed.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use super::types::Ranked;
use crate::error::{Error, Result};
use rand::seq::index;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Selection strategy for choosing parents.
///
/// Parsed from the names used in configuration files:
///
/// ```
/// use u_tsp_ga::ga::Selection;
///
/// let sel: Selection = "RouletteWheel".parse().unwrap();
/// assert_eq!(sel, Selection::Roulette);
/// assert_eq!(sel.name(), "roulettewheel");
/// assert!("elite".parse::<Selection>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Repeated tournaments over `tournament_k` individuals sampled without
    /// replacement; the shortest tour of each tournament is a parent.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "tournament"))]
    Tournament,

    /// Fitness-proportionate selection on the raw tour length.
    ///
    /// **Note**: longer tours get proportionally *larger* weight. This
    /// favours worse individuals and is kept on purpose.
    #[cfg_attr(feature = "serde", serde(rename = "roulettewheel"))]
    Roulette,

    /// Linear rank selection: rank 1 is the worst tour, rank n the best,
    /// and the weight of rank r is `r / (n(n+1)/2)`.
    #[cfg_attr(feature = "serde", serde(rename = "rankselection"))]
    Rank,

    /// The first `k` individuals of the ranking. Deterministic.
    #[cfg_attr(feature = "serde", serde(rename = "kbestselection"))]
    KBest,

    /// `k` uniform draws with replacement; repeats are kept.
    #[cfg_attr(feature = "serde", serde(rename = "random"))]
    Random,
}

/// Configuration names of every strategy.
const SELECTIONS: [(&str, Selection); 5] = [
    ("tournament", Selection::Tournament),
    ("roulettewheel", Selection::Roulette),
    ("rankselection", Selection::Rank),
    ("kbestselection", Selection::KBest),
    ("random", Selection::Random),
];

/// Parameters shared by every strategy for one draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionParams {
    /// Number of parents to return.
    pub count: usize,
    /// Tournament sample size; ignored by the other strategies.
    pub tournament_k: usize,
    /// Allow the same individual to be picked more than once.
    pub same_parents: bool,
}

impl Selection {
    /// The configuration name of this strategy.
    pub fn name(self) -> &'static str {
        match self {
            Selection::Tournament => "tournament",
            Selection::Roulette => "roulettewheel",
            Selection::Rank => "rankselection",
            Selection::KBest => "kbestselection",
            Selection::Random => "random",
        }
    }

    /// All strategies, in configuration-table order.
    pub fn all() -> impl Iterator<Item = Selection> {
        SELECTIONS.iter().map(|(_, sel)| *sel)
    }

    /// Returns `true` if this strategy filters out repeated parents when
    /// `same_parents` is off.
    pub fn rejects_duplicates(self) -> bool {
        matches!(self, Selection::Tournament | Selection::Roulette | Selection::Rank)
    }

    /// Checks that a draw of `params.count` parents from `population_size`
    /// individuals can terminate.
    pub fn check(self, population_size: usize, params: &SelectionParams) -> Result<()> {
        if population_size < 2 {
            return Err(Error::invalid_configuration(format!(
                "population size must be at least 2, got {population_size}"
            )));
        }

        let distinct = self.rejects_duplicates() && !params.same_parents;
        if (distinct || self == Selection::KBest) && params.count > population_size {
            return Err(Error::invalid_configuration(format!(
                "cannot pick {} distinct parents from {population_size} individuals",
                params.count
            )));
        }

        if self == Selection::Tournament {
            let k = params.tournament_k;
            if k == 0 || k > population_size {
                return Err(Error::invalid_configuration(format!(
                    "tournament size must be in 1..={population_size}, got {k}"
                )));
            }
            // Only the best `population_size - k + 1` individuals can ever
            // win a tournament.
            let winners = population_size - k + 1;
            if distinct && params.count > winners {
                return Err(Error::invalid_configuration(format!(
                    "tournaments of {k} over {population_size} individuals have at most \
                     {winners} distinct winners, {} parents requested",
                    params.count
                )));
            }
        }

        Ok(())
    }

    /// Selects `params.count` parents from `ranked`.
    ///
    /// `ranked` must be sorted ascending by fitness. Returns the
    /// [`Ranked::index`] of each parent, in draw order.
    pub fn select<R: Rng>(
        self,
        ranked: &[Ranked],
        params: &SelectionParams,
        rng: &mut R,
    ) -> Result<Vec<usize>> {
        self.check(ranked.len(), params)?;

        let parents = match self {
            Selection::Tournament => tournament(ranked, params, rng),
            Selection::Roulette => roulette(ranked, params, rng),
            Selection::Rank => rank(ranked, params, rng),
            Selection::KBest => ranked.iter().take(params.count).map(|r| r.index).collect(),
            Selection::Random => (0..params.count)
                .map(|_| ranked[rng.random_range(0..ranked.len())].index)
                .collect(),
        };
        Ok(parents)
    }
}

impl FromStr for Selection {
    type Err = Error;

    /// Case-insensitive lookup in the configuration table.
    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase();
        SELECTIONS
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, sel)| *sel)
            .ok_or_else(|| Error::UnknownSelectionStrategy(s.to_string()))
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pushes `candidate` unless it is already a parent and repeats are off.
/// Returns whether it was pushed.
fn accept(parents: &mut Vec<usize>, candidate: usize, same_parents: bool) -> bool {
    if same_parents || !parents.contains(&candidate) {
        parents.push(candidate);
        true
    } else {
        false
    }
}

fn tournament<R: Rng>(ranked: &[Ranked], params: &SelectionParams, rng: &mut R) -> Vec<usize> {
    let mut parents = Vec::with_capacity(params.count);
    while parents.len() < params.count {
        let sample = index::sample(rng, ranked.len(), params.tournament_k);
        // First of the minimal entries, in sample order.
        let mut winner = &ranked[sample.index(0)];
        for i in sample.iter().skip(1) {
            if ranked[i].fitness < winner.fitness {
                winner = &ranked[i];
            }
        }
        accept(&mut parents, winner.index, params.same_parents);
    }
    parents
}

fn rank<R: Rng>(ranked: &[Ranked], params: &SelectionParams, rng: &mut R) -> Vec<usize> {
    // Worst first; stable, so ties keep their ranking order.
    let mut backward: Vec<&Ranked> = ranked.iter().collect();
    backward.sort_by(|a, b| {
        b.fitness
            .partial_cmp(&a.fitness)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let weights: Vec<f64> = (1..=backward.len()).map(|r| r as f64).collect();
    let mut parents = Vec::with_capacity(params.count);
    while parents.len() < params.count {
        let pick = weighted_draw(&weights, rng);
        accept(&mut parents, backward[pick].index, params.same_parents);
    }
    parents
}

fn roulette<R: Rng>(ranked: &[Ranked], params: &SelectionParams, rng: &mut R) -> Vec<usize> {
    let weights: Vec<f64> = ranked.iter().map(|r| r.fitness).collect();
    let weighted = weights.iter().filter(|&&w| w > 0.0).count();
    let mut weighted_taken = 0;
    let mut parents = Vec::with_capacity(params.count);
    while parents.len() < params.count {
        // Zero weights are never drawn; once every weighted entry is a
        // parent, the rest come uniformly from the entries left.
        let pick = if !params.same_parents && weighted > 0 && weighted_taken == weighted {
            let left: Vec<usize> = (0..ranked.len())
                .filter(|&i| !parents.contains(&ranked[i].index))
                .collect();
            left[rng.random_range(0..left.len())]
        } else {
            weighted_draw(&weights, rng)
        };
        if accept(&mut parents, ranked[pick].index, params.same_parents) && weights[pick] > 0.0 {
            weighted_taken += 1;
        }
    }
    parents
}

/// Draws an index with probability `weights[i] / sum(weights)`.
///
/// Falls back to a uniform draw when the total weight is zero or not
/// finite.
fn weighted_draw<R: Rng>(weights: &[f64], rng: &mut R) -> usize {
    let n = weights.len();
    let total: f64 = weights.iter().sum();
    if !(total > 0.0 && total.is_finite()) {
        return rng.random_range(0..n);
    }

    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > threshold {
            return i;
        }
    }

    n - 1 // floating-point fallback
}
