//! Candidate tours and the records derived from them.
//!
//! A [`Tour`] is one individual of the GA population: a permutation of
//! point indices plus a borrowed [`DistanceProvider`] used to score it.

use super::operators::{random_cut, segment_crossover, windowed_swap_mutation};
use crate::distance::DistanceProvider;
use crate::error::Result;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

/// A closed tour over every point of a [`DistanceProvider`].
///
/// The chromosome is always a permutation of `0..n`. Every constructor and
/// operator in this crate keeps that invariant; [`with_chromosome`] and
/// [`set_chromosome`] trust the caller.
///
/// Fitness is not cached: [`fitness`](Self::fitness) walks the tour each
/// time it is called.
///
/// [`with_chromosome`]: Self::with_chromosome
/// [`set_chromosome`]: Self::set_chromosome
pub struct Tour<'d, D: DistanceProvider + ?Sized> {
    chromosome: Vec<usize>,
    distances: &'d D,
}

impl<'d, D: DistanceProvider + ?Sized> Tour<'d, D> {
    /// Creates a uniformly random tour.
    pub fn random<R: Rng>(distances: &'d D, rng: &mut R) -> Self {
        let mut chromosome: Vec<usize> = (0..distances.len()).collect();
        chromosome.shuffle(rng);
        Self {
            chromosome,
            distances,
        }
    }

    /// Creates a tour with a precomputed chromosome.
    ///
    /// The caller guarantees `chromosome` is a permutation of `0..n`.
    pub fn with_chromosome(distances: &'d D, chromosome: Vec<usize>) -> Self {
        Self {
            chromosome,
            distances,
        }
    }

    /// Replaces the chromosome. Same contract as [`with_chromosome`](Self::with_chromosome).
    pub fn set_chromosome(&mut self, chromosome: Vec<usize>) {
        self.chromosome = chromosome;
    }

    pub fn chromosome(&self) -> &[usize] {
        &self.chromosome
    }

    pub fn distances(&self) -> &'d D {
        self.distances
    }

    pub fn len(&self) -> usize {
        self.chromosome.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromosome.is_empty()
    }

    /// Total length of the closed tour, including the edge from the last
    /// point back to the first. Lower is better.
    pub fn fitness(&self) -> Result<f64> {
        let mut total = 0.0;
        for (from, to) in self.edges() {
            total += self.distances.distance(from, to)?;
        }
        Ok(total)
    }

    /// Swap mutation over the leading window of the chromosome.
    ///
    /// The window is `round(n * gene_change_percent)` genes long (ties to
    /// even). Each index in the window is, with probability
    /// `mutation_prob`, swapped with an index drawn uniformly from the
    /// whole chromosome. Genes past the window only move when picked as a
    /// swap target.
    pub fn mutate<R: Rng>(&mut self, mutation_prob: f64, gene_change_percent: f64, rng: &mut R) {
        windowed_swap_mutation(&mut self.chromosome, gene_change_percent, mutation_prob, rng);
    }

    /// Builds a child from two parents.
    ///
    /// Two cut points are drawn uniformly from `[0, n)` and ordered so that
    /// `start <= end`. The child starts with `a[start..end]` and continues
    /// with the genes of `b`, in `b`'s order, that are not already in that
    /// segment. The child owns a fresh chromosome.
    pub fn crossover<R: Rng>(a: &Self, b: &Self, rng: &mut R) -> Self {
        let n = a.len();
        if n == 0 {
            return a.clone();
        }
        let (start, end) = random_cut(n, rng);
        Self {
            chromosome: segment_crossover(&a.chromosome, &b.chromosome, start, end),
            distances: a.distances,
        }
    }

    /// Returns `true` if the chromosome is a permutation of every point.
    pub fn is_valid_permutation(&self) -> bool {
        let n = self.distances.len();
        if self.chromosome.len() != n {
            return false;
        }
        let mut seen = vec![false; n];
        for &gene in &self.chromosome {
            if gene >= n || seen[gene] {
                return false;
            }
            seen[gene] = true;
        }
        true
    }

    /// Expands the tour into one [`RouteRecord`] per stop.
    pub fn route_records(&self, generation: usize, best_fitness: f64) -> Result<Vec<RouteRecord>> {
        let points = self.distances.points();
        self.edges()
            .enumerate()
            .map(|(position, (from, to))| {
                let edge_distance = self.distances.distance(from, to)?;
                let point = points
                    .get(from)
                    .ok_or_else(|| crate::Error::unknown_point(format!("index {from}")))?;
                Ok(RouteRecord {
                    point: from,
                    name: point.name.clone(),
                    lat: point.lat,
                    lon: point.lon,
                    position,
                    generation,
                    edge_distance,
                    best_fitness,
                })
            })
            .collect()
    }

    /// `(from, to)` pairs of the closed tour, wrap-around edge last.
    fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.chromosome.len();
        (0..n).map(move |i| (self.chromosome[i], self.chromosome[(i + 1) % n]))
    }
}

impl<D: DistanceProvider + ?Sized> Clone for Tour<'_, D> {
    fn clone(&self) -> Self {
        Self {
            chromosome: self.chromosome.clone(),
            distances: self.distances,
        }
    }
}

impl<D: DistanceProvider + ?Sized> fmt::Debug for Tour<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tour")
            .field("chromosome", &self.chromosome)
            .finish_non_exhaustive()
    }
}

/// One entry of a fitness-ranked population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked {
    /// Position of the individual in the population it was ranked from.
    pub index: usize,
    pub fitness: f64,
}

/// One stop of a reported best tour, for external renderers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteRecord {
    /// Point index in the distance provider.
    pub point: usize,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Position of the stop in the tour, starting at 0.
    pub position: usize,
    pub generation: usize,
    /// Distance from this stop to the next one (wrapping to the first).
    pub edge_distance: f64,
    /// Fitness of the whole tour in that generation.
    pub best_fitness: f64,
}
