//! Pairwise distance lookup over a fixed point set.
//!
//! [`DistanceProvider`] is the read-only capability the GA needs: the
//! ordered point set and a distance for every ordered pair of point
//! indices. [`DistanceMatrix`] is the haversine-backed implementation.

use crate::error::{Error, Result};
use crate::geo::Point;
use std::collections::HashSet;

/// Read-only distance lookup shared by every tour of a run.
///
/// Points are addressed by their index in [`points`](Self::points).
/// Implementations must never change after construction; the GA may read
/// them from several threads at once.
pub trait DistanceProvider: Send + Sync {
    /// The ordered point set.
    fn points(&self) -> &[Point];

    /// Distance from point `from` to point `to`.
    ///
    /// Fails with [`Error::UnknownPoint`] if either index is out of range.
    fn distance(&self, from: usize, to: usize) -> Result<f64>;

    /// Number of points.
    fn len(&self) -> usize {
        self.points().len()
    }

    fn is_empty(&self) -> bool {
        self.points().is_empty()
    }

    /// Index of the point called `name`.
    fn index_of(&self, name: &str) -> Result<usize> {
        self.points()
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| Error::unknown_point(name))
    }

    /// Distance between two points looked up by name.
    fn distance_between(&self, from: &str, to: &str) -> Result<f64> {
        self.distance(self.index_of(from)?, self.index_of(to)?)
    }
}

/// Dense n×n matrix of haversine distances in kilometres.
///
/// Every ordered pair is computed on its own, so `d(a, b)` and `d(b, a)`
/// can differ in the last bits. The diagonal is zero.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    points: Vec<Point>,
    distances: Vec<f64>,
}

impl DistanceMatrix {
    /// Builds the matrix over `points`.
    ///
    /// Fails with [`Error::InvalidConfiguration`] if two points share a name.
    pub fn new(points: Vec<Point>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(points.len());
        for p in &points {
            if !seen.insert(p.name.as_str()) {
                return Err(Error::invalid_configuration(format!(
                    "duplicate point name {:?}",
                    p.name
                )));
            }
        }

        let n = points.len();
        let mut distances = Vec::with_capacity(n * n);
        for from in &points {
            for to in &points {
                distances.push(from.haversine_km(to));
            }
        }

        log::debug!("built {n}x{n} distance matrix");

        Ok(Self { points, distances })
    }

    /// Builds a matrix from precomputed distances, row-major.
    ///
    /// Used when distances come from somewhere other than coordinates
    /// (road networks, test fixtures). `distances.len()` must be `n²` and
    /// every entry finite and non-negative.
    pub fn from_rows(points: Vec<Point>, distances: Vec<f64>) -> Result<Self> {
        let n = points.len();
        if distances.len() != n * n {
            return Err(Error::invalid_configuration(format!(
                "expected {} distances for {n} points, got {}",
                n * n,
                distances.len()
            )));
        }
        if let Some(bad) = distances.iter().find(|d| !d.is_finite() || **d < 0.0) {
            return Err(Error::invalid_configuration(format!(
                "distance {bad} is not a finite non-negative value"
            )));
        }
        let mut matrix = Self::new(points)?;
        matrix.distances = distances;
        Ok(matrix)
    }

    fn offset(&self, from: usize, to: usize) -> Result<usize> {
        let n = self.points.len();
        if from >= n {
            return Err(Error::unknown_point(format!("index {from} (of {n})")));
        }
        if to >= n {
            return Err(Error::unknown_point(format!("index {to} (of {n})")));
        }
        Ok(from * n + to)
    }
}

impl DistanceProvider for DistanceMatrix {
    fn points(&self) -> &[Point] {
        &self.points
    }

    fn distance(&self, from: usize, to: usize) -> Result<f64> {
        self.offset(from, to).map(|i| self.distances[i])
    }
}
