//! Genetic algorithm search for short closed tours over geographic points.
//!
//! - **Geo**: Named points with latitude/longitude and haversine distance.
//! - **Distance**: [`DistanceProvider`](distance::DistanceProvider), the
//!   read-only pairwise lookup every tour is scored against, and the dense
//!   [`DistanceMatrix`](distance::DistanceMatrix) implementation.
//! - **Genetic Algorithm (GA)**: Tours, five parent selection strategies,
//!   segment crossover, windowed swap mutation, elitism and stagnation
//!   tracking.
//!
//! # Architecture
//!
//! Loading points (CSV files, subsets of them) and drawing the resulting
//! routes are left to consumers. This crate takes an ordered list of
//! distinct [`Point`](geo::Point)s and returns the best tour found together
//! with per-generation [`RouteRecord`](ga::RouteRecord)s.
//!
//! # Example
//!
//! ```
//! use u_tsp_ga::distance::DistanceMatrix;
//! use u_tsp_ga::ga::{GaConfig, GaRunner, Selection};
//! use u_tsp_ga::geo::Point;
//!
//! let points = vec![
//!     Point::new("Lisbon", 38.72, -9.14),
//!     Point::new("Madrid", 40.42, -3.70),
//!     Point::new("Paris", 48.86, 2.35),
//!     Point::new("Brussels", 50.85, 4.35),
//!     Point::new("Amsterdam", 52.37, 4.90),
//! ];
//! let distances = DistanceMatrix::new(points).unwrap();
//! let config = GaConfig::default()
//!     .with_pop_size(40)
//!     .with_k_parents(8)
//!     .with_tournament_k(4)
//!     .with_selection(Selection::Tournament)
//!     .with_generations(50)
//!     .with_seed(7);
//!
//! let result = GaRunner::run(&distances, &config).unwrap();
//! assert_eq!(result.best_tour.len(), 5);
//! assert!(result.best_fitness > 0.0);
//! ```

pub mod distance;
mod error;
pub mod ga;
pub mod geo;
pub mod random;

pub use error::{Error, Result};
