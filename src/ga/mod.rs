//! Genetic Algorithm for the Traveling Salesman Problem.
//!
//! Individuals are closed tours ([`Tour`]) over the points of a
//! [`DistanceProvider`](crate::distance::DistanceProvider); fitness is the
//! tour length and lower is better.
//!
//! # Key Types
//!
//! - [`GaConfig`]: Run parameters (population, operators, stopping rules)
//! - [`GaEngine`]: One generation at a time, caller drives the loop
//! - [`GaRunner`]: Complete runs with stagnation stop and route recording
//! - [`Selection`]: The five parent selection strategies
//!
//! # Submodules
//!
//! - [`operators`]: Segment crossover and windowed swap mutation on raw chromosomes
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Goldberg & Lingle (1985), "Alleles, Loci, and the Traveling Salesman Problem"

mod config;
mod engine;
pub mod operators;
mod runner;
mod selection;
mod types;

pub use config::GaConfig;
pub use engine::{EngineState, GaEngine};
pub use runner::{GaRunner, TspResult};
pub use selection::{Selection, SelectionParams};
pub use types::{Ranked, RouteRecord, Tour};
