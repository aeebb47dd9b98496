//! Generic evolutionary-optimization engine.
//!
//! Given a population of candidate solutions to an arbitrary optimization
//! problem, the engine iteratively applies selection, recombination, and
//! mutation to improve solution quality across generations, terminating on
//! a convergence or iteration-count criterion.
//!
//! # Core Traits
//!
//! - [`Chromosome`]: a candidate solution — fitness, mutation, and
//!   type-level crossover
//! - [`Model`]: an immutable problem description that seeds the initial
//!   population
//!
//! # Key Types
//!
//! - [`EaConfig`]: engine parameters (μ, λ, termination, operator
//!   probabilities, selection strategies)
//! - [`Engine`]: drives the generational loop and tracks convergence
//! - [`ParentSelection`]: stochastic universal sampling over the fitness
//!   distribution
//! - [`SurvivorSelection`]: q-ary tournament over the parent/offspring pool
//!
//! # Submodules
//!
//! - [`problems`]: example encodings (0/1 knapsack, TSP) implementing the
//!   candidate-solution contract
//!
//! # Execution model
//!
//! Single-threaded and synchronous: one call to [`Engine::run`] blocks
//! until termination. All randomness flows through an engine-owned
//! `StdRng`, seedable via [`EaConfig::with_seed`] for reproducibility.
//! Every generation emits one `tracing` info record with the generation
//! index and mean population fitness.
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Baker (1987), "Reducing Bias and Inefficiency in the Selection
//!   Algorithm"
//! - Eiben & Smith (2015), *Introduction to Evolutionary Computing*

pub mod config;
pub mod engine;
pub mod error;
pub mod problems;
pub mod selection;
pub mod types;

pub use config::EaConfig;
pub use engine::Engine;
pub use error::{EaError, Result};
pub use selection::{ParentSelection, SurvivorSelection};
pub use types::{Chromosome, Model};
