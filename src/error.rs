//! Error taxonomy for the evolutionary engine.
//!
//! Every failure in the core is fatal: configuration errors surface at
//! construction, validation errors surface per call, and all of them
//! propagate unrecovered out of [`Engine::run`](crate::Engine::run).
//! The search is a batch computation, so there is no retry or
//! partial-failure recovery anywhere.

use thiserror::Error;

/// Errors produced by the engine, the selectors, and the problem models.
#[derive(Debug, Error)]
pub enum EaError {
    /// A construction-time parameter is invalid (non-positive tournament
    /// size, undersized population, mismatched model inputs, ...).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An item list and its probability vector differ in length.
    #[error("items and probabilities differ in length: {items} items, {probs} probabilities")]
    ProbabilityLengthMismatch { items: usize, probs: usize },

    /// A probability vector contains a negative entry.
    #[error("probability at index {index} is negative: {value}")]
    NegativeProbability { index: usize, value: f64 },

    /// Fitness (or probability) values sum to zero, so no selection
    /// distribution can be formed. Division by zero is never masked.
    #[error("fitness values sum to zero; cannot form a selection distribution")]
    DegenerateFitness,

    /// A tournament was asked to draw more contenders than the pool holds.
    #[error("tournament size {q} exceeds pool size {pool}")]
    TournamentTooLarge { q: usize, pool: usize },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, EaError>;
