//! Example problem encodings.
//!
//! Thin plug-ins over the [`Chromosome`](crate::Chromosome) /
//! [`Model`](crate::Model) contract. The engine never inspects their gene
//! semantics; they exist so the crate ships runnable end-to-end problems.

pub mod knapsack;
pub mod tsp;
