//! 0/1 knapsack encoding.
//!
//! Given items with weights and values and a capacity limit, pick the
//! subset maximizing total value without exceeding the capacity. One
//! boolean gene per item: picked or not.

use crate::error::{EaError, Result};
use crate::types::{Chromosome, Model};
use rand::Rng;
use std::fmt;
use std::sync::Arc;

/// Immutable description of a knapsack instance.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KnapsackModel {
    weights: Vec<u64>,
    values: Vec<u64>,
    capacity: u64,
}

impl KnapsackModel {
    /// Builds a knapsack instance.
    ///
    /// Fails if the weight and value lists differ in length.
    pub fn new(weights: Vec<u64>, values: Vec<u64>, capacity: u64) -> Result<Self> {
        if weights.len() != values.len() {
            return Err(EaError::InvalidConfig(format!(
                "weights and values differ in length: {} weights, {} values",
                weights.len(),
                values.len()
            )));
        }
        Ok(Self {
            weights,
            values,
            capacity,
        })
    }

    /// Number of items in the instance.
    pub fn item_count(&self) -> usize {
        self.weights.len()
    }

    /// The capacity limit.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }
}

impl Model for Arc<KnapsackModel> {
    type Chromosome = KnapsackChromosome;

    fn initial_population<R: Rng>(&self, mu: usize, rng: &mut R) -> Vec<KnapsackChromosome> {
        (0..mu)
            .map(|_| KnapsackChromosome::random(Arc::clone(self), rng))
            .collect()
    }
}

/// One item selection: gene `i` is true iff item `i` is picked.
#[derive(Debug, Clone)]
pub struct KnapsackChromosome {
    genes: Vec<bool>,
    model: Arc<KnapsackModel>,
}

impl KnapsackChromosome {
    /// Builds a chromosome from an explicit selection.
    ///
    /// Fails if the gene count does not match the item count.
    pub fn new(model: Arc<KnapsackModel>, genes: Vec<bool>) -> Result<Self> {
        if genes.len() != model.item_count() {
            return Err(EaError::InvalidConfig(format!(
                "expected {} genes, got {}",
                model.item_count(),
                genes.len()
            )));
        }
        Ok(Self { genes, model })
    }

    /// Builds a chromosome with a uniformly random selection.
    pub fn random<R: Rng>(model: Arc<KnapsackModel>, rng: &mut R) -> Self {
        let genes = (0..model.item_count()).map(|_| rng.random_bool(0.5)).collect();
        Self { genes, model }
    }

    /// The gene sequence.
    pub fn genes(&self) -> &[bool] {
        &self.genes
    }

    fn totals(&self) -> (u64, u64) {
        let mut weight = 0;
        let mut value = 0;
        for (i, &picked) in self.genes.iter().enumerate() {
            if picked {
                weight += self.model.weights[i];
                value += self.model.values[i];
            }
        }
        (weight, value)
    }
}

/// Equality is gene-sequence equality.
impl PartialEq for KnapsackChromosome {
    fn eq(&self, other: &Self) -> bool {
        self.genes == other.genes
    }
}

impl Eq for KnapsackChromosome {}

impl fmt::Display for KnapsackChromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (weight, value) = self.totals();
        write!(
            f,
            "weight: {weight}, value: {value}, fitness: {}, picked:",
            self.fitness()
        )?;
        for (i, &picked) in self.genes.iter().enumerate() {
            if picked {
                write!(
                    f,
                    " {i} (w {}, v {})",
                    self.model.weights[i], self.model.values[i]
                )?;
            }
        }
        Ok(())
    }
}

impl Chromosome for KnapsackChromosome {
    /// Total value of the picked items when feasible. Overweight
    /// selections score the reciprocal of their value, so every feasible
    /// solution outranks every infeasible one while the score stays
    /// finite and comparable.
    fn fitness(&self) -> f64 {
        let (weight, value) = self.totals();
        if weight > self.model.capacity {
            1.0 / value.max(1) as f64
        } else {
            value as f64
        }
    }

    /// Mutation policy: one flip event. With probability `probability`
    /// a single uniformly chosen gene is toggled, otherwise nothing
    /// happens.
    fn mutate<R: Rng>(&mut self, probability: f64, rng: &mut R) {
        if self.genes.is_empty() {
            return;
        }
        if rng.random::<f64>() < probability {
            let i = rng.random_range(0..self.genes.len());
            self.genes[i] = !self.genes[i];
        }
    }

    /// Single-point crossover: with probability `probability` the gene
    /// sequences are split at a uniform point and the tails exchanged;
    /// otherwise the children are unmodified copies of the parents.
    fn crossover<R: Rng>(
        parent1: &Self,
        parent2: &Self,
        probability: f64,
        rng: &mut R,
    ) -> (Self, Self) {
        let length = parent1.genes.len();
        if length == 0 || rng.random::<f64>() >= probability {
            return (parent1.clone(), parent2.clone());
        }

        let point = rng.random_range(0..length);
        let mut genes1 = parent1.genes[..point].to_vec();
        genes1.extend_from_slice(&parent2.genes[point..]);
        let mut genes2 = parent2.genes[..point].to_vec();
        genes2.extend_from_slice(&parent1.genes[point..]);

        (
            Self {
                genes: genes1,
                model: Arc::clone(&parent1.model),
            },
            Self {
                genes: genes2,
                model: Arc::clone(&parent2.model),
            },
        )
    }
}
