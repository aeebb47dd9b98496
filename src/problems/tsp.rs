//! Traveling-salesman encoding.
//!
//! Find the shortest closed tour visiting every city once. Genes are a
//! permutation of city indices; fitness is the inverse of the tour
//! length, so shorter tours score higher.

use crate::error::{EaError, Result};
use crate::types::{Chromosome, Model};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::sync::Arc;

/// A city on the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct City {
    pub id: usize,
    pub x: f64,
    pub y: f64,
}

impl City {
    pub fn new(id: usize, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    fn distance_to(&self, other: &City) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Immutable description of a TSP instance.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TspModel {
    cities: Vec<City>,
}

impl TspModel {
    pub fn new(cities: Vec<City>) -> Self {
        Self { cities }
    }

    /// Number of cities in the instance.
    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    /// Euclidean length of the closed tour visiting `tour` in order and
    /// returning to the start.
    pub fn tour_length(&self, tour: &[usize]) -> f64 {
        let n = tour.len();
        if n < 2 {
            return 0.0;
        }
        (0..n)
            .map(|i| self.cities[tour[i]].distance_to(&self.cities[tour[(i + 1) % n]]))
            .sum()
    }
}

impl Model for Arc<TspModel> {
    type Chromosome = TspChromosome;

    fn initial_population<R: Rng>(&self, mu: usize, rng: &mut R) -> Vec<TspChromosome> {
        (0..mu)
            .map(|_| TspChromosome::random(Arc::clone(self), rng))
            .collect()
    }
}

/// One candidate tour: a permutation of city indices.
#[derive(Debug, Clone)]
pub struct TspChromosome {
    genes: Vec<usize>,
    model: Arc<TspModel>,
}

impl TspChromosome {
    /// Builds a chromosome from an explicit tour.
    ///
    /// Fails unless `genes` is a permutation of `0..city_count`.
    pub fn new(model: Arc<TspModel>, genes: Vec<usize>) -> Result<Self> {
        let n = model.city_count();
        let mut seen = vec![false; n];
        let valid = genes.len() == n
            && genes.iter().all(|&g| {
                if g >= n || seen[g] {
                    false
                } else {
                    seen[g] = true;
                    true
                }
            });
        if !valid {
            return Err(EaError::InvalidConfig(format!(
                "tour is not a permutation of 0..{n}"
            )));
        }
        Ok(Self { genes, model })
    }

    /// Builds a chromosome with a uniformly random tour.
    pub fn random<R: Rng>(model: Arc<TspModel>, rng: &mut R) -> Self {
        let mut genes: Vec<usize> = (0..model.city_count()).collect();
        genes.shuffle(rng);
        Self { genes, model }
    }

    /// The tour as city indices.
    pub fn genes(&self) -> &[usize] {
        &self.genes
    }
}

/// Equality is gene-sequence equality.
impl PartialEq for TspChromosome {
    fn eq(&self, other: &Self) -> bool {
        self.genes == other.genes
    }
}

impl Eq for TspChromosome {}

impl fmt::Display for TspChromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &g) in self.genes.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", self.model.cities[g].id)?;
        }
        write!(f, "\t fitness: {:.4}", self.fitness())
    }
}

impl Chromosome for TspChromosome {
    /// Inverse of the closed-tour length. The length is floored at
    /// machine epsilon so a degenerate all-coincident instance still
    /// yields a finite score.
    fn fitness(&self) -> f64 {
        1.0 / self.model.tour_length(&self.genes).max(f64::EPSILON)
    }

    /// Mutation policy: one swap event. With probability `probability`
    /// two distinct uniformly chosen positions are exchanged, otherwise
    /// nothing happens.
    fn mutate<R: Rng>(&mut self, probability: f64, rng: &mut R) {
        if self.genes.len() < 2 {
            return;
        }
        if rng.random::<f64>() < probability {
            let picked = rand::seq::index::sample(rng, self.genes.len(), 2);
            self.genes.swap(picked.index(0), picked.index(1));
        }
    }

    /// Cycle crossover: with probability `probability` the positions are
    /// partitioned into alternation cycles and each child takes alternate
    /// cycles from each parent, which always yields valid permutations;
    /// otherwise the children are unmodified copies of the parents.
    fn crossover<R: Rng>(
        parent1: &Self,
        parent2: &Self,
        probability: f64,
        rng: &mut R,
    ) -> (Self, Self) {
        let n = parent1.genes.len();
        if n == 0 || rng.random::<f64>() >= probability {
            return (parent1.clone(), parent2.clone());
        }

        let mut position_in_p1 = vec![0usize; n];
        for (i, &g) in parent1.genes.iter().enumerate() {
            position_in_p1[g] = i;
        }

        // cycle id per position; usize::MAX marks unvisited
        let mut cycle = vec![usize::MAX; n];
        let mut cycle_id = 0;
        for start in 0..n {
            if cycle[start] != usize::MAX {
                continue;
            }
            let mut pos = start;
            while cycle[pos] == usize::MAX {
                cycle[pos] = cycle_id;
                pos = position_in_p1[parent2.genes[pos]];
            }
            cycle_id += 1;
        }

        let genes1 = (0..n)
            .map(|i| {
                if cycle[i] % 2 == 0 {
                    parent1.genes[i]
                } else {
                    parent2.genes[i]
                }
            })
            .collect();
        let genes2 = (0..n)
            .map(|i| {
                if cycle[i] % 2 == 0 {
                    parent2.genes[i]
                } else {
                    parent1.genes[i]
                }
            })
            .collect();

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
