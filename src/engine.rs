//! The generational search loop.
//!
//! [`Engine`] owns the population, drives selection → breeding → survivor
//! selection each generation, and tracks the mean-fitness history used for
//! convergence detection. Selectors receive the population and its
//! probability distribution as call arguments; they hold no reference to
//! the engine.

use crate::config::EaConfig;
use crate::error::{EaError, Result};
use crate::selection;
use crate::types::{Chromosome, Model};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

/// Single-threaded evolutionary engine over a problem model.
///
/// One call to [`run`](Engine::run) blocks until termination: either the
/// generation counter exceeds the configured maximum, or the variance of
/// the trailing mean-fitness window falls below the stagnation threshold.
///
/// # Usage
///
/// ```
/// use evokit::problems::knapsack::KnapsackModel;
/// use evokit::{Chromosome, EaConfig, Engine};
/// use std::sync::Arc;
///
/// let model = Arc::new(KnapsackModel::new(vec![2, 3, 4], vec![3, 4, 5], 5).unwrap());
/// let config = EaConfig::default()
///     .with_population_size(10)
///     .with_offspring_count(20)
///     .with_max_generations(50)
///     .with_seed(42);
///
/// let mut engine = Engine::new(&model, config).unwrap();
/// let best = engine.run().unwrap();
/// assert!(best.fitness() <= 7.0);
/// ```
pub struct Engine<M: Model> {
    config: EaConfig,
    population: Vec<M::Chromosome>,
    average_fitness: Vec<f64>,
    generation: usize,
    rng: StdRng,
}

impl<M: Model> std::fmt::Debug for Engine<M>
where
    M::Chromosome: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("population", &self.population)
            .field("average_fitness", &self.average_fitness)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl<M: Model> Engine<M> {
    /// Creates an engine with an initial population drawn from `model`.
    ///
    /// Fails on an invalid configuration, or if the model does not
    /// produce exactly `population_size` individuals.
    pub fn new(model: &M, config: EaConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let population = model.initial_population(config.population_size, &mut rng);
        if population.len() != config.population_size {
            return Err(EaError::InvalidConfig(format!(
                "model produced {} individuals, expected {}",
                population.len(),
                config.population_size
            )));
        }

        Ok(Self {
            config,
            population,
            average_fitness: Vec::new(),
            generation: 0,
            rng,
        })
    }

    /// Runs the generational loop to termination and returns the best
    /// individual of the final population.
    ///
    /// Any validation or degenerate-arithmetic error aborts the whole run.
    pub fn run(&mut self) -> Result<M::Chromosome> {
        loop {
            let fitnesses: Vec<f64> = self.population.iter().map(Chromosome::fitness).collect();
            let mean_fitness = mean(&fitnesses);
            self.average_fitness.push(mean_fitness);
            info!(generation = self.generation, mean_fitness, "generation");

            let probs = selection::fitness_distribution(&fitnesses)?;
            let parents = self.config.parent_selection.select(
                &self.population,
                &probs,
                self.config.offspring_count,
                &mut self.rng,
            )?;

            let children = self.breed(parents);
            self.population = self.select_survivors(children)?;
            self.generation += 1;

            if self.stop_condition() {
                break;
            }
        }

        Ok(self.answer().clone())
    }

    /// Pairs up the (shuffled) parents and produces at most λ children.
    ///
    /// Consecutive pairs are crossed over with the configured probability
    /// and each child is mutated independently; an odd trailing parent is
    /// dropped. Pairing stops once the quota is met.
    fn breed(&mut self, mut parents: Vec<M::Chromosome>) -> Vec<M::Chromosome> {
        parents.shuffle(&mut self.rng);

        let lambda = self.config.offspring_count;
        let mut children = Vec::with_capacity(lambda + 1);

        for pair in parents.chunks_exact(2) {
            if children.len() >= lambda {
                break;
            }
            let (mut child1, mut child2) = Chromosome::crossover(
                &pair[0],
                &pair[1],
                self.config.crossover_probability,
                &mut self.rng,
            );
            child1.mutate(self.config.mutation_probability, &mut self.rng);
            child2.mutate(self.config.mutation_probability, &mut self.rng);
            children.push(child1);
            children.push(child2);
        }

        children.truncate(lambda);
        children
    }

    /// Selects the next generation of exactly μ individuals from the
    /// previous population combined with the new children.
    fn select_survivors(&mut self, children: Vec<M::Chromosome>) -> Result<Vec<M::Chromosome>> {
        let mut pool = std::mem::take(&mut self.population);
        pool.extend(children);

        let fitnesses: Vec<f64> = pool.iter().map(Chromosome::fitness).collect();
        let probs = selection::fitness_distribution(&fitnesses)?;

        self.config.survivor_selection.select(
            &pool,
            &probs,
            self.config.population_size,
            &mut self.rng,
        )
    }

    /// Termination criterion: generation cap exceeded, or the variance of
    /// the trailing mean-fitness window is below the stagnation threshold.
    fn stop_condition(&self) -> bool {
        if self.generation > self.config.max_generations {
            return true;
        }
        let window = self.config.stagnation_window;
        if self.average_fitness.len() > window {
            let tail = &self.average_fitness[self.average_fitness.len() - window..];
            variance(tail) < self.config.stagnation_threshold
        } else {
            false
        }
    }

    /// Returns the individual with the strictly-greatest fitness, ties
    /// broken by first occurrence in population order.
    pub fn answer(&self) -> &M::Chromosome {
        let (first, rest) = self
            .population
            .split_first()
            .expect("population is never empty");
        let mut best = first;
        for candidate in rest {
            if candidate.fitness() > best.fitness() {
                best = candidate;
            }
        }
        best
    }

    /// Number of completed generations.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Per-generation mean-fitness history, one entry per loop iteration.
    pub fn average_fitness(&self) -> &[f64] {
        &self.average_fitness
    }

    /// The current population.
    pub fn population(&self) -> &[M::Chromosome] {
        &self.population
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (divisor n, matching the convergence criterion).
fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64
}
