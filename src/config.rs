//! Engine configuration.
//!
//! [`EaConfig`] holds every parameter that controls the generational loop.

use crate::error::{EaError, Result};
use crate::selection::{ParentSelection, SurvivorSelection};

/// Configuration for the evolutionary engine.
///
/// Controls population sizing, operator probabilities, selection
/// strategies, and the two termination criteria (generation cap and
/// stagnation of the mean-fitness history).
///
/// # Defaults
///
/// ```
/// use evokit::EaConfig;
///
/// let config = EaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.offspring_count, 200);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use evokit::{EaConfig, SurvivorSelection};
///
/// let config = EaConfig::default()
///     .with_population_size(50)
///     .with_offspring_count(100)
///     .with_survivor_selection(SurvivorSelection::Tournament { q: 4 })
///     .with_mutation_probability(0.2);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EaConfig {
    /// Population size μ, held at the start and end of every generation.
    pub population_size: usize,

    /// Offspring count λ: children produced per generation.
    pub offspring_count: usize,

    /// Maximum number of generations before termination.
    pub max_generations: usize,

    /// Number of trailing generations over which mean-fitness variance is
    /// checked for convergence.
    pub stagnation_window: usize,

    /// Variance threshold below which the population counts as stagnated.
    pub stagnation_threshold: f64,

    /// Probability handed to [`Chromosome::mutate`](crate::Chromosome::mutate)
    /// for each child (0.0–1.0).
    pub mutation_probability: f64,

    /// Probability handed to [`Chromosome::crossover`](crate::Chromosome::crossover)
    /// for each parent pair (0.0–1.0).
    pub crossover_probability: f64,

    /// Strategy for choosing breeding candidates.
    pub parent_selection: ParentSelection,

    /// Strategy for choosing the next generation from the combined pool.
    pub survivor_selection: SurvivorSelection,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for EaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            offspring_count: 200,
            max_generations: 500,
            stagnation_window: 10,
            stagnation_threshold: 0.1,
            mutation_probability: 0.1,
            crossover_probability: 1.0,
            parent_selection: ParentSelection::default(),
            survivor_selection: SurvivorSelection::default(),
            seed: None,
        }
    }
}

impl EaConfig {
    /// Sets the population size μ.
    pub fn with_population_size(mut self, mu: usize) -> Self {
        self.population_size = mu;
        self
    }

    /// Sets the offspring count λ.
    pub fn with_offspring_count(mut self, lambda: usize) -> Self {
        self.offspring_count = lambda;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the stagnation window size.
    pub fn with_stagnation_window(mut self, window: usize) -> Self {
        self.stagnation_window = window;
        self
    }

    /// Sets the stagnation variance threshold.
    pub fn with_stagnation_threshold(mut self, threshold: f64) -> Self {
        self.stagnation_threshold = threshold.max(0.0);
        self
    }

    /// Sets the mutation probability.
    pub fn with_mutation_probability(mut self, probability: f64) -> Self {
        self.mutation_probability = probability.clamp(0.0, 1.0);
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_probability(mut self, probability: f64) -> Self {
        self.crossover_probability = probability.clamp(0.0, 1.0);
        self
    }

    /// Sets the parent-selection strategy.
    pub fn with_parent_selection(mut self, selection: ParentSelection) -> Self {
        self.parent_selection = selection;
        self
    }

    /// Sets the survivor-selection strategy.
    pub fn with_survivor_selection(mut self, selection: SurvivorSelection) -> Self {
        self.survivor_selection = selection;
        self
    }

    /// Convenience builder for setting the survivor tournament size.
    ///
    /// Equivalent to `.with_survivor_selection(SurvivorSelection::Tournament { q })`.
    pub fn with_tournament_size(self, q: usize) -> Self {
        self.with_survivor_selection(SurvivorSelection::Tournament { q })
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Construction-time errors are fatal; [`Engine::new`](crate::Engine::new)
    /// calls this before touching the model.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(EaError::InvalidConfig(
                "population_size must be at least 2".into(),
            ));
        }
        if self.offspring_count == 0 {
            return Err(EaError::InvalidConfig(
                "offspring_count must be at least 1".into(),
            ));
        }
        if self.max_generations == 0 {
            return Err(EaError::InvalidConfig(
                "max_generations must be at least 1".into(),
            ));
        }
        if self.stagnation_window == 0 {
            return Err(EaError::InvalidConfig(
                "stagnation_window must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return Err(EaError::InvalidConfig(
                "mutation_probability must be within [0, 1]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.crossover_probability) {
            return Err(EaError::InvalidConfig(
                "crossover_probability must be within [0, 1]".into(),
            ));
        }
        if self.stagnation_threshold < 0.0 {
            return Err(EaError::InvalidConfig(
                "stagnation_threshold must be non-negative".into(),
            ));
        }
        self.survivor_selection.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EaConfig::default();
        assert_eq!(config.population_size, 100);
        assert_eq!(config.offspring_count, 200);
        assert_eq!(config.max_generations, 500);
        assert_eq!(config.stagnation_window, 10);
        assert!((config.stagnation_threshold - 0.1).abs() < 1e-12);
        assert!((config.mutation_probability - 0.1).abs() < 1e-12);
        assert!((config.crossover_probability - 1.0).abs() < 1e-12);
        assert_eq!(
            config.parent_selection,
            ParentSelection::StochasticUniversalSampling
        );
        assert_eq!(
            config.survivor_selection,
            SurvivorSelection::Tournament { q: 3 }
        );
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = EaConfig::default()
            .with_population_size(10)
            .with_offspring_count(20)
            .with_max_generations(50)
            .with_stagnation_window(5)
            .with_stagnation_threshold(0.01)
            .with_mutation_probability(0.3)
            .with_crossover_probability(0.9)
            .with_tournament_size(4)
            .with_seed(42);

        assert_eq!(config.population_size, 10);
        assert_eq!(config.offspring_count, 20);
        assert_eq!(config.max_generations, 50);
        assert_eq!(config.stagnation_window, 5);
        assert!((config.stagnation_threshold - 0.01).abs() < 1e-12);
        assert!((config.mutation_probability - 0.3).abs() < 1e-12);
        assert!((config.crossover_probability - 0.9).abs() < 1e-12);
        assert_eq!(
            config.survivor_selection,
            SurvivorSelection::Tournament { q: 4 }
        );
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_clamp_rates() {
        let config = EaConfig::default()
            .with_mutation_probability(2.0)
            .with_crossover_probability(-0.5)
            .with_stagnation_threshold(-1.0);

        assert!((config.mutation_probability - 1.0).abs() < 1e-12);
        assert!((config.crossover_probability - 0.0).abs() < 1e-12);
        assert!((config.stagnation_threshold - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_validate_ok() {
        assert!(EaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_population_too_small() {
        assert!(EaConfig::default()
            .with_population_size(1)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_zero_offspring() {
        assert!(EaConfig::default()
            .with_offspring_count(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_zero_generations() {
        assert!(EaConfig::default()
            .with_max_generations(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_zero_window() {
        assert!(EaConfig::default()
            .with_stagnation_window(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_zero_tournament_size() {
        assert!(EaConfig::default()
            .with_tournament_size(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_out_of_range_probability() {
        // bypass the clamping builders
        let mut config = EaConfig::default();
        config.mutation_probability = 1.5;
        assert!(config.validate().is_err());
    }
}
