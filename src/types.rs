//! Core trait definitions for the evolutionary engine.
//!
//! The two central traits — [`Chromosome`] and [`Model`] — define the
//! contract between the generic generational loop and domain-specific
//! problem encodings. The engine never inspects concrete gene semantics;
//! everything it needs is expressed through these two traits.

use rand::Rng;

/// A candidate solution: an ordered sequence of genes plus a reference to
/// the immutable problem model that gives them meaning.
///
/// # Contract
///
/// - The gene sequence length is fixed per model and never changes after
///   creation.
/// - Equality between chromosomes of the same type is gene-sequence
///   equality (implement `PartialEq` accordingly).
/// - [`fitness`](Chromosome::fitness) is a pure function of the genes and
///   the model, finite and non-negative for *every* reachable gene
///   sequence — infeasible solutions are penalized, never a panic.
///   Higher is better.
///
/// # Type-level crossover
///
/// [`crossover`](Chromosome::crossover) is an associated function over one
/// concrete type, not an instance method: it constructs fresh children and
/// never mutates the parents. Recombining two different chromosome types
/// is rejected at compile time:
///
/// ```compile_fail
/// use evokit::problems::knapsack::KnapsackModel;
/// use evokit::problems::tsp::{City, TspModel};
/// use evokit::{Chromosome, Model};
/// use rand::{rngs::StdRng, SeedableRng};
/// use std::sync::Arc;
///
/// let mut rng = StdRng::seed_from_u64(0);
/// let knapsack = Arc::new(KnapsackModel::new(vec![1], vec![1], 1).unwrap());
/// let tsp = Arc::new(TspModel::new(vec![
///     City::new(0, 0.0, 0.0),
///     City::new(1, 1.0, 0.0),
/// ]));
/// let a = knapsack.initial_population(1, &mut rng).pop().unwrap();
/// let b = tsp.initial_population(1, &mut rng).pop().unwrap();
/// // mismatched parent types do not type-check
/// let _ = Chromosome::crossover(&a, &b, 1.0, &mut rng);
/// ```
pub trait Chromosome: Clone {
    /// Returns the fitness of this chromosome. Higher is better.
    fn fitness(&self) -> f64;

    /// Perturbs the gene sequence in place.
    ///
    /// How `probability` is applied (one perturbation event per call, or
    /// independently per gene) is up to the implementation; each impl
    /// documents its policy and sticks to it.
    fn mutate<R: Rng>(&mut self, probability: f64, rng: &mut R);

    /// Recombines two parents into two fresh children.
    ///
    /// With probability `probability` the children carry mixed genetic
    /// material from both parents; otherwise they are unmodified copies.
    /// Parents are never mutated.
    fn crossover<R: Rng>(parent1: &Self, parent2: &Self, probability: f64, rng: &mut R)
        -> (Self, Self);
}

/// An immutable description of a concrete optimization problem.
///
/// The model owns no mutable engine state; its sole obligation is to
/// produce an initial population of a requested size. Chromosome instances
/// hold their own (shared, immutable) reference to the model, so the model
/// handed to the engine is only needed at construction time.
pub trait Model {
    /// The chromosome type encoding solutions to this problem.
    type Chromosome: Chromosome;

    /// Produces exactly `mu` well-formed individuals, using any
    /// model-specific randomization policy.
    fn initial_population<R: Rng>(&self, mu: usize, rng: &mut R) -> Vec<Self::Chromosome>;
}
