//! Selection strategies for the generational loop.
//!
//! Parent selection turns a fitness distribution into a list of breeding
//! candidates; survivor selection turns a combined parent/offspring pool
//! into the next generation. Both entry points run their inputs through
//! the same probability validator before selecting.
//!
//! # References
//!
//! - Baker (1987), "Reducing Bias and Inefficiency in the Selection
//!   Algorithm" (stochastic universal sampling)
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use crate::error::{EaError, Result};
use crate::types::Chromosome;
use rand::seq::SliceRandom;
use rand::Rng;

/// Relative tolerance for accepting a probability vector as normalized.
const NORMALIZATION_TOLERANCE: f64 = 1e-9;

/// Validates a probability vector against an item count.
///
/// Fails on a length mismatch or a negative entry. A vector whose sum
/// deviates from 1 beyond floating tolerance is rescaled with a non-fatal
/// warning; a zero (or non-finite) sum cannot be rescaled and is a fatal
/// degenerate case.
pub fn check_probabilities(items: usize, probs: &[f64]) -> Result<Vec<f64>> {
    if probs.len() != items {
        return Err(EaError::ProbabilityLengthMismatch {
            items,
            probs: probs.len(),
        });
    }
    for (index, &value) in probs.iter().enumerate() {
        if value < 0.0 {
            return Err(EaError::NegativeProbability { index, value });
        }
    }

    let sum: f64 = probs.iter().sum();
    if !sum.is_finite() || sum == 0.0 {
        return Err(EaError::DegenerateFitness);
    }
    if (sum - 1.0).abs() <= NORMALIZATION_TOLERANCE {
        return Ok(probs.to_vec());
    }

    tracing::warn!(sum, "probabilities do not sum to 1; rescaling");
    Ok(probs.iter().map(|p| p / sum).collect())
}

/// Normalizes raw fitness values into a probability distribution.
///
/// An all-zero fitness sum has no valid normalization and is reported as
/// a fatal [`EaError::DegenerateFitness`] rather than a silent division
/// by zero.
pub fn fitness_distribution(fitnesses: &[f64]) -> Result<Vec<f64>> {
    let sum: f64 = fitnesses.iter().sum();
    if !sum.is_finite() || sum == 0.0 {
        return Err(EaError::DegenerateFitness);
    }
    Ok(fitnesses.iter().map(|f| f / sum).collect())
}

/// Parent-selection strategy: turns the current population's fitness
/// distribution into exactly λ breeding candidates (with replacement).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParentSelection {
    /// Stochastic universal sampling: λ evenly spaced pointers over the
    /// cumulative probability curve, a single uniform offset, one pass.
    ///
    /// Expected selection count is proportional to fitness, with much
    /// lower variance than λ independent roulette draws.
    ///
    /// # Complexity
    /// O(μ + λ) per generation
    #[default]
    StochasticUniversalSampling,
}

impl ParentSelection {
    /// Selects exactly `count` parents from `population`.
    ///
    /// `probs` must align positionally with `population`; it is run
    /// through [`check_probabilities`] first.
    pub fn select<C: Chromosome, R: Rng>(
        &self,
        population: &[C],
        probs: &[f64],
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<C>> {
        let probs = check_probabilities(population.len(), probs)?;
        match self {
            Self::StochasticUniversalSampling => {
                Ok(stochastic_universal_sampling(population, &probs, count, rng))
            }
        }
    }
}

/// Survivor-selection strategy: turns a combined parent/offspring pool
/// into the next generation (with replacement).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SurvivorSelection {
    /// q-ary tournament: each survivor slot is filled by the fittest of
    /// `q` contenders drawn uniformly without replacement from the pool.
    ///
    /// `q` controls selection pressure — larger `q` is more elitist,
    /// smaller `q` retains more diversity. Robust to fitness scale since
    /// only comparisons are used.
    ///
    /// # Complexity
    /// O(n · q) for n survivors
    Tournament {
        /// Tournament size, must be ≥ 1.
        q: usize,
    },
}

impl Default for SurvivorSelection {
    fn default() -> Self {
        SurvivorSelection::Tournament { q: 3 }
    }
}

impl SurvivorSelection {
    /// Checks construction-time parameters.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Tournament { q: 0 } => Err(EaError::InvalidConfig(
                "tournament size must be positive".into(),
            )),
            Self::Tournament { .. } => Ok(()),
        }
    }

    /// Selects exactly `count` survivors from `pool`.
    ///
    /// `probs` must align positionally with `pool`; it is run through
    /// [`check_probabilities`] first. `count == 0` yields the empty
    /// vector.
    pub fn select<C: Chromosome, R: Rng>(
        &self,
        pool: &[C],
        probs: &[f64],
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<C>> {
        let probs = check_probabilities(pool.len(), probs)?;
        match self {
            Self::Tournament { q } => tournament(pool, &probs, *q, count, rng),
        }
    }
}

/// Stochastic universal sampling over a normalized distribution.
///
/// Shuffles item/probability pairs identically to break positional bias,
/// then walks the cumulative-sum curve once with `count` evenly spaced
/// pointers. The walk index saturates at the last item so floating-point
/// shortfall near 1.0 can never overrun the population.
fn stochastic_universal_sampling<C: Chromosome, R: Rng>(
    population: &[C],
    probs: &[f64],
    count: usize,
    rng: &mut R,
) -> Vec<C> {
    if count == 0 || population.is_empty() {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..population.len()).collect();
    order.shuffle(rng);

    let spacing = 1.0 / count as f64;
    let offset = rng.random_range(0.0..spacing);

    let last = order.len() - 1;
    let mut cursor = 0;
    let mut cumulative = probs[order[0]];
    let mut selected = Vec::with_capacity(count);

    for k in 0..count {
        let pointer = offset + k as f64 * spacing;
        while cumulative < pointer && cursor < last {
            cursor += 1;
            cumulative += probs[order[cursor]];
        }
        selected.push(population[order[cursor]].clone());
    }

    selected
}

/// q-ary tournament selection over a normalized distribution.
///
/// Ties go to the first contender drawn.
fn tournament<C: Chromosome, R: Rng>(
    pool: &[C],
    probs: &[f64],
    q: usize,
    count: usize,
    rng: &mut R,
) -> Result<Vec<C>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    if q > pool.len() {
        return Err(EaError::TournamentTooLarge { q, pool: pool.len() });
    }

    let mut order: Vec<usize> = (0..pool.len()).collect();
    order.shuffle(rng);

    let mut selected = Vec::with_capacity(count);
    for _ in 0..count {
        let contenders = rand::seq::index::sample(rng, pool.len(), q);
        let mut winner = contenders.index(0);
        for idx in contenders.iter().skip(1) {
            if probs[order[idx]] > probs[order[winner]] {
                winner = idx;
            }
        }
        selected.push(pool[order[winner]].clone());
    }

    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Fixed-fitness chromosome used to observe selection behavior.
    #[derive(Clone, Debug, PartialEq)]
    struct Tagged {
        id: usize,
        fit: f64,
    }

    impl Chromosome for Tagged {
        fn fitness(&self) -> f64 {
            self.fit
        }
        fn mutate<R: Rng>(&mut self, _probability: f64, _rng: &mut R) {}
        fn crossover<R: Rng>(a: &Self, b: &Self, _probability: f64, _rng: &mut R) -> (Self, Self) {
            (a.clone(), b.clone())
        }
    }

    fn make_pool(fitnesses: &[f64]) -> Vec<Tagged> {
        fitnesses
            .iter()
            .enumerate()
            .map(|(id, &fit)| Tagged { id, fit })
            .collect()
    }

    // ---- shared probability validator ----

    #[test]
    fn test_check_normalized_passes_through() {
        let probs = check_probabilities(4, &[0.25, 0.25, 0.25, 0.25]).unwrap();
        assert_eq!(probs, vec![0.25, 0.25, 0.25, 0.25]);
    }

    #[test]
    fn test_check_rescales_unnormalized() {
        // sums to 0.97 — corrected with a warning, not an error
        let probs = check_probabilities(3, &[0.5, 0.27, 0.2]).unwrap();
        let sum: f64 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12, "rescaled sum = {sum}");
    }

    #[test]
    fn test_check_rejects_negative() {
        let err = check_probabilities(3, &[0.5, -0.1, 0.6]).unwrap_err();
        assert!(matches!(
            err,
            EaError::NegativeProbability { index: 1, .. }
        ));
    }

    #[test]
    fn test_check_rejects_length_mismatch() {
        let err = check_probabilities(4, &[0.5, 0.5]).unwrap_err();
        assert!(matches!(
            err,
            EaError::ProbabilityLengthMismatch { items: 4, probs: 2 }
        ));
    }

    #[test]
    fn test_check_rejects_zero_sum() {
        let err = check_probabilities(3, &[0.0, 0.0, 0.0]).unwrap_err();
        assert!(matches!(err, EaError::DegenerateFitness));
    }

    #[test]
    fn test_fitness_distribution_normalizes() {
        let probs = fitness_distribution(&[1.0, 3.0]).unwrap();
        assert_eq!(probs, vec![0.25, 0.75]);
    }

    #[test]
    fn test_fitness_distribution_rejects_zero_sum() {
        let err = fitness_distribution(&[0.0, 0.0]).unwrap_err();
        assert!(matches!(err, EaError::DegenerateFitness));
    }

    // ---- stochastic universal sampling ----

    #[test]
    fn test_sus_returns_exactly_lambda() {
        let pool = make_pool(&[1.0, 2.0, 3.0, 4.0]);
        let probs = fitness_distribution(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        for lambda in [1, 4, 7, 100] {
            let parents = ParentSelection::StochasticUniversalSampling
                .select(&pool, &probs, lambda, &mut rng)
                .unwrap();
            assert_eq!(parents.len(), lambda);
        }
    }

    #[test]
    fn test_sus_lambda_zero_is_empty() {
        let pool = make_pool(&[1.0, 1.0]);
        let parents = ParentSelection::StochasticUniversalSampling
            .select(&pool, &[0.5, 0.5], 0, &mut StdRng::seed_from_u64(42))
            .unwrap();
        assert!(parents.is_empty());
    }

    #[test]
    fn test_sus_clamps_at_last_index() {
        // 1/7 does not sum to exactly 1.0, so the final pointers can
        // exceed the cumulative curve; the walk must saturate instead of
        // overrunning.
        let pool = make_pool(&[1.0; 7]);
        let probs = vec![1.0 / 7.0; 7];
        let mut rng = StdRng::seed_from_u64(7);

        let parents = ParentSelection::StochasticUniversalSampling
            .select(&pool, &probs, 1000, &mut rng)
            .unwrap();
        assert_eq!(parents.len(), 1000);
    }

    #[test]
    fn test_sus_is_fitness_proportional() {
        let pool = make_pool(&[0.7, 0.1, 0.1, 0.1]);
        let probs = vec![0.7, 0.1, 0.1, 0.1];
        let mut rng = StdRng::seed_from_u64(42);

        let parents = ParentSelection::StochasticUniversalSampling
            .select(&pool, &probs, 10_000, &mut rng)
            .unwrap();
        let dominant = parents.iter().filter(|p| p.id == 0).count();
        // expected count is 7000; SUS has low variance around it
        assert!(
            (6500..=7500).contains(&dominant),
            "expected ~7000 selections of the dominant individual, got {dominant}"
        );
    }

    proptest! {
        /// For any population, weight vector, and λ, SUS returns exactly
        /// λ parents — including when floating-point shortfall leaves the
        /// cumulative curve below the last pointers.
        #[test]
        fn prop_sus_exact_count(
            weights in proptest::collection::vec(1e-6f64..1.0, 1..40),
            lambda in 1usize..128,
            seed in any::<u64>(),
        ) {
            let pool = make_pool(&weights);
            let probs = fitness_distribution(&weights).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);

            let parents = ParentSelection::StochasticUniversalSampling
                .select(&pool, &probs, lambda, &mut rng)
                .unwrap();
            prop_assert_eq!(parents.len(), lambda);
        }
    }

    // ---- q-ary tournament ----

    #[test]
    fn test_tournament_returns_exactly_n() {
        let pool = make_pool(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let probs = fitness_distribution(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        for n in [1, 3, 5, 20] {
            let survivors = SurvivorSelection::Tournament { q: 2 }
                .select(&pool, &probs, n, &mut rng)
                .unwrap();
            assert_eq!(survivors.len(), n);
        }
    }

    #[test]
    fn test_tournament_n_zero_is_empty() {
        let pool = make_pool(&[1.0, 2.0]);
        let survivors = SurvivorSelection::Tournament { q: 2 }
            .select(&pool, &[0.25, 0.75], 0, &mut StdRng::seed_from_u64(42))
            .unwrap();
        assert!(survivors.is_empty());
    }

    #[test]
    fn test_tournament_rejects_zero_q() {
        let err = SurvivorSelection::Tournament { q: 0 }.validate().unwrap_err();
        assert!(matches!(err, EaError::InvalidConfig(_)));
        assert!(SurvivorSelection::Tournament { q: 1 }.validate().is_ok());
    }

    #[test]
    fn test_tournament_rejects_oversized_q() {
        let pool = make_pool(&[1.0, 2.0]);
        let err = SurvivorSelection::Tournament { q: 3 }
            .select(&pool, &[0.25, 0.75], 2, &mut StdRng::seed_from_u64(42))
            .unwrap_err();
        assert!(matches!(err, EaError::TournamentTooLarge { q: 3, pool: 2 }));
    }

    #[test]
    fn test_tournament_full_q_always_picks_best() {
        // q = pool size makes every tournament deterministic
        let pool = make_pool(&[1.0, 5.0, 2.0, 3.0]);
        let probs = fitness_distribution(&[1.0, 5.0, 2.0, 3.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        let survivors = SurvivorSelection::Tournament { q: 4 }
            .select(&pool, &probs, 10, &mut rng)
            .unwrap();
        assert!(survivors.iter().all(|s| s.id == 1));
    }

    #[test]
    fn test_tournament_favors_fitter() {
        let pool = make_pool(&[1.0, 2.0, 10.0, 3.0]);
        let probs = fitness_distribution(&[1.0, 2.0, 10.0, 3.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        let survivors = SurvivorSelection::Tournament { q: 2 }
            .select(&pool, &probs, 10_000, &mut rng)
            .unwrap();
        let best = survivors.iter().filter(|s| s.id == 2).count();
        let worst = survivors.iter().filter(|s| s.id == 0).count();
        assert!(
            best > worst,
            "fittest should win more tournaments: best={best}, worst={worst}"
        );
    }

    proptest! {
        /// For any pool of size ≥ q and any target n, the tournament
        /// returns exactly n survivors.
        #[test]
        fn prop_tournament_exact_count(
            weights in proptest::collection::vec(1e-6f64..1.0, 3..30),
            n in 0usize..64,
            q in 1usize..3,
            seed in any::<u64>(),
        ) {
            let pool = make_pool(&weights);
            let probs = fitness_distribution(&weights).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);

            let survivors = SurvivorSelection::Tournament { q }
                .select(&pool, &probs, n, &mut rng)
                .unwrap();
            prop_assert_eq!(survivors.len(), n);
        }
    }
}
