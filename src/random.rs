//! Random source: seeded RNG construction, uniform and normal variates,
//! and weighted index selection.
//!
//! Everything here is generic over [`rand::Rng`]. The bit-level generator
//! itself comes from `rand`; this module only composes its uniform draws.
//!
//! # Reproducibility
//!
//! For reproducible runs use [`create_rng`] with a fixed seed. The
//! underlying algorithm (SmallRng) is deterministic for a given seed on the
//! same platform.

use rand::Rng;

use crate::error::{Result, SamplingError};

/// Creates a fast, seeded random number generator.
///
/// # Examples
/// ```
/// use u_sampling::random::{create_rng, unit_interval};
/// let mut rng = create_rng(42);
/// let u = unit_interval(&mut rng);
/// assert!((0.0..1.0).contains(&u));
/// ```
pub fn create_rng(seed: u64) -> rand::rngs::SmallRng {
    use rand::SeedableRng;
    rand::rngs::SmallRng::seed_from_u64(seed)
}

/// Draws `u ~ Uniform[0, 1)`.
#[inline]
pub fn unit_interval<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random::<f64>()
}

/// Upper bound on `|standard_normal(rng)|`.
///
/// The smallest uniform fed to the logarithm is `2⁻⁵³`, so
/// `|z| ≤ sqrt(106·ln 2) ≈ 8.57`.
pub const STANDARD_NORMAL_BOUND: f64 = 8.6;

/// Upper bound on `standard_exponential(rng)`: `53·ln 2 ≈ 36.74`.
pub const STANDARD_EXPONENTIAL_BOUND: f64 = 36.8;

/// Draws `z ~ N(0, 1)` with the Box–Muller transform.
///
/// The first uniform is taken from `(0, 1]` so the logarithm stays finite;
/// the result never exceeds [`STANDARD_NORMAL_BOUND`] in magnitude.
///
/// Reference: Box & Muller (1958), "A Note on the Generation of Random
/// Normal Deviates", *Annals of Mathematical Statistics* 29(2).
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1 = 1.0 - unit_interval(rng);
    let u2 = unit_interval(rng);
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

/// Draws `e ~ Exponential(1)` by inversion, `−ln(1 − u)`.
///
/// Always finite and in `[0, STANDARD_EXPONENTIAL_BOUND]`.
pub fn standard_exponential<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    -(1.0 - unit_interval(rng)).ln()
}

/// Pre-computed weighted sampler over indices `0..n`.
///
/// Builds a cumulative table from the weights once, then answers each draw
/// with a binary search. Weights need not sum to 1; they are renormalized
/// implicitly by drawing the threshold from `[0, total)`.
///
/// An index whose weight is zero is never returned.
///
/// # Examples
/// ```
/// use u_sampling::random::{create_rng, WeightedSampler};
/// let sampler = WeightedSampler::new(&[1.0, 0.0, 3.0]).unwrap();
/// let mut rng = create_rng(7);
/// for _ in 0..100 {
///     assert_ne!(sampler.sample(&mut rng), 1);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct WeightedSampler {
    cumulative: Vec<f64>,
    total: f64,
    last_positive: usize,
}

impl WeightedSampler {
    /// Creates a sampler from non-negative weights.
    ///
    /// # Errors
    /// `InvalidSpecification` if `weights` is empty, contains a negative or
    /// non-finite entry, or has no positive entry.
    pub fn new(weights: &[f64]) -> Result<Self> {
        if weights.is_empty() {
            return Err(SamplingError::invalid("weights must not be empty"));
        }
        let sampler = Self::accumulate(weights, 1.0)?;
        if sampler.total.is_finite() {
            return Ok(sampler);
        }
        // finite weights whose sum overflows: rescale by the largest one
        let largest = weights.iter().copied().fold(0.0, f64::max);
        Self::accumulate(weights, largest)
    }

    fn accumulate(weights: &[f64], scale: f64) -> Result<Self> {
        let mut cumulative = Vec::with_capacity(weights.len());
        let mut total = 0.0;
        let mut last_positive = None;
        for (i, &w) in weights.iter().enumerate() {
            if !w.is_finite() || w < 0.0 {
                return Err(SamplingError::invalid(format!(
                    "weight {i} must be finite and non-negative, got {w}"
                )));
            }
            if w > 0.0 {
                total += w / scale;
                last_positive = Some(i);
            }
            cumulative.push(total);
        }

        match last_positive {
            Some(last_positive) => Ok(Self {
                cumulative,
                total,
                last_positive,
            }),
            None => Err(SamplingError::invalid(
                "at least one weight must be positive",
            )),
        }
    }

    /// Draws an index with probability `weights[i] / total`.
    ///
    /// # Complexity
    /// O(log n) via binary search.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let threshold = unit_interval(rng) * self.total;
        let idx = self.cumulative.partition_point(|&c| c <= threshold);
        idx.min(self.last_positive)
    }

    /// Returns the number of indices.
    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    /// Always false; a sampler cannot be built from empty weights.
    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    /// Returns the sum of the weights, rescaled if the raw sum overflows.
    pub fn total_weight(&self) -> f64 {
        self.total
    }

    /// Returns the normalized probability of index `i`, or `None` if out of
    /// range.
    pub fn probability(&self, i: usize) -> Option<f64> {
        let hi = *self.cumulative.get(i)?;
        let lo = if i == 0 { 0.0 } else { self.cumulative[i - 1] };
        Some((hi - lo) / self.total)
    }
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn unit_interval_in_range(seed in 0_u64..10000) {
            let mut rng = create_rng(seed);
            for _ in 0..50 {
                let u = unit_interval(&mut rng);
                prop_assert!((0.0..1.0).contains(&u));
            }
        }

        #[test]
        fn weighted_sample_never_picks_zero_weight(
            seed in 0_u64..10000,
            weights in proptest::collection::vec(
                prop_oneof![Just(0.0_f64), 0.1_f64..10.0],
                1..20,
            ),
        ) {
            prop_assume!(weights.iter().any(|&w| w > 0.0));
            let sampler = WeightedSampler::new(&weights).unwrap();
            let mut rng = create_rng(seed);
            for _ in 0..50 {
                let idx = sampler.sample(&mut rng);
                prop_assert!(idx < weights.len());
                prop_assert!(weights[idx] > 0.0);
            }
        }
    }
}
