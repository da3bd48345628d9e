//! Sample generation.
//!
//! [`draw`] turns a [`DistributionSpec`] and a count into a finite sequence
//! of [`Sample`]s. Each call validates the distribution, then composes draws
//! from the supplied RNG; calls share no state besides the RNG itself.
//!
//! # Algorithms
//!
//! | Kind | Method |
//! |---|---|
//! | Normal | Box–Muller, `μ + σ·z` |
//! | Uniform | `min + u·(max − min)` |
//! | Exponential | inverse CDF `−ln(1 − u)/λ` |
//! | Kumaraswamy | inverse CDF `(1 − (1 − u)^(1/b))^(1/a)` |
//! | Bernoulli | `u < p` |
//! | Binomial | sum of `n` Bernoulli(p) draws for `n ≤ 64`, else BTPE (`rand_distr`) |
//! | Poisson | Knuth's multiplicative method for `λ ≤ 30`, else PTRS (`rand_distr`) |
//! | Mixture | weighted component choice, then one inner draw |
//! | Categorical | weighted label choice |

use rand::Rng;
use rand_distr::Distribution;

use crate::distributions::{DistributionSpec, OutputKind};
use crate::error::{Result, SamplingError};
use crate::random::{self, WeightedSampler};

/// Largest λ handed to Knuth's method. `e^{-30}` is still far above the
/// smallest normal `f64`, and the expected number of uniforms per draw
/// stays small.
const KNUTH_MAX_LAMBDA: f64 = 30.0;

/// Largest trial count summed draw by draw.
const DIRECT_MAX_TRIALS: u32 = 64;

/// One realized outcome.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sample {
    Continuous(f64),
    Discrete(i64),
    Boolean(bool),
    Label(String),
}

impl Sample {
    /// The output kind this sample belongs to.
    pub fn kind(&self) -> OutputKind {
        match self {
            Sample::Continuous(_) => OutputKind::Continuous,
            Sample::Discrete(_) => OutputKind::Discrete,
            Sample::Boolean(_) => OutputKind::Boolean,
            Sample::Label(_) => OutputKind::Categorical,
        }
    }

    /// Numeric view: booleans map to 0/1, labels have none.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Sample::Continuous(x) => Some(x),
            Sample::Discrete(k) => Some(k as f64),
            Sample::Boolean(b) => Some(if b { 1.0 } else { 0.0 }),
            Sample::Label(_) => None,
        }
    }
}

/// Draws `count` independent samples from `spec`.
///
/// # Errors
/// - `InvalidSpecification` if `spec` violates its constraints.
/// - `InternalInconsistency` if a generated sample falls outside the
///   domain `spec` declares.
///
/// # Examples
/// ```
/// use u_sampling::distributions::DistributionSpec;
/// use u_sampling::random::create_rng;
/// use u_sampling::sampling::{draw, Sample};
///
/// let spec = DistributionSpec::uniform(-1.0, 1.0).unwrap();
/// let samples = draw(&spec, 100, &mut create_rng(42)).unwrap();
/// assert_eq!(samples.len(), 100);
/// assert!(samples.iter().all(|s| matches!(s, Sample::Continuous(x) if (-1.0..=1.0).contains(x))));
/// ```
pub fn draw<R: Rng + ?Sized>(spec: &DistributionSpec, count: usize, rng: &mut R) -> Result<Vec<Sample>> {
    spec.validate()?;
    let generator = Generator::new(spec)?;
    let mut samples = Vec::with_capacity(count);
    for _ in 0..count {
        let sample = generator.sample(rng);
        check_domain(spec, &sample)?;
        samples.push(sample);
    }
    Ok(samples)
}

/// A validated spec with its weighted samplers built once per [`draw`].
enum Generator<'a> {
    Leaf(&'a DistributionSpec),
    Poisson(rand_distr::Poisson<f64>),
    Binomial(rand_distr::Binomial),
    Mixture {
        components: Vec<Generator<'a>>,
        chooser: WeightedSampler,
    },
    Categorical {
        labels: Vec<&'a str>,
        chooser: WeightedSampler,
    },
}

impl<'a> Generator<'a> {
    fn new(spec: &'a DistributionSpec) -> Result<Self> {
        match spec {
            DistributionSpec::Mixture {
                components,
                weights,
            } => Ok(Generator::Mixture {
                components: components
                    .iter()
                    .map(Generator::new)
                    .collect::<Result<_>>()?,
                chooser: WeightedSampler::new(weights)?,
            }),
            DistributionSpec::Categorical { probabilities } => {
                let weights: Vec<f64> = probabilities.iter().map(|(_, p)| *p).collect();
                Ok(Generator::Categorical {
                    labels: probabilities.iter().map(|(l, _)| l.as_str()).collect(),
                    chooser: WeightedSampler::new(&weights)?,
                })
            }
            DistributionSpec::Poisson { lambda } if *lambda > KNUTH_MAX_LAMBDA => {
                rand_distr::Poisson::new(*lambda)
                    .map(Generator::Poisson)
                    .map_err(|e| SamplingError::invalid(format!("Poisson λ={lambda}: {e}")))
            }
            DistributionSpec::Binomial { trials, p } if *trials > DIRECT_MAX_TRIALS => {
                rand_distr::Binomial::new(u64::from(*trials), *p)
                    .map(Generator::Binomial)
                    .map_err(|e| SamplingError::invalid(format!("Binomial p={p}: {e}")))
            }
            leaf => Ok(Generator::Leaf(leaf)),
        }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Sample {
        match self {
            Generator::Leaf(spec) => sample_leaf(spec, rng),
            // draws are integral and bounded by the validated λ
            Generator::Poisson(poisson) => {
                let k: f64 = poisson.sample(rng);
                Sample::Discrete(k as i64)
            }
            Generator::Binomial(binomial) => {
                let k: u64 = binomial.sample(rng);
                Sample::Discrete(i64::try_from(k).unwrap_or(i64::MAX))
            }
            Generator::Mixture {
                components,
                chooser,
            } => components[chooser.sample(rng)].sample(rng),
            Generator::Categorical { labels, chooser } => {
                Sample::Label(labels[chooser.sample(rng)].to_owned())
            }
        }
    }
}

fn sample_leaf<R: Rng + ?Sized>(spec: &DistributionSpec, rng: &mut R) -> Sample {
    match *spec {
        DistributionSpec::Normal { mean, std_dev } => {
            Sample::Continuous(mean + std_dev * random::standard_normal(rng))
        }
        DistributionSpec::Uniform { min, max } => {
            // rounding in `max - min` can overshoot `max` by an ulp
            Sample::Continuous((min + random::unit_interval(rng) * (max - min)).min(max))
        }
        DistributionSpec::Exponential { rate } => {
            Sample::Continuous(random::standard_exponential(rng) / rate)
        }
        DistributionSpec::Kumaraswamy { a, b } => {
            let u = random::unit_interval(rng);
            Sample::Continuous((1.0 - (1.0 - u).powf(1.0 / b)).powf(1.0 / a))
        }
        DistributionSpec::Bernoulli { p } => Sample::Boolean(random::unit_interval(rng) < p),
        DistributionSpec::Binomial { trials, p } => Sample::Discrete(binomial(trials, p, rng)),
        DistributionSpec::Poisson { lambda } => Sample::Discrete(knuth_poisson(lambda, rng)),
        DistributionSpec::Mixture { .. } | DistributionSpec::Categorical { .. } => {
            unreachable!("composite specs are handled by Generator")
        }
    }
}

fn binomial<R: Rng + ?Sized>(trials: u32, p: f64, rng: &mut R) -> i64 {
    (0..trials)
        .map(|_| i64::from(random::unit_interval(rng) < p))
        .sum()
}

/// Knuth's multiplicative Poisson generator for `λ ≤ KNUTH_MAX_LAMBDA`.
///
/// Multiplies uniforms until the product drops below `e^{−λ}`.
///
/// Reference: Knuth (1997), *TAOCP* Vol. 2, §3.4.1.
fn knuth_poisson<R: Rng + ?Sized>(lambda: f64, rng: &mut R) -> i64 {
    let limit = (-lambda).exp();
    let mut k = 0;
    let mut product = random::unit_interval(rng);
    while product > limit {
        k += 1;
        product *= random::unit_interval(rng);
    }
    k
}

/// Confirms `sample` lies in the domain `spec` declares.
fn check_domain(spec: &DistributionSpec, sample: &Sample) -> Result<()> {
    let ok = match (spec, sample) {
        (DistributionSpec::Mixture { .. }, s) => s.kind() == spec.output_kind(),
        (DistributionSpec::Uniform { min, max }, Sample::Continuous(x)) => {
            (*min..=*max).contains(x)
        }
        (DistributionSpec::Exponential { .. }, Sample::Continuous(x)) => *x >= 0.0,
        (DistributionSpec::Kumaraswamy { .. }, Sample::Continuous(x)) => (0.0..=1.0).contains(x),
        (DistributionSpec::Normal { .. }, Sample::Continuous(x)) => x.is_finite(),
        (DistributionSpec::Binomial { trials, .. }, Sample::Discrete(k)) => {
            (0..=i64::from(*trials)).contains(k)
        }
        (DistributionSpec::Poisson { .. }, Sample::Discrete(k)) => *k >= 0,
        (DistributionSpec::Bernoulli { .. }, Sample::Boolean(_)) => true,
        (DistributionSpec::Categorical { probabilities }, Sample::Label(l)) => {
            probabilities.iter().any(|(declared, _)| declared == l)
        }
        _ => false,
    };
    if ok {
        Ok(())
    } else {
        debug_assert!(false, "{} produced out-of-domain sample {sample:?}", spec.kind_name());
        Err(SamplingError::inconsistent(format!(
            "{} produced out-of-domain sample {sample:?}",
            spec.kind_name()
        )))
    }
}

/// Projects samples to `f64`, failing on any non-continuous sample.
pub fn continuous_values(samples: &[Sample]) -> Result<Vec<f64>> {
    samples
        .iter()
        .map(|s| match s {
            Sample::Continuous(x) => Ok(*x),
            other => Err(mismatch(OutputKind::Continuous, other)),
        })
        .collect()
}

/// Projects samples to `i64`, failing on any non-discrete sample.
pub fn discrete_values(samples: &[Sample]) -> Result<Vec<i64>> {
    samples
        .iter()
        .map(|s| match s {
            Sample::Discrete(k) => Ok(*k),
            other => Err(mismatch(OutputKind::Discrete, other)),
        })
        .collect()
}

/// Projects samples to `bool`, failing on any non-boolean sample.
pub fn boolean_values(samples: &[Sample]) -> Result<Vec<bool>> {
    samples
        .iter()
        .map(|s| match s {
            Sample::Boolean(b) => Ok(*b),
            other => Err(mismatch(OutputKind::Boolean, other)),
        })
        .collect()
}

/// Borrows sample labels, failing on any non-label sample.
pub fn labels(samples: &[Sample]) -> Result<Vec<&str>> {
    samples
        .iter()
        .map(|s| match s {
            Sample::Label(l) => Ok(l.as_str()),
            other => Err(mismatch(OutputKind::Categorical, other)),
        })
        .collect()
}

fn mismatch(expected: OutputKind, got: &Sample) -> SamplingError {
    SamplingError::inconsistent(format!("expected a {expected:?} sample, got {got:?}"))
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn uniform_samples_stay_in_range(
            seed in 0_u64..10000,
            min in -1e3_f64..1e3,
            width in 1e-3_f64..1e3,
        ) {
            let spec = DistributionSpec::uniform(min, min + width).unwrap();
            let samples = draw(&spec, 200, &mut create_rng(seed)).unwrap();
            for x in continuous_values(&samples).unwrap() {
                prop_assert!(x >= min && x <= min + width);
            }
        }

        #[test]
        fn kumaraswamy_samples_in_unit_interval(
            seed in 0_u64..10000,
            a in 0.1_f64..10.0,
            b in 0.1_f64..10.0,
        ) {
            let spec = DistributionSpec::kumaraswamy(a, b).unwrap();
            let samples = draw(&spec, 100, &mut create_rng(seed)).unwrap();
            for x in continuous_values(&samples).unwrap() {
                prop_assert!((0.0..=1.0).contains(&x));
            }
        }

        #[test]
        fn binomial_samples_bounded_by_trials(
            seed in 0_u64..10000,
            trials in 1_u32..50,
            p in 0.0_f64..=1.0,
        ) {
            let spec = DistributionSpec::binomial(trials, p).unwrap();
            let samples = draw(&spec, 100, &mut create_rng(seed)).unwrap();
            for k in discrete_values(&samples).unwrap() {
                prop_assert!(k >= 0 && k <= i64::from(trials));
            }
        }

        #[test]
        fn binomial_samples_bounded_for_any_trial_count(
            seed in 0_u64..10000,
            trials in 1_u32..=u32::MAX,
            p in 0.0_f64..=1.0,
        ) {
            let spec = DistributionSpec::binomial(trials, p).unwrap();
            let samples = draw(&spec, 20, &mut create_rng(seed)).unwrap();
            for k in discrete_values(&samples).unwrap() {
                prop_assert!(k >= 0 && k <= i64::from(trials));
            }
        }

        #[test]
        fn accepted_scales_draw_finite_values(
            seed in 0_u64..10000,
            mean_exp in -300.0_f64..308.0,
            scale_exp in -300.0_f64..308.0,
            negative in any::<bool>(),
        ) {
            let mean = if negative { -(10f64.powf(mean_exp)) } else { 10f64.powf(mean_exp) };
            let scale = 10f64.powf(scale_exp);
            let specs = [
                DistributionSpec::Normal { mean, std_dev: scale },
                DistributionSpec::Uniform { min: mean, max: mean + scale },
                DistributionSpec::Exponential { rate: scale },
                DistributionSpec::Poisson { lambda: scale },
            ];
            for spec in specs {
                match draw(&spec, 20, &mut create_rng(seed)) {
                    Ok(samples) => {
                        for s in &samples {
                            let x = s.as_f64().unwrap();
                            prop_assert!(x.is_finite(), "{:?} drew {}", spec, x);
                        }
                    }
                    Err(e) => prop_assert!(
                        matches!(e, SamplingError::InvalidSpecification(_)),
                        "{:?}: {:?}", spec, e
                    ),
                }
            }
        }

        #[test]
        fn draw_returns_requested_count(seed in 0_u64..10000, count in 0_usize..500) {
            let spec = DistributionSpec::exponential(1.0).unwrap();
            let samples = draw(&spec, count, &mut create_rng(seed)).unwrap();
            prop_assert_eq!(samples.len(), count);
        }
    }
}
