//! Distribution specifications.
//!
//! A [`DistributionSpec`] is an immutable description of a distribution kind
//! and its parameters. Editing a parameter means building a new value; the
//! engine never mutates a spec in place.
//!
//! # Supported Distributions
//!
//! | Kind | Parameters | Output | Mean | Variance |
//! |---|---|---|---|---|
//! | Normal | μ, σ | `f64` | μ | σ² |
//! | Uniform | min, max | `f64` | (a+b)/2 | (b−a)²/12 |
//! | Exponential | rate λ | `f64` | 1/λ | 1/λ² |
//! | Kumaraswamy | a, b | `f64` in [0,1] | b·B(1+1/a, b) | m₂ − m₁² |
//! | Bernoulli | p | `bool` | p | p(1−p) |
//! | Binomial | n, p | `i64` | np | np(1−p) |
//! | Poisson | λ | `i64` | λ | λ |
//! | Mixture | components, weights | component's | Σwᵢμᵢ | law of total variance |
//! | Categorical | label → weight | label | — | — |
//!
//! Mixture weights and categorical weights are renormalized when they do
//! not sum to 1. Everything else that violates a constraint is rejected
//! with [`SamplingError::InvalidSpecification`]; nothing is clamped.

use crate::error::{Result, SamplingError};
use crate::random::{STANDARD_EXPONENTIAL_BOUND, STANDARD_NORMAL_BOUND};
use crate::special;

/// Largest accepted Poisson rate. Draws stay exact integers in `f64`.
pub const POISSON_MAX_LAMBDA: f64 = 1e15;

/// The value type a distribution produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutputKind {
    /// Real-valued samples (`f64`).
    Continuous,
    /// Integer-valued samples (`i64`).
    Discrete,
    /// Boolean samples.
    Boolean,
    /// Labelled samples.
    Categorical,
}

/// A distribution kind together with its parameters.
///
/// # Examples
/// ```
/// use u_sampling::distributions::{DistributionSpec, OutputKind};
/// let spec = DistributionSpec::uniform(2.0, 8.0).unwrap();
/// assert_eq!(spec.output_kind(), OutputKind::Continuous);
/// assert_eq!(spec.mean(), Some(5.0));
///
/// assert!(DistributionSpec::uniform(3.0, 3.0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DistributionSpec {
    Normal { mean: f64, std_dev: f64 },
    Uniform { min: f64, max: f64 },
    Exponential { rate: f64 },
    Kumaraswamy { a: f64, b: f64 },
    Bernoulli { p: f64 },
    Binomial { trials: u32, p: f64 },
    Poisson { lambda: f64 },
    Mixture {
        components: Vec<DistributionSpec>,
        weights: Vec<f64>,
    },
    /// Labels in declaration order with their (possibly unnormalized)
    /// weights.
    Categorical { probabilities: Vec<(String, f64)> },
}

impl DistributionSpec {
    /// Validated `Normal(mean, std_dev)`.
    pub fn normal(mean: f64, std_dev: f64) -> Result<Self> {
        Self::Normal { mean, std_dev }.validated()
    }

    /// Validated `Uniform(min, max)`.
    pub fn uniform(min: f64, max: f64) -> Result<Self> {
        Self::Uniform { min, max }.validated()
    }

    /// Validated `Exponential(rate)`.
    pub fn exponential(rate: f64) -> Result<Self> {
        Self::Exponential { rate }.validated()
    }

    /// Validated `Kumaraswamy(a, b)`.
    pub fn kumaraswamy(a: f64, b: f64) -> Result<Self> {
        Self::Kumaraswamy { a, b }.validated()
    }

    /// Validated `Bernoulli(p)`.
    pub fn bernoulli(p: f64) -> Result<Self> {
        Self::Bernoulli { p }.validated()
    }

    /// Validated `Binomial(trials, p)`.
    pub fn binomial(trials: u32, p: f64) -> Result<Self> {
        Self::Binomial { trials, p }.validated()
    }

    /// Validated `Poisson(lambda)`.
    pub fn poisson(lambda: f64) -> Result<Self> {
        Self::Poisson { lambda }.validated()
    }

    /// Validated mixture. Weights are renormalized at draw time.
    pub fn mixture(components: Vec<DistributionSpec>, weights: Vec<f64>) -> Result<Self> {
        Self::Mixture {
            components,
            weights,
        }
        .validated()
    }

    /// Validated categorical distribution over labelled weights.
    pub fn categorical<L: Into<String>>(
        probabilities: impl IntoIterator<Item = (L, f64)>,
    ) -> Result<Self> {
        Self::Categorical {
            probabilities: probabilities
                .into_iter()
                .map(|(label, p)| (label.into(), p))
                .collect(),
        }
        .validated()
    }

    fn validated(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }

    /// Short name of the kind, used in messages and log events.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Normal { .. } => "Normal",
            Self::Uniform { .. } => "Uniform",
            Self::Exponential { .. } => "Exponential",
            Self::Kumaraswamy { .. } => "Kumaraswamy",
            Self::Bernoulli { .. } => "Bernoulli",
            Self::Binomial { .. } => "Binomial",
            Self::Poisson { .. } => "Poisson",
            Self::Mixture { .. } => "Mixture",
            Self::Categorical { .. } => "Categorical",
        }
    }

    /// The value type this spec produces.
    ///
    /// A mixture reports the kind of its first component; [`validate`]
    /// guarantees all components agree.
    ///
    /// [`validate`]: DistributionSpec::validate
    pub fn output_kind(&self) -> OutputKind {
        match self {
            Self::Normal { .. }
            | Self::Uniform { .. }
            | Self::Exponential { .. }
            | Self::Kumaraswamy { .. } => OutputKind::Continuous,
            Self::Bernoulli { .. } => OutputKind::Boolean,
            Self::Binomial { .. } | Self::Poisson { .. } => OutputKind::Discrete,
            Self::Mixture { components, .. } => components
                .first()
                .map_or(OutputKind::Continuous, DistributionSpec::output_kind),
            Self::Categorical { .. } => OutputKind::Categorical,
        }
    }

    /// Labels of a categorical spec in declaration order; empty otherwise.
    pub fn declared_labels(&self) -> Vec<&str> {
        match self {
            Self::Categorical { probabilities } => {
                probabilities.iter().map(|(l, _)| l.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Checks every parameter constraint of the kind.
    ///
    /// # Errors
    /// `InvalidSpecification` naming the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Normal { mean, std_dev } => {
                if !mean.is_finite() || !std_dev.is_finite() || std_dev <= 0.0 {
                    return Err(SamplingError::invalid(format!(
                        "Normal requires finite μ and σ > 0, got μ={mean}, σ={std_dev}"
                    )));
                }
                if !(mean.abs() + STANDARD_NORMAL_BOUND * std_dev).is_finite() {
                    return Err(SamplingError::invalid(format!(
                        "Normal draws would overflow f64, got μ={mean}, σ={std_dev}"
                    )));
                }
            }
            Self::Uniform { min, max } => {
                if !min.is_finite() || !max.is_finite() || min >= max {
                    return Err(SamplingError::invalid(format!(
                        "Uniform requires min < max, got min={min}, max={max}"
                    )));
                }
                if !(max - min).is_finite() {
                    return Err(SamplingError::invalid(format!(
                        "Uniform range overflows f64, got min={min}, max={max}"
                    )));
                }
            }
            Self::Exponential { rate } => {
                require_positive("Exponential rate", rate)?;
                if !(STANDARD_EXPONENTIAL_BOUND / rate).is_finite() {
                    return Err(SamplingError::invalid(format!(
                        "Exponential draws would overflow f64, got rate={rate}"
                    )));
                }
            }
            Self::Kumaraswamy { a, b } => {
                require_positive("Kumaraswamy a", a)?;
                require_positive("Kumaraswamy b", b)?;
            }
            Self::Bernoulli { p } => require_probability("Bernoulli p", p)?,
            Self::Binomial { trials, p } => {
                if trials == 0 {
                    return Err(SamplingError::invalid(
                        "Binomial requires at least one trial",
                    ));
                }
                require_probability("Binomial p", p)?;
            }
            Self::Poisson { lambda } => {
                require_positive("Poisson λ", lambda)?;
                if lambda > POISSON_MAX_LAMBDA {
                    return Err(SamplingError::invalid(format!(
                        "Poisson λ must be at most {POISSON_MAX_LAMBDA:e}, got {lambda}"
                    )));
                }
            }
            Self::Mixture {
                ref components,
                ref weights,
            } => validate_mixture(components, weights)?,
            Self::Categorical { ref probabilities } => validate_categorical(probabilities)?,
        }
        Ok(())
    }

    /// Theoretical mean, or `None` for categorical output.
    ///
    /// Bernoulli outcomes count as 0/1. Assumes a valid spec.
    pub fn mean(&self) -> Option<f64> {
        self.moments().map(|(m, _)| m)
    }

    /// Theoretical variance, or `None` for categorical output.
    pub fn variance(&self) -> Option<f64> {
        self.moments().map(|(_, v)| v)
    }

    /// Theoretical standard deviation, or `None` for categorical output.
    pub fn std_dev(&self) -> Option<f64> {
        self.variance().map(f64::sqrt)
    }

    fn moments(&self) -> Option<(f64, f64)> {
        match self {
            Self::Normal { mean, std_dev } => Some((*mean, std_dev * std_dev)),
            Self::Uniform { min, max } => {
                let range = max - min;
                Some(((min + max) / 2.0, range * range / 12.0))
            }
            Self::Exponential { rate } => Some((1.0 / rate, 1.0 / (rate * rate))),
            Self::Kumaraswamy { a, b } => {
                // raw moments m_n = b·B(1 + n/a, b)
                let m1 = b * special::beta(1.0 + 1.0 / a, *b);
                let m2 = b * special::beta(1.0 + 2.0 / a, *b);
                Some((m1, (m2 - m1 * m1).max(0.0)))
            }
            Self::Bernoulli { p } => Some((*p, p * (1.0 - p))),
            Self::Binomial { trials, p } => {
                let n = f64::from(*trials);
                Some((n * p, n * p * (1.0 - p)))
            }
            Self::Poisson { lambda } => Some((*lambda, *lambda)),
            Self::Mixture {
                components,
                weights,
            } => {
                let total: f64 = weights.iter().sum();
                if total <= 0.0 {
                    return None;
                }
                let mut mean = 0.0;
                let mut second = 0.0;
                for (component, w) in components.iter().zip(weights) {
                    let (m, v) = component.moments()?;
                    let w = w / total;
                    mean += w * m;
                    second += w * (v + m * m);
                }
                Some((mean, (second - mean * mean).max(0.0)))
            }
            Self::Categorical { .. } => None,
        }
    }
}

fn require_positive(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SamplingError::invalid(format!(
            "{name} must be finite and > 0, got {value}"
        )));
    }
    Ok(())
}

fn require_probability(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(SamplingError::invalid(format!(
            "{name} must lie in [0, 1], got {value}"
        )));
    }
    Ok(())
}

/// Checks a weight vector that will be renormalized: non-empty, finite,
/// non-negative, with at least one positive entry.
fn require_weights(name: &str, weights: impl IntoIterator<Item = f64>) -> Result<()> {
    let mut any_positive = false;
    let mut len = 0;
    for w in weights {
        len += 1;
        if !w.is_finite() || w < 0.0 {
            return Err(SamplingError::invalid(format!(
                "{name} weights must be finite and non-negative, got {w}"
            )));
        }
        any_positive |= w > 0.0;
    }
    if len == 0 {
        return Err(SamplingError::invalid(format!("{name} must not be empty")));
    }
    if !any_positive {
        return Err(SamplingError::invalid(format!(
            "{name} needs at least one positive weight"
        )));
    }
    Ok(())
}

fn validate_mixture(components: &[DistributionSpec], weights: &[f64]) -> Result<()> {
    if components.len() != weights.len() {
        return Err(SamplingError::invalid(format!(
            "Mixture has {} components but {} weights",
            components.len(),
            weights.len()
        )));
    }
    require_weights("Mixture", weights.iter().copied())?;

    let kind = components[0].output_kind();
    for (i, component) in components.iter().enumerate() {
        if matches!(component, DistributionSpec::Categorical { .. }) {
            return Err(SamplingError::invalid(
                "Mixture components must produce numeric or boolean samples",
            ));
        }
        component.validate()?;
        if component.output_kind() != kind {
            return Err(SamplingError::invalid(format!(
                "Mixture component {i} produces {:?} samples, expected {kind:?}",
                component.output_kind()
            )));
        }
    }
    Ok(())
}

fn validate_categorical(probabilities: &[(String, f64)]) -> Result<()> {
    require_weights("Categorical", probabilities.iter().map(|(_, p)| *p))?;
    for (i, (label, _)) in probabilities.iter().enumerate() {
        if probabilities[..i].iter().any(|(other, _)| other == label) {
            return Err(SamplingError::invalid(format!(
                "Categorical label '{label}' is declared twice"
            )));
        }
    }
    Ok(())
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
        fn uniform_accepts_ordered_bounds(
            min in -1e6_f64..1e6,
            width in 1e-6_f64..1e6,
        ) {
            prop_assert!(DistributionSpec::uniform(min, min + width).is_ok());
            prop_assert!(DistributionSpec::uniform(min + width, min).is_err());
        }

        #[test]
        fn kumaraswamy_mean_in_unit_interval(a in 0.1_f64..20.0, b in 0.1_f64..20.0) {
            let k = DistributionSpec::kumaraswamy(a, b).unwrap();
            let m = k.mean().unwrap();
            prop_assert!(m > 0.0 && m < 1.0, "mean={m}");
            prop_assert!(k.variance().unwrap() >= 0.0);
        }

        #[test]
        fn mixture_of_one_matches_component(mean in -100.0_f64..100.0, sd in 0.01_f64..50.0) {
            let n = DistributionSpec::normal(mean, sd).unwrap();
            let m = DistributionSpec::mixture(vec![n.clone()], vec![0.3]).unwrap();
            prop_assert!((m.mean().unwrap() - n.mean().unwrap()).abs() < 1e-9);
            prop_assert!((m.variance().unwrap() - n.variance().unwrap()).abs() < 1e-6 * sd * sd + 1e-9);
        }
    }
}
