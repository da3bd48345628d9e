//! The recompute pipeline: distribution → samples → aggregate → statistics.
//!
//! [`recompute`] is invoked once per parameter edit and runs to completion.
//! It owns nothing between calls; the caller keeps the returned
//! [`Recomputation`] until the next edit replaces it.

use rand::Rng;

use crate::distributions::{DistributionSpec, OutputKind};
use crate::error::{Result, SamplingError};
use crate::histogram::{
    categorical_counts, discrete_histogram, histogram, CategoricalCounts, DiscreteHistogramBin,
    HistogramBin,
};
use crate::sampling::{self, Sample};
use crate::stats::{self, SummaryStats};

/// Labels used when Bernoulli outcomes are counted.
pub const BERNOULLI_LABELS: [&str; 2] = ["false", "true"];

/// The sample counts offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SampleCount {
    Hundred,
    #[default]
    Thousand,
    TenThousand,
}

impl SampleCount {
    /// Every option, smallest first.
    pub const ALL: [SampleCount; 3] = [
        SampleCount::Hundred,
        SampleCount::Thousand,
        SampleCount::TenThousand,
    ];

    pub fn as_usize(self) -> usize {
        match self {
            SampleCount::Hundred => 100,
            SampleCount::Thousand => 1_000,
            SampleCount::TenThousand => 10_000,
        }
    }
}

impl TryFrom<usize> for SampleCount {
    type Error = SamplingError;

    fn try_from(n: usize) -> Result<Self> {
        SampleCount::ALL
            .into_iter()
            .find(|c| c.as_usize() == n)
            .ok_or_else(|| {
                SamplingError::invalid(format!(
                    "sample count must be 100, 1000 or 10000, got {n}"
                ))
            })
    }
}

/// Engine settings shared by every recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    pub sample_count: SampleCount,
    /// Number of bins for continuous histograms.
    pub bin_count: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_count: SampleCount::default(),
            bin_count: 30,
        }
    }
}

impl EngineConfig {
    pub fn with_sample_count(mut self, sample_count: SampleCount) -> Self {
        self.sample_count = sample_count;
        self
    }

    pub fn with_bin_count(mut self, bin_count: usize) -> Self {
        self.bin_count = bin_count;
        self
    }

    /// # Errors
    /// `InvalidSpecification` if `bin_count` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.bin_count == 0 {
            return Err(SamplingError::invalid("bin count must be at least 1"));
        }
        Ok(())
    }
}

/// Reduced samples, shaped by the distribution's output kind.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Aggregate {
    Continuous(Vec<HistogramBin>),
    Discrete(Vec<DiscreteHistogramBin>),
    /// Categorical labels, or Bernoulli outcomes under [`BERNOULLI_LABELS`].
    Categorical(CategoricalCounts),
}

impl Aggregate {
    /// Short name of the variant, used in log events.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Aggregate::Continuous(_) => "histogram",
            Aggregate::Discrete(_) => "frequency table",
            Aggregate::Categorical(_) => "categorical counts",
        }
    }
}

/// Everything one parameter edit produces.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Recomputation {
    pub samples: Vec<Sample>,
    pub aggregate: Aggregate,
    /// `None` for categorical output. Bernoulli outcomes count as 0/1.
    pub stats: Option<SummaryStats>,
}

/// Draws `config.sample_count` samples from `spec`, aggregates them, and
/// summarizes them.
///
/// # Errors
/// - `InvalidSpecification` if `spec` or `config` is invalid.
/// - `InternalInconsistency` if a sample does not match the distribution's output
///   kind.
///
/// # Examples
/// ```
/// use u_sampling::distributions::DistributionSpec;
/// use u_sampling::engine::{recompute, Aggregate, EngineConfig, SampleCount};
/// use u_sampling::random::create_rng;
///
/// let spec = DistributionSpec::normal(0.0, 1.0).unwrap();
/// let config = EngineConfig::default()
///     .with_sample_count(SampleCount::Hundred)
///     .with_bin_count(10);
/// let result = recompute(&spec, &config, &mut create_rng(1)).unwrap();
///
/// let Aggregate::Continuous(bins) = &result.aggregate else { panic!() };
/// assert_eq!(bins.len(), 10);
/// assert_eq!(bins.iter().map(|b| b.frequency).sum::<usize>(), 100);
/// assert!(result.stats.is_some());
/// ```
pub fn recompute<R: Rng + ?Sized>(
    spec: &DistributionSpec,
    config: &EngineConfig,
    rng: &mut R,
) -> Result<Recomputation> {
    config.validate()?;
    let samples = sampling::draw(spec, config.sample_count.as_usize(), rng)?;

    let (aggregate, stats) = match spec.output_kind() {
        OutputKind::Continuous => {
            let values = sampling::continuous_values(&samples)?;
            (
                Aggregate::Continuous(histogram(&values, config.bin_count)?),
                Some(stats::summarize(&values)),
            )
        }
        OutputKind::Discrete => {
            let values = sampling::discrete_values(&samples)?;
            (
                Aggregate::Discrete(discrete_histogram(&values)),
                Some(stats::summarize_discrete(&values)),
            )
        }
        OutputKind::Boolean => {
            let values = sampling::boolean_values(&samples)?;
            let outcomes: Vec<&str> = values
                .iter()
                .map(|&b| BERNOULLI_LABELS[usize::from(b)])
                .collect();
            let numeric: Vec<f64> = values.iter().map(|&b| f64::from(u8::from(b))).collect();
            (
                Aggregate::Categorical(categorical_counts(&outcomes, &BERNOULLI_LABELS)?),
                Some(stats::summarize(&numeric)),
            )
        }
        OutputKind::Categorical => {
            let labels = sampling::labels(&samples)?;
            (
                Aggregate::Categorical(categorical_counts(&labels, &spec.declared_labels())?),
                None,
            )
        }
    };

    trace_info!(
        kind = spec.kind_name(),
        samples = samples.len(),
        aggregate = aggregate.kind_name(),
        "recomputed distribution"
    );

    Ok(Recomputation {
        samples,
        aggregate,
        stats,
    })
}

// ============================================================================
// Tests
// ============================================================================
