//! # u-sampling
//!
//! Sampling and aggregation engine for exploring probability distributions.
//!
//! Given a [`DistributionSpec`] (kind + parameters), the engine draws a
//! bounded number of samples and reduces them to a continuous histogram, a
//! discrete frequency table, or categorical counts, plus summary statistics.
//! It knows nothing about widgets or charts; callers hand it parameters and
//! render the plain data it returns.
//!
//! ## Modules
//!
//! - [`distributions`] — distribution specs, validation, theoretical moments
//! - [`random`] — seeded RNG, uniform/normal variates, weighted choice
//! - [`sampling`] — sample generation per distribution kind
//! - [`histogram`] — continuous, discrete and categorical aggregation
//! - [`stats`] — mean, population std dev, min, max
//! - [`simplex`] — keeping edited probabilities on the simplex
//! - [`engine`] — the distribution → samples → aggregate → stats pipeline
//!
//! ## Example
//!
//! ```
//! use u_sampling::{recompute, Aggregate, DistributionSpec, EngineConfig};
//! use u_sampling::random::create_rng;
//!
//! let spec = DistributionSpec::binomial(10, 0.5).unwrap();
//! let result = recompute(&spec, &EngineConfig::default(), &mut create_rng(42)).unwrap();
//! if let Aggregate::Discrete(table) = &result.aggregate {
//!     assert!(table.iter().all(|bin| (0..=10).contains(&bin.value)));
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `serde` | `Serialize`/`Deserialize` on specs, config and results | off |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) | off |

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

pub mod distributions;
pub mod engine;
mod error;
pub mod histogram;
pub mod random;
pub mod sampling;
pub mod simplex;
pub mod special;
pub mod stats;

pub use distributions::{DistributionSpec, OutputKind};
pub use engine::{recompute, Aggregate, EngineConfig, Recomputation, SampleCount};
pub use error::{Result, SamplingError};
pub use histogram::{CategoricalCounts, DiscreteHistogramBin, HistogramBin};
pub use sampling::{draw, Sample};
pub use simplex::CategoricalProbabilities;
pub use stats::SummaryStats;

/// Tolerance for "sums to 1" checks on probability vectors.
pub const PROB_TOLERANCE: f64 = 1e-9;
