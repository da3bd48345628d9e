//! Aggregation of samples into displayable summaries.
//!
//! - [`histogram`]: fixed-width bins over `[min, max]` of continuous samples.
//! - [`discrete_histogram`]: sparse frequency table of integer samples.
//! - [`categorical_counts`]: zero-filled counts over a declared label set.

use std::collections::{BTreeMap, HashMap};

use crate::error::{Result, SamplingError};

/// One bin of a continuous histogram.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistogramBin {
    pub midpoint: f64,
    pub frequency: usize,
}

/// Frequency of one observed integer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscreteHistogramBin {
    pub value: i64,
    pub frequency: usize,
}

/// Count per declared label, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategoricalCounts {
    counts: Vec<(String, usize)>,
}

impl CategoricalCounts {
    /// Count for `label`, or `None` if it was not declared.
    pub fn get(&self, label: &str) -> Option<usize> {
        self.counts
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, c)| *c)
    }

    /// `(label, count)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.counts.iter().map(|(l, c)| (l.as_str(), *c))
    }

    /// Number of declared labels.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, c)| c).sum()
    }
}

/// Bins continuous samples into `bin_count` equal-width bins spanning
/// `[min(samples), max(samples)]`.
///
/// - Empty input yields an empty histogram.
/// - If every sample has the same value, a single bin at that value holds
///   them all.
/// - Otherwise exactly `bin_count` bins are returned in ascending order,
///   including empty ones. The sample equal to the maximum lands in the
///   last bin.
///
/// # Errors
/// `InvalidSpecification` if `bin_count` is zero or a sample is not finite
/// (non-empty input only).
///
/// # Examples
/// ```
/// use u_sampling::histogram::histogram;
/// let bins = histogram(&[0.0, 1.0, 2.0, 3.0, 4.0], 2).unwrap();
/// assert_eq!(bins.len(), 2);
/// assert_eq!((bins[0].midpoint, bins[0].frequency), (1.0, 2));
/// assert_eq!((bins[1].midpoint, bins[1].frequency), (3.0, 3));
/// ```
pub fn histogram(samples: &[f64], bin_count: usize) -> Result<Vec<HistogramBin>> {
    if samples.is_empty() {
        return Ok(Vec::new());
    }
    if bin_count == 0 {
        return Err(SamplingError::invalid("histogram needs at least one bin"));
    }
    if let Some(bad) = samples.iter().find(|x| !x.is_finite()) {
        return Err(SamplingError::invalid(format!(
            "histogram samples must be finite, got {bad}"
        )));
    }

    let (min, max) = samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        });

    if max == min {
        return Ok(vec![HistogramBin {
            midpoint: min,
            frequency: samples.len(),
        }]);
    }

    // a range wider than f64::MAX is binned at half scale
    let scale = if (max - min).is_finite() { 1.0 } else { 0.5 };
    let lo = min * scale;
    let width = (max * scale - lo) / bin_count as f64;
    let mut frequencies = vec![0usize; bin_count];
    for &x in samples {
        frequencies[bin_index(x * scale, lo, width, bin_count)] += 1;
    }

    Ok(frequencies
        .into_iter()
        .enumerate()
        .map(|(i, frequency)| HistogramBin {
            midpoint: (lo + (i as f64 + 0.5) * width) / scale,
            frequency,
        })
        .collect())
}

/// `clamp(floor((x − lo)/width), 0, bin_count − 1)`.
#[inline]
fn bin_index(x: f64, lo: f64, width: f64, bin_count: usize) -> usize {
    // `as usize` saturates, so the cast itself never wraps
    (((x - lo) / width).floor() as usize).min(bin_count - 1)
}

/// Counts each distinct integer, ascending by value. Only observed values
/// appear.
///
/// # Examples
/// ```
/// use u_sampling::histogram::{discrete_histogram, DiscreteHistogramBin};
/// let table = discrete_histogram(&[3, 1, 3, 7]);
/// assert_eq!(
///     table,
///     vec![
///         DiscreteHistogramBin { value: 1, frequency: 1 },
///         DiscreteHistogramBin { value: 3, frequency: 2 },
///         DiscreteHistogramBin { value: 7, frequency: 1 },
///     ]
/// );
/// ```
pub fn discrete_histogram(samples: &[i64]) -> Vec<DiscreteHistogramBin> {
    let mut table: BTreeMap<i64, usize> = BTreeMap::new();
    for &k in samples {
        *table.entry(k).or_default() += 1;
    }
    table
        .into_iter()
        .map(|(value, frequency)| DiscreteHistogramBin { value, frequency })
        .collect()
}

/// Counts labelled samples against the declared label set.
///
/// Every declared label appears in the result, zero if unobserved.
///
/// # Errors
/// - `InternalInconsistency` if a sample carries an undeclared label.
/// - `InvalidSpecification` if a label is declared twice.
pub fn categorical_counts<S: AsRef<str>>(
    samples: &[S],
    declared_labels: &[&str],
) -> Result<CategoricalCounts> {
    let mut position: HashMap<&str, usize> = HashMap::with_capacity(declared_labels.len());
    for (i, &label) in declared_labels.iter().enumerate() {
        if position.insert(label, i).is_some() {
            return Err(SamplingError::invalid(format!(
                "label '{label}' is declared twice"
            )));
        }
    }

    let mut counts = vec![0usize; declared_labels.len()];
    for sample in samples {
        let label = sample.as_ref();
        let &i = position.get(label).ok_or_else(|| {
            SamplingError::inconsistent(format!("sample label '{label}' was never declared"))
        })?;
        counts[i] += 1;
    }

    Ok(CategoricalCounts {
        counts: declared_labels
            .iter()
            .map(|l| (*l).to_owned())
            .zip(counts)
            .collect(),
    })
}

// ============================================================================
// Tests
// ============================================================================
