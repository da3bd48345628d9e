//! Probability vectors that must stay on the simplex while one coordinate
//! is edited at a time.
//!
//! [`adjust`] sets one coordinate and rescales the rest so the vector keeps
//! summing to 1. [`CategoricalProbabilities`] applies it to a labelled
//! probability table and hands out a fresh value on every edit.

use crate::distributions::DistributionSpec;
use crate::error::{Result, SamplingError};
use crate::PROB_TOLERANCE;

/// Sets `current[edited_index]` to `new_value` (clamped to `[0, 1]`) and
/// rescales every other coordinate so the result sums to 1.
///
/// The other coordinates keep their relative proportions when they carry
/// mass. If they are all zero, the remaining mass `1 − new_value` is split
/// evenly among them. A one-coordinate simplex is always `[1.0]`.
///
/// Negative input coordinates (floating residue) are treated as zero. The
/// result depends only on the current proportions, so rounding error does
/// not accumulate across repeated calls.
///
/// # Errors
/// `InvalidSpecification` if `current` is empty, `edited_index` is out of
/// range, a coordinate is not finite, or `new_value` is NaN.
///
/// # Examples
/// ```
/// use u_sampling::simplex::adjust;
/// let p = adjust(&[0.5, 0.3, 0.2], 0, 0.8).unwrap();
/// assert_eq!(p[0], 0.8);
/// assert!((p[1] - 0.12).abs() < 1e-12);
/// assert!((p[2] - 0.08).abs() < 1e-12);
///
/// let q = adjust(&[1.0, 0.0, 0.0], 0, 0.4).unwrap();
/// assert_eq!(q, vec![0.4, 0.3, 0.3]);
/// ```
pub fn adjust(current: &[f64], edited_index: usize, new_value: f64) -> Result<Vec<f64>> {
    let n = current.len();
    if n == 0 {
        return Err(SamplingError::invalid("simplex must have at least one coordinate"));
    }
    if edited_index >= n {
        return Err(SamplingError::invalid(format!(
            "edited index {edited_index} out of bounds for {n} coordinates"
        )));
    }
    if new_value.is_nan() {
        return Err(SamplingError::invalid("edited value must not be NaN"));
    }
    if let Some(bad) = current.iter().find(|x| !x.is_finite()) {
        return Err(SamplingError::invalid(format!(
            "simplex coordinates must be finite, got {bad}"
        )));
    }
    if n == 1 {
        return Ok(vec![1.0]);
    }

    let value = new_value.clamp(0.0, 1.0);
    let remaining = 1.0 - value;
    let others_sum: f64 = current
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != edited_index)
        .map(|(_, &x)| x.max(0.0))
        .sum();

    let even_share = remaining / (n - 1) as f64;
    Ok(current
        .iter()
        .enumerate()
        .map(|(j, &x)| {
            if j == edited_index {
                value
            } else if others_sum > 0.0 {
                // divide first so a tiny `others_sum` cannot overflow
                x.max(0.0) / others_sum * remaining
            } else {
                even_share
            }
        })
        .collect())
}

/// Labelled probabilities that sum to 1, edited one label at a time.
///
/// Every edit returns a new table; the original is left untouched.
///
/// # Examples
/// ```
/// use u_sampling::simplex::CategoricalProbabilities;
/// let probs = CategoricalProbabilities::uniform(["A", "B", "C"]).unwrap();
/// let edited = probs.set("A", 1.0).unwrap();
/// assert_eq!(edited.get("A"), Some(1.0));
/// assert_eq!(edited.get("B"), Some(0.0));
///
/// // the other labels share the released mass evenly again
/// let back = edited.set("A", 0.5).unwrap();
/// assert_eq!(back.get("C"), Some(0.25));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategoricalProbabilities {
    entries: Vec<(String, f64)>,
}

impl CategoricalProbabilities {
    /// Creates a table from labelled probabilities.
    ///
    /// # Errors
    /// `InvalidSpecification` if the table is empty, a label repeats, a
    /// probability lies outside `[0, 1]`, or the sum is not within
    /// [`PROB_TOLERANCE`] of 1.
    pub fn new<L: Into<String>>(entries: impl IntoIterator<Item = (L, f64)>) -> Result<Self> {
        let entries: Vec<(String, f64)> = entries
            .into_iter()
            .map(|(label, p)| (label.into(), p))
            .collect();
        if entries.is_empty() {
            return Err(SamplingError::invalid("categorical table must not be empty"));
        }
        for (i, (label, p)) in entries.iter().enumerate() {
            if !(0.0..=1.0).contains(p) {
                return Err(SamplingError::invalid(format!(
                    "probability of '{label}' must lie in [0, 1], got {p}"
                )));
            }
            if entries[..i].iter().any(|(other, _)| other == label) {
                return Err(SamplingError::invalid(format!(
                    "label '{label}' is declared twice"
                )));
            }
        }
        let sum: f64 = entries.iter().map(|(_, p)| p).sum();
        if (sum - 1.0).abs() > PROB_TOLERANCE {
            return Err(SamplingError::invalid(format!(
                "categorical probabilities sum to {sum}, expected 1"
            )));
        }
        Ok(Self { entries })
    }

    /// Equal probability for every label.
    pub fn uniform<L: Into<String>>(labels: impl IntoIterator<Item = L>) -> Result<Self> {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let share = 1.0 / labels.len().max(1) as f64;
        Self::new(labels.into_iter().map(|l| (l, share)))
    }

    /// Probability of `label`, or `None` if it is not in the table.
    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, p)| *p)
    }

    /// Labels in declaration order.
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    /// Probabilities in declaration order.
    pub fn probabilities(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, p)| *p).collect()
    }

    /// Returns a new table with `label` set to `value` and the other labels
    /// rescaled through [`adjust`].
    ///
    /// # Errors
    /// `InvalidSpecification` if `label` is unknown or `value` is NaN.
    pub fn set(&self, label: &str, value: f64) -> Result<Self> {
        let index = self
            .entries
            .iter()
            .position(|(l, _)| l == label)
            .ok_or_else(|| SamplingError::invalid(format!("unknown label '{label}'")))?;
        let adjusted = adjust(&self.probabilities(), index, value)?;
        Ok(Self {
            entries: self
                .entries
                .iter()
                .zip(adjusted)
                .map(|((l, _), p)| (l.clone(), p))
                .collect(),
        })
    }

    /// The categorical distribution this table describes.
    pub fn to_spec(&self) -> DistributionSpec {
        DistributionSpec::Categorical {
            probabilities: self.entries.clone(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
