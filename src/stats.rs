//! Summary statistics over numeric samples.
//!
//! # Algorithms
//!
//! - **Mean**: Neumaier-compensated summation, O(ε) error independent of n.
//! - **Std dev**: two-pass population estimator `sqrt(Σ(x − mean)² / n)`.
//!   The second pass sums squared deviations from the already-computed
//!   mean, so no `E[X²] − E[X]²` cancellation occurs.
//! - **Overflow**: sums that leave the `f64` range are redone on values
//!   divided by `n` (mean) or by the largest magnitude (std dev), so
//!   finite samples always give finite statistics.
//! - **Min / Max**: full scan.

/// Mean, population standard deviation, min and max of a sample set.
///
/// All fields are zero when computed over an empty set; callers that need
/// to distinguish "no data" check the sample count themselves.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SummaryStats {
    pub mean: f64,
    /// Population (divide-by-n) standard deviation.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// Computes [`SummaryStats`] over `samples`.
///
/// # Complexity
/// Time: O(n), Space: O(1)
///
/// # Examples
/// ```
/// use u_sampling::stats::summarize;
/// let s = summarize(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
/// assert_eq!(s.mean, 5.0);
/// assert_eq!(s.std_dev, 2.0);
/// assert_eq!((s.min, s.max), (2.0, 9.0));
///
/// assert_eq!(summarize(&[]), Default::default());
/// ```
pub fn summarize(samples: &[f64]) -> SummaryStats {
    let (Some(mean), Some(min), Some(max)) = (mean(samples), min(samples), max(samples)) else {
        return SummaryStats::default();
    };
    let std_dev = population_std_dev_about(samples, mean);
    SummaryStats {
        mean,
        std_dev,
        min,
        max,
    }
}

/// [`summarize`] over integer samples.
pub fn summarize_discrete(samples: &[i64]) -> SummaryStats {
    let values: Vec<f64> = samples.iter().map(|&k| k as f64).collect();
    summarize(&values)
}

/// Arithmetic mean using compensated summation.
///
/// # Returns
/// - `None` if `data` is empty.
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    let n = data.len() as f64;
    let sum = kahan_sum(data);
    if sum.is_finite() {
        return Some(sum / n);
    }
    Some(compensated_sum(data.iter().map(|&x| x / n)))
}

/// Population variance `Σ(x − mean)² / n`.
///
/// # Returns
/// - `None` if `data` is empty.
pub fn population_variance(data: &[f64]) -> Option<f64> {
    mean(data).map(|m| population_variance_about(data, m))
}

/// Population standard deviation, `sqrt(population_variance(data))`.
pub fn population_std_dev(data: &[f64]) -> Option<f64> {
    population_variance(data).map(f64::sqrt)
}

fn population_variance_about(data: &[f64], mean: f64) -> f64 {
    compensated_sum(data.iter().map(|&x| (x - mean) * (x - mean))) / data.len() as f64
}

fn population_std_dev_about(data: &[f64], mean: f64) -> f64 {
    let std_dev = population_variance_about(data, mean).sqrt();
    if std_dev.is_finite() {
        return std_dev;
    }
    let scale = data.iter().fold(0.0_f64, |m, &x| m.max(x.abs()));
    let squared = compensated_sum(data.iter().map(|&x| {
        let d = x / scale - mean / scale;
        d * d
    }));
    scale * (squared / data.len() as f64).sqrt()
}

/// Returns the minimum value in the slice, or `None` if empty.
pub fn min(data: &[f64]) -> Option<f64> {
    data.iter().copied().reduce(f64::min)
}

/// Returns the maximum value in the slice, or `None` if empty.
pub fn max(data: &[f64]) -> Option<f64> {
    data.iter().copied().reduce(f64::max)
}

/// Neumaier-compensated sum.
///
/// An improved Kahan summation that also handles the case where the addend
/// is larger in magnitude than the running sum.
///
/// Reference: Neumaier (1974), "Rundungsfehleranalyse einiger Verfahren
/// zur Summation endlicher Summen", *ZAMM* 54(1), pp. 39–51.
pub fn kahan_sum(data: &[f64]) -> f64 {
    compensated_sum(data.iter().copied())
}

fn compensated_sum(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut sum = 0.0_f64;
    let mut c = 0.0_f64;
    for x in values {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            c += (sum - t) + x;
        } else {
            c += (x - t) + sum;
        }
        sum = t;
    }
    sum + c
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_textbook_example_exact() {
        let s = summarize(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(s.mean, 5.0);
        assert_eq!(s.std_dev, 2.0);
        assert_eq!(s.min, 2.0);
        assert_eq!(s.max, 9.0);
    }

    #[test]
    fn test_empty_is_all_zero() {
        let s = summarize(&[]);
        assert_eq!(
            s,
            SummaryStats {
                mean: 0.0,
                std_dev: 0.0,
                min: 0.0,
                max: 0.0
            }
        );
    }

    #[test]
    fn test_single_sample() {
        let s = summarize(&[-3.5]);
        assert_eq!(s.mean, -3.5);
        assert_eq!(s.std_dev, 0.0);
        assert_eq!(s.min, -3.5);
        assert_eq!(s.max, -3.5);
    }

    #[test]
    fn test_constant_has_zero_spread() {
        let s = summarize(&[7.25; 100]);
        assert_eq!(s.mean, 7.25);
        assert_eq!(s.std_dev, 0.0);
    }

    #[test]
    fn test_summarize_discrete() {
        let s = summarize_discrete(&[2, 4, 4, 4, 5, 5, 7, 9]);
        assert_eq!(s.mean, 5.0);
        assert_eq!(s.std_dev, 2.0);
        assert_eq!((s.min, s.max), (2.0, 9.0));
        assert_eq!(summarize_discrete(&[]), SummaryStats::default());
    }

    #[test]
    fn test_population_not_sample_estimator() {
        // sample variance of [1, 3] is 2, population variance is 1
        assert_eq!(population_variance(&[1.0, 3.0]), Some(1.0));
        assert_eq!(population_std_dev(&[1.0, 3.0]), Some(1.0));
        assert_eq!(population_variance(&[]), None);
    }

    #[test]
    fn test_large_offset_is_stable() {
        // naive E[X²] − E[X]² would lose everything at this offset
        let data: Vec<f64> = [1.0, 2.0, 3.0, 4.0, 5.0].iter().map(|x| x + 1e9).collect();
        let var = population_variance(&data).unwrap();
        assert!((var - 2.0).abs() < 1e-6, "variance = {var}");
    }

    #[test]
    fn test_huge_values_stay_finite() {
        let s = summarize(&[f64::MAX, f64::MAX]);
        assert_eq!(s.mean, f64::MAX);
        assert_eq!(s.std_dev, 0.0);

        let s = summarize(&[f64::MAX, -f64::MAX]);
        assert_eq!(s.mean, 0.0);
        assert_eq!(s.std_dev, f64::MAX);
        assert_eq!((s.min, s.max), (-f64::MAX, f64::MAX));

        let spread: Vec<f64> = [-1.0, -0.5, 0.5, 1.0].iter().map(|m| m * 1.5e308).collect();
        let s = summarize(&spread);
        assert!(s.mean.abs() < 1e293, "mean = {}", s.mean);
        // sqrt((1 + 0.25 + 0.25 + 1) / 4) · 1.5e308
        let expected = (2.5_f64 / 4.0).sqrt() * 1.5e308;
        assert!((s.std_dev - expected).abs() / expected < 1e-12, "std_dev = {}", s.std_dev);
    }

    #[test]
    fn test_min_max() {
        let v = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        assert_eq!(min(&v), Some(1.0));
        assert_eq!(max(&v), Some(9.0));
        assert_eq!(min(&[]), None);
        assert_eq!(max(&[]), None);
    }

    #[test]
    fn test_kahan_sum_precision() {
        let v = [1e16, 1.0, -1e16];
        let result = kahan_sum(&v);
        assert!(
            (result - 1.0).abs() < 1e-10,
            "compensated sum should preserve the 1.0: got {result}"
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn stats_are_ordered(data in proptest::collection::vec(-1e6_f64..1e6, 1..=200)) {
            let s = summarize(&data);
            prop_assert!(s.min <= s.mean + 1e-6);
            prop_assert!(s.mean <= s.max + 1e-6);
            prop_assert!(s.std_dev >= 0.0);
            // spread cannot exceed half the range
            prop_assert!(s.std_dev <= (s.max - s.min) / 2.0 + 1e-6);
        }

        #[test]
        fn full_range_stats_are_finite(
            data in proptest::collection::vec(
                (-1.0_f64..1.0).prop_map(|m| m * f64::MAX),
                1..=200,
            ),
        ) {
            let s = summarize(&data);
            prop_assert!(s.mean.is_finite() && s.std_dev.is_finite());
            prop_assert!(s.mean >= s.min - 1e-12 * s.min.abs());
            prop_assert!(s.mean <= s.max + 1e-12 * s.max.abs());
        }

        #[test]
        fn shift_moves_mean_only(
            data in proptest::collection::vec(-1e3_f64..1e3, 1..=100),
            shift in -1e3_f64..1e3,
        ) {
            let a = summarize(&data);
            let shifted: Vec<f64> = data.iter().map(|x| x + shift).collect();
            let b = summarize(&shifted);
            prop_assert!((b.mean - (a.mean + shift)).abs() < 1e-8);
            prop_assert!((b.std_dev - a.std_dev).abs() < 1e-8);
        }
    }
}
