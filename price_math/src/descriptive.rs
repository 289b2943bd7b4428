//! Descriptive statistics over groups of observations
//!
//! These reductions back the calendar-bucket aggregator: every bucket of
//! values is collapsed into one number by one of the kernels below. All of
//! them require a non-empty input; the aggregator only ever hands them
//! groups with at least one value.

use crate::{MathError, Result};

/// Arithmetic mean of the values
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot compute the mean of an empty group".to_string(),
        ));
    }

    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Arithmetic sum of the values
pub fn sum(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot compute the sum of an empty group".to_string(),
        ));
    }

    Ok(values.iter().sum())
}

/// Smallest value in the group
pub fn min(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot compute the minimum of an empty group".to_string(),
        ));
    }

    Ok(values.iter().copied().fold(f64::INFINITY, f64::min))
}

/// Largest value in the group
pub fn max(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot compute the maximum of an empty group".to_string(),
        ));
    }

    Ok(values.iter().copied().fold(f64::NEG_INFINITY, f64::max))
}

/// Median using the standard middle-element rule
///
/// Odd-sized groups return the middle element of the ascending sort;
/// even-sized groups return the average of the two middle elements.
pub fn median(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot compute the median of an empty group".to_string(),
        ));
    }

    let sorted = sorted_ascending(values);
    let mid = sorted.len() / 2;

    if sorted.len() % 2 == 0 {
        Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Ok(sorted[mid])
    }
}

/// Percentile by rank: the element at ascending index `ceil(n * fraction) - 1`,
/// clamped to `[0, n - 1]`
///
/// No interpolation is applied; the result is always one of the input values.
pub fn percentile(values: &[f64], fraction: f64) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot compute a percentile of an empty group".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&fraction) {
        return Err(MathError::InvalidInput(format!(
            "Percentile fraction must be between 0 and 1, got {fraction}"
        )));
    }

    let sorted = sorted_ascending(values);
    let index = (sorted.len() as f64 * fraction).ceil() as usize;
    let index = index.saturating_sub(1).min(sorted.len() - 1);

    Ok(sorted[index])
}

/// Round to 2 decimal places, the dashboard's display precision
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn sorted_ascending(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_sum() {
        let values = [10.0, 20.0, 30.0];
        assert!((mean(&values).unwrap() - 20.0).abs() < 1e-12);
        assert!((sum(&values).unwrap() - 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_extrema() {
        let values = [3.0, 1.0, 2.0];
        assert_eq!(min(&values).unwrap(), 1.0);
        assert_eq!(max(&values).unwrap(), 3.0);
    }

    #[test]
    fn test_median_even_and_odd() {
        // Even-sized group averages the two middle elements
        assert!((median(&[1.0, 2.0, 3.0, 4.0]).unwrap() - 2.5).abs() < 1e-12);

        // Odd-sized group takes the middle element
        assert!((median(&[1.0, 2.0, 3.0]).unwrap() - 2.0).abs() < 1e-12);

        // Input order must not matter
        assert!((median(&[4.0, 1.0, 3.0, 2.0]).unwrap() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_p95_index_rule() {
        // ceil(20 * 0.95) - 1 = 18, so the 19th value of 1..=20
        let values: Vec<f64> = (1..=20).map(|v| v as f64).collect();
        assert_eq!(percentile(&values, 0.95).unwrap(), 19.0);

        // Clamped at both ends
        assert_eq!(percentile(&values, 0.0).unwrap(), 1.0);
        assert_eq!(percentile(&values, 1.0).unwrap(), 20.0);
    }

    #[test]
    fn test_single_element_group() {
        // Every statistic collapses a singleton to its only element
        let single = [42.0];
        assert_eq!(mean(&single).unwrap(), 42.0);
        assert_eq!(sum(&single).unwrap(), 42.0);
        assert_eq!(min(&single).unwrap(), 42.0);
        assert_eq!(max(&single).unwrap(), 42.0);
        assert_eq!(median(&single).unwrap(), 42.0);
        assert_eq!(percentile(&single, 0.95).unwrap(), 42.0);
    }

    #[test]
    fn test_empty_group_is_an_error() {
        assert!(mean(&[]).is_err());
        assert!(median(&[]).is_err());
        assert!(percentile(&[], 0.95).is_err());
    }

    #[test]
    fn test_invalid_percentile_fraction() {
        assert!(percentile(&[1.0], 1.5).is_err());
        assert!(percentile(&[1.0], -0.1).is_err());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(10.288_888), 10.29);
        assert_eq!(round2(10.0), 10.0);
    }
}
