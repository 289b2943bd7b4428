//! Date alignment of two series for correlation analysis

use crate::series::TimePoint;
use price_math::correlation::{pearson, CorrelationStrength};
use std::collections::HashMap;

/// Parallel arrays of paired observations sharing a date key
///
/// `labels[i]` is the date both `xs[i]` and `ys[i]` were observed on. The
/// three arrays always have equal length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignedPair {
    /// Values from the first series
    pub xs: Vec<f64>,
    /// Values from the second series
    pub ys: Vec<f64>,
    /// Shared date keys
    pub labels: Vec<String>,
}

impl AlignedPair {
    /// Number of aligned pairs
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether no dates aligned
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Pearson correlation coefficient of the aligned values
    pub fn pearson(&self) -> f64 {
        pearson(&self.xs, &self.ys)
    }

    /// Qualitative strength of the correlation
    pub fn correlation_strength(&self) -> CorrelationStrength {
        CorrelationStrength::classify(self.pearson())
    }
}

/// Match two series by date key
///
/// Builds a lookup of `a` by date (numeric values only; a date duplicated
/// within `a` keeps its last value) and then walks `b` in its given order,
/// emitting a pair wherever both sides have a numeric value for the date.
/// Output order follows `b`; it is chronological only if `b` already is.
pub fn align_series_by_date(a: &[TimePoint], b: &[TimePoint]) -> AlignedPair {
    let mut lookup: HashMap<&str, f64> = HashMap::new();
    for point in a {
        if let Some(value) = point.numeric() {
            lookup.insert(point.date.as_str(), value);
        }
    }

    let mut pair = AlignedPair::default();
    for point in b {
        let (Some(&x), Some(y)) = (lookup.get(point.date.as_str()), point.numeric()) else {
            continue;
        };
        pair.xs.push(x);
        pair.ys.push(y);
        pair.labels.push(point.date.clone());
    }
    pair
}
