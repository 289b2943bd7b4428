//! Pearson correlation and its qualitative classification

use serde::{Deserialize, Serialize};
use std::fmt;

/// `|r|` below this is a low correlation
pub const MODERATE_THRESHOLD: f64 = 0.4;
/// `|r|` at or above this is a high correlation
pub const HIGH_THRESHOLD: f64 = 0.65;

/// Pearson correlation coefficient over paired samples
///
/// Returns 0.0 when either slice is empty, when the lengths differ, or when
/// either sample has zero variance. The zero fallback is part of the
/// contract: degenerate inputs mean "no measurable correlation", never an
/// error.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.is_empty() || ys.is_empty() || xs.len() != ys.len() {
        return 0.0;
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut sum_sq_x = 0.0;
    let mut sum_sq_y = 0.0;

    for (&x, &y) in xs.iter().zip(ys.iter()) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        numerator += dx * dy;
        sum_sq_x += dx * dx;
        sum_sq_y += dy * dy;
    }

    let denominator = (sum_sq_x * sum_sq_y).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }

    numerator / denominator
}

/// Qualitative bucket for a correlation coefficient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationStrength {
    /// `|r| < 0.4`
    Low,
    /// `0.4 <= |r| < 0.65`
    Moderate,
    /// `|r| >= 0.65`
    High,
}

impl CorrelationStrength {
    /// Classify a coefficient by its magnitude
    ///
    /// The thresholds are fixed constants, not configurable.
    pub fn classify(r: f64) -> Self {
        let magnitude = r.abs();
        if magnitude < MODERATE_THRESHOLD {
            CorrelationStrength::Low
        } else if magnitude < HIGH_THRESHOLD {
            CorrelationStrength::Moderate
        } else {
            CorrelationStrength::High
        }
    }

    /// Lowercase descriptor as shown by the dashboard
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrelationStrength::Low => "low",
            CorrelationStrength::Moderate => "moderate",
            CorrelationStrength::High => "high",
        }
    }
}

impl fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
