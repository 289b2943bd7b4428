//! Min-max scaling for regression model inputs

use crate::{MathError, Result};

/// A series scaled into `[0, 1]` together with the parameters needed to
/// invert the transform
#[derive(Debug, Clone, PartialEq)]
pub struct MinMaxScaled {
    /// Scaled values, one per input value
    pub normalized: Vec<f64>,
    /// Minimum of the original values
    pub min: f64,
    /// Spread of the original values (`max - min`)
    pub range: f64,
}

/// Scale values into `[0, 1]`, retaining `min` and `range` for
/// [`denormalize`]
///
/// A constant series has zero range; it normalizes to all zeros and
/// denormalizes back to the constant.
pub fn normalize(values: &[f64]) -> Result<MinMaxScaled> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot normalize an empty series".to_string(),
        ));
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    let normalized = if range == 0.0 {
        vec![0.0; values.len()]
    } else {
        values.iter().map(|v| (v - min) / range).collect()
    };

    Ok(MinMaxScaled {
        normalized,
        min,
        range,
    })
}

/// Invert [`normalize`] for a single scaled value
pub fn denormalize(value: f64, min: f64, range: f64) -> f64 {
    min + value * range
}
