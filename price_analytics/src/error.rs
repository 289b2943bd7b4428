//! Error types for the price_analytics crate

use thiserror::Error;

/// Custom error types for the price_analytics crate
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error related to forecast training or inference
    #[error("Forecasting error: {0}")]
    ForecastingError(String),

    /// Error related to parameter validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error from numeric kernels
    #[error("Math error: {0}")]
    MathError(#[from] price_math::MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error decoding a dashboard JSON document
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, AnalyticsError>;
