//! # Price Math
//!
//! Numeric kernels for price series analytics. This crate provides the
//! statistics that back calendar-bucket aggregation, the Pearson correlation
//! used for cross-channel comparisons, and the min-max scaling used to feed
//! regression models.

use thiserror::Error;

// Kernel modules
pub mod correlation;
pub mod descriptive;
pub mod scaling;

/// Errors that can occur in price-math calculations
#[derive(Error, Debug)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for price-math operations
pub type Result<T> = std::result::Result<T, MathError>;
