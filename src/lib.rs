//! # PricePulse
//!
//! Workspace facade for the food-price analytics crates.
//!
//! The actual functionality lives in the member crates:
//!
//! - [`price_analytics`]: series model, JSON ingestion, aggregation,
//!   alignment/correlation, seasonality, yearly deltas and the forecast
//!   engine
//! - [`price_math`]: the numeric kernels underneath
//!
//! ## Example
//!
//! ```
//! use price_analytics::{aggregate_series, AggregationMethod, TimeInterval, TimePoint};
//!
//! let points = vec![
//!     TimePoint::new("2024-01-01", 31.5),
//!     TimePoint::new("2024-02-01", 32.0),
//! ];
//! let raw = aggregate_series(&points, TimeInterval::Month, AggregationMethod::Raw);
//! assert_eq!(raw.len(), 2);
//! ```

pub use price_analytics;
pub use price_math;
