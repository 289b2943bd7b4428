//! # Price Analytics
//!
//! A Rust library for food-price dashboard analytics: the pure
//! transformations that turn raw date/value series into the derived series,
//! matrices and scalars a charting surface renders.
//!
//! ## Features
//!
//! - Dashboard JSON document ingestion (`timeSeries`, per-channel `series`,
//!   precomputed `forecasts` and `forecastIntervals`)
//! - Calendar-bucket aggregation (raw/average/sum/min/max/median/p95 over
//!   month/quarter/year buckets)
//! - Date alignment of two series with Pearson correlation and qualitative
//!   strength classification
//! - Seasonal year-by-month matrices and season bucketing
//! - Year-over-year waterfall deltas, single-year funnel breakdowns and
//!   multi-year radar rings
//! - An on-demand forecast engine: a small feed-forward regressor trained
//!   over sliding windows with cooperative cancellation and per-epoch
//!   progress
//!
//! ## Quick Start
//!
//! ```rust
//! use price_analytics::{aggregate_series, AggregationMethod, TimeInterval, TimePoint};
//!
//! let series = vec![
//!     TimePoint::new("2020-01-15", 10.0),
//!     TimePoint::new("2020-02-15", 12.0),
//!     TimePoint::new("2021-01-15", 20.0),
//!     TimePoint::new("2021-02-15", 22.0),
//! ];
//!
//! let yearly = aggregate_series(&series, TimeInterval::Year, AggregationMethod::Average);
//!
//! assert_eq!(yearly.len(), 2);
//! assert_eq!(yearly[0].date, "2020");
//! assert_eq!(yearly[0].value, Some(11.0));
//! ```

pub mod aggregate;
pub mod align;
pub mod deltas;
pub mod error;
pub mod forecast;
pub mod seasonal;
pub mod series;

// Re-export commonly used types
pub use crate::aggregate::{aggregate_series, AggregationMethod, TimeInterval};
pub use crate::align::{align_series_by_date, AlignedPair};
pub use crate::deltas::{
    average_for_year, funnel_breakdown, net_delta, radar_rings, yearly_deltas, FunnelStage,
    RadarRing, YearlyDelta,
};
pub use crate::error::AnalyticsError;
pub use crate::forecast::{
    CancelToken, ForecastEngine, ForecastOutcome, ForecastSession, EPOCHS, MIN_TRAIN_POINTS,
    PREDICTION_HORIZON, WINDOW_SIZE,
};
pub use crate::seasonal::{
    bucket_by_season, build_seasonal_matrix, Season, SeasonBucket, SeasonalMatrix,
};
pub use crate::series::{
    extract_series_by_mapping, year_set, DatasetLoader, ProcessedData, ProductBinding, Series,
    SeriesMap, TimePoint,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
