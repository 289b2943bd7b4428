//! Series data model and dashboard JSON document ingestion

use crate::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

/// A single dated price observation
///
/// `date` is an ISO-8601 calendar date string; aggregated series also use
/// the shorter bucket forms `YYYY-MM` and `YYYY`. A missing or null `value`
/// marks a gap in the source data and is excluded from numeric work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    /// Calendar date string (`YYYY-MM-DD`, `YYYY-MM` or `YYYY`)
    pub date: String,
    /// Observed value, if the source reported one
    #[serde(default)]
    pub value: Option<f64>,
}

impl TimePoint {
    /// Create a point with a value
    pub fn new(date: impl Into<String>, value: f64) -> Self {
        Self {
            date: date.into(),
            value: Some(value),
        }
    }

    /// Create a point marking a gap in the data
    pub fn gap(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            value: None,
        }
    }

    /// The value, provided it is present and finite
    pub fn numeric(&self) -> Option<f64> {
        self.value.filter(|v| v.is_finite())
    }

    /// Fully parsed calendar date, or `None` for malformed dates
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

/// Ordered sequence of observations for one series
pub type Series = Vec<TimePoint>;

/// Mapping from series identifier to its observations
pub type SeriesMap = HashMap<String, Series>;

/// Parse a calendar date string
///
/// Accepts full dates (`YYYY-MM-DD`) as well as the bucket forms produced by
/// aggregation: `YYYY-MM` (first of the month) and `YYYY` (January 1st).
/// Returns `None` for anything else; callers skip such points rather than
/// fail.
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    let date = date.trim();

    if let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return Some(parsed);
    }
    if date.len() == 7 {
        if let Ok(parsed) = NaiveDate::parse_from_str(&format!("{date}-01"), "%Y-%m-%d") {
            return Some(parsed);
        }
    }
    if date.len() == 4 {
        if let Ok(year) = date.parse::<i32>() {
            return NaiveDate::from_ymd_opt(year, 1, 1);
        }
    }

    None
}

/// Calendar-year key of a date string: its first four characters
///
/// This is deliberately the same cheap prefix extraction the dashboard uses
/// for year grouping, not a full date parse. It breaks silently if the date
/// format ever stops leading with the year, which is why it lives in exactly
/// one place.
pub fn year_prefix(date: &str) -> Option<&str> {
    date.get(..4)
}

/// Sorted set of year keys found across all series in the map
pub fn year_set(series_map: &SeriesMap) -> Vec<String> {
    let mut years = BTreeSet::new();
    for points in series_map.values() {
        for point in points {
            if let Some(year) = year_prefix(&point.date) {
                years.insert(year.to_string());
            }
        }
    }
    years.into_iter().collect()
}

/// One selectable product or distribution channel: a stable key, the raw
/// series it maps to, and the label shown by the consuming surface
///
/// The dashboard threads many such records through its views; a slice of
/// bindings is the single configuration type behind funnel, radar and
/// forecast preparation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductBinding {
    /// Stable key the consumer selects by
    pub key: String,
    /// Identifier of the raw series in the document's `series` map
    pub series_key: String,
    /// Human-readable label
    pub label: String,
}

impl ProductBinding {
    /// Create a binding
    pub fn new(
        key: impl Into<String>,
        series_key: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            series_key: series_key.into(),
            label: label.into(),
        }
    }
}

/// Project the raw series map onto a set of bindings, keyed by binding key
///
/// Bindings whose series is absent from the document yield an empty series;
/// partial documents are the norm for this data, not an error.
pub fn extract_series_by_mapping(series: &SeriesMap, bindings: &[ProductBinding]) -> SeriesMap {
    bindings
        .iter()
        .map(|binding| {
            let points = series.get(&binding.series_key).cloned().unwrap_or_default();
            (binding.key.clone(), points)
        })
        .collect()
}

/// One point of a precomputed forecast confidence band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalPoint {
    /// Calendar date string
    pub date: String,
    /// Lower bound of the band
    pub lower: f64,
    /// Upper bound of the band
    pub upper: f64,
}

/// Document metadata, when the producer included it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetMeta {
    /// Name of the composite index series
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    /// Product category the document covers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// One product category's dashboard document
///
/// Every field except `timeSeries` is optional in practice; absent maps
/// deserialize to empty ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedData {
    /// Document metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<DatasetMeta>,
    /// Composite index series for the category
    #[serde(default)]
    pub time_series: Series,
    /// Per-channel raw series
    #[serde(default)]
    pub series: SeriesMap,
    /// Precomputed forecasts, keyed like `series`
    #[serde(default)]
    pub forecasts: HashMap<String, Series>,
    /// Precomputed forecast bands, keyed by series and then confidence level
    #[serde(default)]
    pub forecast_intervals: HashMap<String, HashMap<String, Vec<IntervalPoint>>>,
}

/// Loader for dashboard JSON documents
#[derive(Debug)]
pub struct DatasetLoader;

impl DatasetLoader {
    /// Decode a document from a JSON string
    pub fn from_json_str(json: &str) -> Result<ProcessedData> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and decode a document from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<ProcessedData> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}
