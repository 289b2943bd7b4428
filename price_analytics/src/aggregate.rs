//! Calendar-bucket aggregation of price series

use crate::series::{parse_date, Series, TimePoint};
use chrono::{Datelike, NaiveDate};
use price_math::descriptive;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Statistic used to collapse a calendar bucket into one value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMethod {
    /// Identity transform: the series at its original cadence, sorted
    Raw,
    /// Arithmetic mean per bucket
    Average,
    /// Arithmetic sum per bucket
    Sum,
    /// Smallest value per bucket
    Min,
    /// Largest value per bucket
    Max,
    /// Middle-element median per bucket
    Median,
    /// 95th percentile per bucket
    P95,
}

impl AggregationMethod {
    /// Tag as used by the dashboard's select controls
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationMethod::Raw => "raw",
            AggregationMethod::Average => "average",
            AggregationMethod::Sum => "sum",
            AggregationMethod::Min => "min",
            AggregationMethod::Max => "max",
            AggregationMethod::Median => "median",
            AggregationMethod::P95 => "p95",
        }
    }
}

impl fmt::Display for AggregationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Calendar granularity of the bucket keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeInterval {
    /// `YYYY-MM` buckets
    Month,
    /// `YYYY-Qn` buckets
    Quarter,
    /// `YYYY` buckets
    Year,
}

impl TimeInterval {
    /// Tag as used by the dashboard's select controls
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInterval::Month => "month",
            TimeInterval::Quarter => "quarter",
            TimeInterval::Year => "year",
        }
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Bucket key for a date at the given granularity
pub fn bucket_key(date: NaiveDate, interval: TimeInterval) -> String {
    match interval {
        TimeInterval::Month => format!("{:04}-{:02}", date.year(), date.month()),
        TimeInterval::Quarter => format!("{:04}-Q{}", date.year(), date.month0() / 3 + 1),
        TimeInterval::Year => format!("{:04}", date.year()),
    }
}

/// First calendar day of the bucket a key denotes; orders output buckets
fn bucket_start_date(key: &str) -> Option<NaiveDate> {
    if let Some((year, quarter)) = key.split_once("-Q") {
        let year: i32 = year.parse().ok()?;
        let quarter: u32 = quarter.parse().ok()?;
        if !(1..=4).contains(&quarter) {
            return None;
        }
        return NaiveDate::from_ymd_opt(year, (quarter - 1) * 3 + 1, 1);
    }
    parse_date(key)
}

/// Reduce a series to one value per calendar bucket
///
/// `Raw` is special: it is the identity transform and deliberately ignores
/// the `interval` argument, always returning the series at its original
/// cadence sorted ascending by date. Every other method groups values by
/// bucket key and collapses each group with the selected statistic; buckets
/// come back sorted ascending by their start date, so quarters and months
/// order chronologically.
///
/// Points whose date fails to parse, or (outside `Raw`) whose value is
/// missing or non-finite, are dropped silently in every mode; partial
/// documents are the norm for this data.
pub fn aggregate_series(
    points: &[TimePoint],
    interval: TimeInterval,
    method: AggregationMethod,
) -> Series {
    if method == AggregationMethod::Raw {
        let mut dated: Vec<(NaiveDate, TimePoint)> = points
            .iter()
            .filter_map(|point| Some((point.parsed_date()?, point.clone())))
            .collect();
        dated.sort_by_key(|(date, _)| *date);
        return dated.into_iter().map(|(_, point)| point).collect();
    }

    let mut grouped: HashMap<String, Vec<f64>> = HashMap::new();
    for point in points {
        let (Some(date), Some(value)) = (point.parsed_date(), point.numeric()) else {
            continue;
        };
        grouped
            .entry(bucket_key(date, interval))
            .or_default()
            .push(value);
    }

    let mut buckets: Vec<(NaiveDate, TimePoint)> = grouped
        .into_iter()
        .filter_map(|(key, values)| {
            let start = bucket_start_date(&key)?;
            let value = apply_statistic(&values, method)?;
            Some((start, TimePoint::new(key, value)))
        })
        .collect();
    buckets.sort_by_key(|(start, _)| *start);
    buckets.into_iter().map(|(_, point)| point).collect()
}

fn apply_statistic(values: &[f64], method: AggregationMethod) -> Option<f64> {
    match method {
        // Raw never reaches the grouping path
        AggregationMethod::Raw => None,
        AggregationMethod::Average => descriptive::mean(values).ok(),
        AggregationMethod::Sum => descriptive::sum(values).ok(),
        AggregationMethod::Min => descriptive::min(values).ok(),
        AggregationMethod::Max => descriptive::max(values).ok(),
        AggregationMethod::Median => descriptive::median(values).ok(),
        AggregationMethod::P95 => descriptive::percentile(values, 0.95).ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_keys() {
        let date = NaiveDate::from_ymd_opt(2021, 5, 17).unwrap();
        assert_eq!(bucket_key(date, TimeInterval::Month), "2021-05");
        assert_eq!(bucket_key(date, TimeInterval::Quarter), "2021-Q2");
        assert_eq!(bucket_key(date, TimeInterval::Year), "2021");
    }

    #[test]
    fn test_bucket_start_dates_order_quarters() {
        assert_eq!(
            bucket_start_date("2021-Q1"),
            NaiveDate::from_ymd_opt(2021, 1, 1)
        );
        assert_eq!(
            bucket_start_date("2021-Q4"),
            NaiveDate::from_ymd_opt(2021, 10, 1)
        );
        assert_eq!(bucket_start_date("2021-Q5"), None);
        assert_eq!(
            bucket_start_date("2021-07"),
            NaiveDate::from_ymd_opt(2021, 7, 1)
        );
    }
}
