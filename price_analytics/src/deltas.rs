//! Year-over-year comparisons: waterfall deltas, funnel breakdowns and
//! radar rings

use crate::series::{year_prefix, ProductBinding, SeriesMap, TimePoint};
use chrono::Datelike;
use price_math::descriptive::round2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One year-over-year step for a waterfall consumer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyDelta {
    /// The later year of the compared pair
    pub year: String,
    /// Summed per-key averages for the earlier year; `None` when no key had
    /// data for it
    pub previous_average: Option<f64>,
    /// Summed per-key averages for the later year
    pub current_average: Option<f64>,
    /// Change from the earlier to the later year; keys without data for a
    /// year contribute 0
    pub delta: f64,
}

/// Mean of the numeric values observed in the given year
///
/// Year matching uses the raw string prefix, not a parsed date; see
/// [`year_prefix`]. Returns `None` when the series has no numeric values
/// for the year.
pub fn average_for_year(points: &[TimePoint], year: &str) -> Option<f64> {
    if year.is_empty() {
        return None;
    }

    let mut sum = 0.0;
    let mut count = 0usize;
    for point in points {
        if year_prefix(&point.date) != Some(year) {
            continue;
        }
        if let Some(value) = point.numeric() {
            sum += value;
            count += 1;
        }
    }

    (count > 0).then(|| sum / count as f64)
}

/// Year-over-year average deltas across the selected keys
///
/// `years` is expected to be the sorted output of
/// [`crate::series::year_set`]. With fewer than two years there is nothing
/// to compare and the result is empty: an insufficient-data state for the
/// caller to surface, not an error. Otherwise one entry is produced per
/// consecutive year pair, starting at the second year.
pub fn yearly_deltas(
    series_map: &SeriesMap,
    keys_to_sum: &[String],
    years: &[String],
) -> Vec<YearlyDelta> {
    if years.len() < 2 {
        return Vec::new();
    }

    let mut deltas = Vec::with_capacity(years.len() - 1);
    for pair in years.windows(2) {
        let previous = summed_average(series_map, keys_to_sum, &pair[0]);
        let current = summed_average(series_map, keys_to_sum, &pair[1]);
        deltas.push(YearlyDelta {
            year: pair[1].clone(),
            previous_average: previous,
            current_average: current,
            delta: current.unwrap_or(0.0) - previous.unwrap_or(0.0),
        });
    }
    deltas
}

/// Sum of per-key year averages; keys without data for the year contribute 0
fn summed_average(series_map: &SeriesMap, keys: &[String], year: &str) -> Option<f64> {
    let mut sum = 0.0;
    let mut any = false;
    for key in keys {
        if let Some(average) = series_map
            .get(key)
            .and_then(|points| average_for_year(points, year))
        {
            sum += average;
            any = true;
        }
    }
    any.then_some(sum)
}

/// Net change across all steps, the waterfall's terminal total bar
pub fn net_delta(deltas: &[YearlyDelta]) -> f64 {
    deltas.iter().map(|delta| delta.delta).sum()
}

/// One channel's stage in a single-year funnel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelStage {
    /// Binding key of the channel
    pub key: String,
    /// Display label of the channel
    pub label: String,
    /// Average value for the selected year; 0 when the channel has no data
    pub value: f64,
    /// Percentage relative to the first channel in the order
    pub percent_of_base: f64,
}

/// Absolute per-channel averages for one year, with percentages relative to
/// the first channel in the given order
///
/// The binding order is significant: by convention it runs farm-gate,
/// industry, retail, and the farm-gate stage is the 100% base. When the
/// base is 0 or negative, every percentage is 0.
pub fn funnel_breakdown(
    series_map: &SeriesMap,
    channel_order: &[ProductBinding],
    year: &str,
) -> Vec<FunnelStage> {
    let values: Vec<f64> = channel_order
        .iter()
        .map(|binding| {
            series_map
                .get(&binding.series_key)
                .and_then(|points| average_for_year(points, year))
                .unwrap_or(0.0)
        })
        .collect();

    let base = values.first().copied().unwrap_or(0.0);

    channel_order
        .iter()
        .zip(values)
        .map(|(binding, value)| FunnelStage {
            key: binding.key.clone(),
            label: binding.label.clone(),
            value,
            percent_of_base: if base > 0.0 { value / base * 100.0 } else { 0.0 },
        })
        .collect()
}

/// Per-year averages of a series, rounded to 2 decimal places
///
/// Unlike [`average_for_year`], years are matched against fully parsed
/// dates; points with malformed dates are skipped. The result has one entry
/// per requested year, `None` where the year has no observations.
pub fn yearly_averages(points: &[TimePoint], years: &[i32]) -> Vec<Option<f64>> {
    let mut year_map: HashMap<i32, (f64, usize)> =
        years.iter().map(|&year| (year, (0.0, 0))).collect();

    for point in points {
        let (Some(date), Some(value)) = (point.parsed_date(), point.numeric()) else {
            continue;
        };
        if let Some(entry) = year_map.get_mut(&date.year()) {
            entry.0 += value;
            entry.1 += 1;
        }
    }

    years
        .iter()
        .map(|year| {
            let (sum, count) = year_map[year];
            (count > 0).then(|| round2(sum / count as f64))
        })
        .collect()
}

/// One product's ring on the multi-year radar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarRing {
    /// Binding key of the product
    pub key: String,
    /// Display label of the product
    pub label: String,
    /// Year axis labels, in the order given
    pub theta: Vec<String>,
    /// Per-year average magnitude; years without data render as 0
    pub r: Vec<f64>,
}

/// Build one radar ring per binding over the given years
pub fn radar_rings(
    series_map: &SeriesMap,
    bindings: &[ProductBinding],
    years: &[i32],
) -> Vec<RadarRing> {
    let theta: Vec<String> = years.iter().map(|year| year.to_string()).collect();

    bindings
        .iter()
        .map(|binding| {
            let r = match series_map.get(&binding.series_key) {
                Some(points) => yearly_averages(points, years)
                    .into_iter()
                    .map(|value| value.unwrap_or(0.0))
                    .collect(),
                None => vec![0.0; years.len()],
            };
            RadarRing {
                key: binding.key.clone(),
                label: binding.label.clone(),
                theta: theta.clone(),
                r,
            }
        })
        .collect()
}
