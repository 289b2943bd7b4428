//! Seasonal views of a price series: year-by-month matrices and season
//! buckets

use crate::series::{parse_date, TimePoint};
use chrono::Datelike;
use price_math::descriptive::round2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Year-by-month average matrix for heatmap and surface consumers
///
/// `z` has exactly one row per entry of `years` and 12 columns each, January
/// through December; `None` marks a month with no observations in that year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalMatrix {
    /// Years with at least one observation, ascending and unique
    pub years: Vec<i32>,
    /// One 12-wide row of month averages per year
    pub z: Vec<Vec<Option<f64>>>,
}

/// Build the year-by-month matrix of average values
///
/// Values are grouped by the year and month of their fully parsed date;
/// points with malformed dates or missing values are skipped. Each cell is
/// the arithmetic mean of its month's values rounded to 2 decimal places.
/// A year with data in only one month still yields a full 12-wide row.
pub fn build_seasonal_matrix(points: &[TimePoint]) -> SeasonalMatrix {
    let mut grouped: BTreeMap<i32, [(f64, usize); 12]> = BTreeMap::new();

    for point in points {
        let (Some(date), Some(value)) = (point.parsed_date(), point.numeric()) else {
            continue;
        };
        let months = grouped.entry(date.year()).or_insert([(0.0, 0); 12]);
        let cell = &mut months[date.month0() as usize];
        cell.0 += value;
        cell.1 += 1;
    }

    let years: Vec<i32> = grouped.keys().copied().collect();
    let z = grouped
        .values()
        .map(|months| {
            months
                .iter()
                .map(|&(sum, count)| (count > 0).then(|| round2(sum / count as f64)))
                .collect()
        })
        .collect();

    SeasonalMatrix { years, z }
}

/// Meteorological season of a calendar month
///
/// The mapping is fixed Northern-hemisphere meteorological seasons; it does
/// not vary by year, locale or hemisphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Season {
    /// December, January, February
    Winter,
    /// March, April, May
    Spring,
    /// June, July, August
    Summer,
    /// September, October, November
    Autumn,
}

impl Season {
    /// All four seasons in display order
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Autumn];

    /// Season of a zero-based calendar month index
    pub fn from_month0(month0: u32) -> Season {
        match month0 {
            11 | 0 | 1 => Season::Winter,
            2..=4 => Season::Spring,
            5..=7 => Season::Summer,
            _ => Season::Autumn,
        }
    }

    /// Season name as shown by the dashboard
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Points collected for one season: parallel x/y/date-label arrays
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeasonBucket {
    /// Values from the first aligned series
    pub x: Vec<f64>,
    /// Values from the second aligned series
    pub y: Vec<f64>,
    /// Date labels of the pairs
    pub text: Vec<String>,
}

/// Partition aligned pairs into the four season buckets by their date label
///
/// Iterates indexes `0..min` of the three slice lengths; labels that fail to
/// parse as dates are skipped. Every season key is present in the result,
/// possibly with empty arrays.
pub fn bucket_by_season(
    xs: &[f64],
    ys: &[f64],
    labels: &[String],
) -> BTreeMap<Season, SeasonBucket> {
    let mut buckets: BTreeMap<Season, SeasonBucket> = Season::ALL
        .iter()
        .map(|&season| (season, SeasonBucket::default()))
        .collect();

    let n = xs.len().min(ys.len()).min(labels.len());
    for i in 0..n {
        let Some(date) = parse_date(&labels[i]) else {
            continue;
        };
        let bucket = buckets
            .entry(Season::from_month0(date.month0()))
            .or_default();
        bucket.x.push(xs[i]);
        bucket.y.push(ys[i]);
        bucket.text.push(labels[i].clone());
    }

    buckets
}
