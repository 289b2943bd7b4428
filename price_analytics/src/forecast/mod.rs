//! On-demand forecasting: trains a small regression model on a sliding
//! window of past values and rolls it forward auto-regressively
//!
//! Everything else in this crate is synchronous and pure; training is the
//! one long-running computation, so the engine is async and hands control
//! back to the runtime after every epoch. Cancellation is cooperative: a
//! [`CancelToken`] is checked at each epoch boundary and before any result
//! is returned.

pub mod model;
pub mod session;

pub use model::{MlpRegressor, Regressor};
pub use session::{CancelToken, ForecastSession};

use crate::error::{AnalyticsError, Result};
use crate::series::{parse_date, TimePoint};
use chrono::Months;
use ndarray::{Array1, Array2};
use price_math::scaling::{denormalize, normalize};
use tracing::{debug, info};

/// Input window width: one year of monthly observations
pub const WINDOW_SIZE: usize = 12;
/// Number of future months predicted per run
pub const PREDICTION_HORIZON: usize = 6;
/// Kept modest so interactive surfaces stay responsive during training
pub const EPOCHS: usize = 50;
/// Minimum number of usable observations needed to train at all
pub const MIN_TRAIN_POINTS: usize = WINDOW_SIZE + 2;

/// What a training run produced
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastOutcome {
    /// Forecast for the months after the last observation, oldest first
    Ready(Vec<TimePoint>),
    /// Fewer than [`MIN_TRAIN_POINTS`] usable observations; nothing to
    /// train on
    InsufficientData,
    /// Cancellation was observed; no forecast was produced
    Cancelled,
}

/// Configuration for training runs
#[derive(Debug, Clone, Default)]
pub struct ForecastEngine {
    /// Weight-initialization seed; fix it for reproducible runs
    pub seed: Option<u64>,
}

impl ForecastEngine {
    /// Engine with entropy-seeded weight initialization
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a fixed weight-initialization seed
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    /// Train a fresh regressor on the series and produce a
    /// [`PREDICTION_HORIZON`]-month forecast
    ///
    /// Observations with malformed values are excluded up front; with fewer
    /// than [`MIN_TRAIN_POINTS`] usable points the run reports
    /// [`ForecastOutcome::InsufficientData`] instead of failing. The loop
    /// yields to the runtime after every epoch and checks `cancel` at each
    /// epoch boundary; once cancellation is observed the progress callback
    /// is not invoked again and no forecast is returned. All model buffers
    /// are owned by this call and dropped on every exit path.
    pub async fn train_and_predict(
        &self,
        series: &[TimePoint],
        cancel: &CancelToken,
        mut on_epoch: Option<&mut dyn FnMut(usize, f64)>,
    ) -> Result<ForecastOutcome> {
        let observed: Vec<(&str, f64)> = series
            .iter()
            .filter_map(|point| point.numeric().map(|value| (point.date.as_str(), value)))
            .collect();

        if observed.len() < MIN_TRAIN_POINTS {
            debug!(
                points = observed.len(),
                needed = MIN_TRAIN_POINTS,
                "not enough data to train a forecast"
            );
            return Ok(ForecastOutcome::InsufficientData);
        }

        let values: Vec<f64> = observed.iter().map(|&(_, value)| value).collect();
        let scaled = normalize(&values)?;
        let (inputs, labels) = build_dataset(&scaled.normalized, WINDOW_SIZE);

        let mut model = match self.seed {
            Some(seed) => MlpRegressor::with_seed(WINDOW_SIZE, seed)?,
            None => MlpRegressor::new(WINDOW_SIZE)?,
        };

        info!(
            points = values.len(),
            examples = inputs.nrows(),
            epochs = EPOCHS,
            "training forecast model"
        );

        for epoch in 0..EPOCHS {
            if cancel.is_cancelled() {
                debug!(epoch, "training cancelled");
                return Ok(ForecastOutcome::Cancelled);
            }

            let loss = model.fit_epoch(&inputs, &labels)?;
            if let Some(callback) = on_epoch.as_mut() {
                callback(epoch, loss);
            }

            // Hand the scheduler a turn so cancellation and UI updates are
            // observed promptly.
            tokio::task::yield_now().await;
        }

        if cancel.is_cancelled() {
            return Ok(ForecastOutcome::Cancelled);
        }

        // Auto-regressive rollout seeded with the last observed window
        let mut window: Vec<f64> =
            scaled.normalized[scaled.normalized.len() - WINDOW_SIZE..].to_vec();
        let mut predictions = Vec::with_capacity(PREDICTION_HORIZON);
        for _ in 0..PREDICTION_HORIZON {
            let predicted = model.predict(&window)?;
            predictions.push(predicted);
            window.remove(0);
            window.push(predicted);
        }

        let last_date = observed[observed.len() - 1].0;
        let dates = future_months(last_date, PREDICTION_HORIZON)?;

        let forecast = dates
            .into_iter()
            .zip(predictions)
            .map(|(date, value)| {
                TimePoint::new(date, denormalize(value, scaled.min, scaled.range))
            })
            .collect();

        Ok(ForecastOutcome::Ready(forecast))
    }
}

/// Sliding-window training examples over a normalized series
///
/// Yields `len - window_size` rows; row `i` covers values `i..i+window_size`
/// and is labelled with the value immediately after the window.
fn build_dataset(data: &[f64], window_size: usize) -> (Array2<f64>, Array1<f64>) {
    let examples = data.len().saturating_sub(window_size);
    let mut inputs = Array2::zeros((examples, window_size));
    let mut labels = Array1::zeros(examples);

    for i in 0..examples {
        for j in 0..window_size {
            inputs[[i, j]] = data[i + j];
        }
        labels[i] = data[i + window_size];
    }

    (inputs, labels)
}

/// The `count` calendar months following `last_date`, formatted `YYYY-MM-DD`
fn future_months(last_date: &str, count: usize) -> Result<Vec<String>> {
    let base = parse_date(last_date).ok_or_else(|| {
        AnalyticsError::DataError(format!(
            "Last observation has an unparseable date: {last_date}"
        ))
    })?;

    (1..=count)
        .map(|offset| {
            base.checked_add_months(Months::new(offset as u32))
                .map(|date| date.format("%Y-%m-%d").to_string())
                .ok_or_else(|| {
                    AnalyticsError::DataError(format!(
                        "Date overflow adding {offset} months to {last_date}"
                    ))
                })
        })
        .collect()
}
