//! One user-facing training session: busy guard, cancellation and
//! per-product progress

use super::{ForecastEngine, ForecastOutcome};
use crate::error::{AnalyticsError, Result};
use crate::series::{ProductBinding, Series, SeriesMap};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// How often, in epochs, the session refreshes its status line
const STATUS_EVERY_EPOCHS: usize = 5;

/// Cooperative cancellation flag shared between a session owner and the
/// training loop
///
/// Cancellation is observed at safe points (epoch boundaries, between
/// products, before publishing), never preemptively. Clones share the same
/// underlying flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Fresh, uncancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; observers stop at their next check
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Clear the flag; the session calls this when a new run starts
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Drives on-demand training across the selected products, one at a time
///
/// Only one run is meaningful per session: [`ForecastSession::train_all`]
/// refuses to start while a run is in flight, a cancelled run publishes
/// nothing, and the session always returns to idle afterwards. Training
/// failures for a single product are logged and surfaced as "no forecast"
/// for that product; they never abort the host.
#[derive(Debug, Default)]
pub struct ForecastSession {
    engine: ForecastEngine,
    cancel: CancelToken,
    training: bool,
    forecasts: HashMap<String, Series>,
}

impl ForecastSession {
    /// Session around the given engine configuration
    pub fn new(engine: ForecastEngine) -> Self {
        Self {
            engine,
            ..Self::default()
        }
    }

    /// Token observers can use to cancel a run
    ///
    /// The session keeps one token for its whole lifetime, so a clone taken
    /// before a run starts cancels that run once it is in flight.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Whether a run is currently in flight
    pub fn is_training(&self) -> bool {
        self.training
    }

    /// Per-product forecasts published by completed runs
    pub fn forecasts(&self) -> &HashMap<String, Series> {
        &self.forecasts
    }

    /// Whether any run has published a forecast
    pub fn has_forecasts(&self) -> bool {
        !self.forecasts.is_empty()
    }

    /// Drop all published forecasts
    pub fn clear_forecasts(&mut self) {
        self.forecasts.clear();
    }

    /// Train every bound product in order and publish the results
    ///
    /// `on_status` receives coarse progress lines: one per product, plus a
    /// loss update every [`STATUS_EVERY_EPOCHS`] epochs. The result map is
    /// merged into [`ForecastSession::forecasts`] only when the run was not
    /// cancelled; the session resets to idle on every exit path.
    pub async fn train_all(
        &mut self,
        series_map: &SeriesMap,
        bindings: &[ProductBinding],
        on_status: Option<&mut dyn FnMut(&str)>,
    ) -> Result<()> {
        if self.training {
            return Err(AnalyticsError::ValidationError(
                "A training run is already in flight".to_string(),
            ));
        }

        // The flag starts each run cleared; a cancellation left over from a
        // previous run must not kill this one.
        self.cancel.reset();
        self.training = true;

        let result = self.run_products(series_map, bindings, on_status).await;

        self.training = false;
        result
    }

    async fn run_products(
        &mut self,
        series_map: &SeriesMap,
        bindings: &[ProductBinding],
        mut on_status: Option<&mut dyn FnMut(&str)>,
    ) -> Result<()> {
        let mut fresh: HashMap<String, Series> = HashMap::new();

        for binding in bindings {
            if self.cancel.is_cancelled() {
                info!("training session cancelled");
                return Ok(());
            }

            let Some(points) = series_map.get(&binding.series_key) else {
                continue;
            };
            if points.is_empty() {
                continue;
            }

            if let Some(callback) = on_status.as_mut() {
                callback(&format!("Training {}...", binding.label));
            }

            let cancel = self.cancel.clone();
            let label = binding.label.clone();
            let mut epoch_hook = |epoch: usize, loss: f64| {
                if cancel.is_cancelled() {
                    return;
                }
                if epoch % STATUS_EVERY_EPOCHS == 0 {
                    if let Some(callback) = on_status.as_mut() {
                        callback(&format!("Training {label}... (loss: {loss:.4})"));
                    }
                }
            };

            match self
                .engine
                .train_and_predict(points, &cancel, Some(&mut epoch_hook))
                .await
            {
                Ok(ForecastOutcome::Ready(forecast)) => {
                    fresh.insert(binding.key.clone(), forecast);
                }
                Ok(ForecastOutcome::InsufficientData) => {
                    info!(product = %binding.key, "skipping forecast: not enough data");
                }
                Ok(ForecastOutcome::Cancelled) => {
                    info!(product = %binding.key, "training session cancelled");
                    return Ok(());
                }
                Err(err) => {
                    warn!(product = %binding.key, error = %err, "training failed; no forecast produced");
                }
            }
        }

        // Publish only when the whole run survived uncancelled.
        if !self.cancel.is_cancelled() {
            self.forecasts.extend(fresh);
        }

        Ok(())
    }
}
