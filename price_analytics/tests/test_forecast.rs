use price_analytics::{
    CancelToken, ForecastEngine, ForecastOutcome, ForecastSession, ProductBinding, SeriesMap,
    TimePoint, EPOCHS, MIN_TRAIN_POINTS, PREDICTION_HORIZON,
};

fn monthly_series(months: usize, value_at: impl Fn(usize) -> f64) -> Vec<TimePoint> {
    (0..months)
        .map(|i| {
            let year = 2020 + (i / 12) as i32;
            let month = i % 12 + 1;
            TimePoint::new(format!("{year}-{month:02}-01"), value_at(i))
        })
        .collect()
}

#[tokio::test]
async fn too_short_series_reports_insufficient_data() {
    let engine = ForecastEngine::with_seed(1);
    let cancel = CancelToken::new();
    let series = monthly_series(MIN_TRAIN_POINTS - 1, |i| i as f64);

    let outcome = engine
        .train_and_predict(&series, &cancel, None)
        .await
        .unwrap();

    assert_eq!(outcome, ForecastOutcome::InsufficientData);
}

#[tokio::test]
async fn empty_series_reports_insufficient_data() {
    let engine = ForecastEngine::with_seed(1);
    let cancel = CancelToken::new();

    let outcome = engine.train_and_predict(&[], &cancel, None).await.unwrap();
    assert_eq!(outcome, ForecastOutcome::InsufficientData);
}

#[tokio::test]
async fn cancelled_run_publishes_nothing_and_stops_calling_back() {
    let engine = ForecastEngine::with_seed(1);
    let cancel = CancelToken::new();
    cancel.cancel();

    let mut epochs_seen = 0usize;
    let mut on_epoch = |_: usize, _: f64| epochs_seen += 1;
    let series = monthly_series(24, |i| i as f64);

    let outcome = engine
        .train_and_predict(&series, &cancel, Some(&mut on_epoch))
        .await
        .unwrap();

    assert_eq!(outcome, ForecastOutcome::Cancelled);
    assert_eq!(epochs_seen, 0);
}

#[tokio::test]
async fn constant_series_forecasts_the_constant() {
    let engine = ForecastEngine::with_seed(42);
    let cancel = CancelToken::new();
    let series = monthly_series(20, |_| 7.5);

    let outcome = engine
        .train_and_predict(&series, &cancel, None)
        .await
        .unwrap();

    // A zero-range series denormalizes every prediction back to the
    // constant exactly
    match outcome {
        ForecastOutcome::Ready(forecast) => {
            assert_eq!(forecast.len(), PREDICTION_HORIZON);
            for point in &forecast {
                assert_eq!(point.value, Some(7.5));
            }
        }
        other => panic!("expected a forecast, got {other:?}"),
    }
}

#[tokio::test]
async fn forecast_dates_continue_monthly_after_the_last_observation() {
    let engine = ForecastEngine::with_seed(42);
    let cancel = CancelToken::new();
    // 24 months ending 2021-12-01
    let series = monthly_series(24, |i| 10.0 + i as f64 * 0.5);

    let mut epochs_seen = 0usize;
    let mut on_epoch = |_: usize, _: f64| epochs_seen += 1;

    let outcome = engine
        .train_and_predict(&series, &cancel, Some(&mut on_epoch))
        .await
        .unwrap();

    assert_eq!(epochs_seen, EPOCHS);

    match outcome {
        ForecastOutcome::Ready(forecast) => {
            let dates: Vec<&str> = forecast.iter().map(|p| p.date.as_str()).collect();
            assert_eq!(
                dates,
                vec![
                    "2022-01-01",
                    "2022-02-01",
                    "2022-03-01",
                    "2022-04-01",
                    "2022-05-01",
                    "2022-06-01"
                ]
            );
            for point in &forecast {
                let value = point.value.unwrap();
                assert!(value.is_finite());
            }
        }
        other => panic!("expected a forecast, got {other:?}"),
    }
}

#[tokio::test]
async fn session_publishes_forecasts_per_product() {
    let mut map = SeriesMap::new();
    map.insert(
        "milk_s".to_string(),
        monthly_series(24, |i| 20.0 + (i % 12) as f64),
    );
    map.insert("butter_s".to_string(), monthly_series(24, |_| 55.0));
    // Too short to train on
    map.insert("edam_s".to_string(), monthly_series(6, |_| 30.0));

    let bindings = vec![
        ProductBinding::new("milk", "milk_s", "Milk"),
        ProductBinding::new("butter", "butter_s", "Butter"),
        ProductBinding::new("edam", "edam_s", "Edam"),
        ProductBinding::new("ghost", "missing_series", "Ghost"),
    ];

    let mut session = ForecastSession::new(ForecastEngine::with_seed(7));
    let mut status_lines = Vec::new();
    let mut on_status = |line: &str| status_lines.push(line.to_string());

    session
        .train_all(&map, &bindings, Some(&mut on_status))
        .await
        .unwrap();

    assert!(!session.is_training());
    assert!(session.has_forecasts());
    assert_eq!(session.forecasts().len(), 2);
    assert!(session.forecasts().contains_key("milk"));
    assert!(session.forecasts().contains_key("butter"));
    // Insufficient data and unknown series publish nothing
    assert!(!session.forecasts().contains_key("edam"));
    assert!(!session.forecasts().contains_key("ghost"));

    // One coarse line per trained product plus throttled loss updates
    assert!(status_lines.iter().any(|l| l.starts_with("Training Milk")));
    assert!(status_lines.iter().any(|l| l.contains("loss:")));

    session.clear_forecasts();
    assert!(!session.has_forecasts());
}

#[tokio::test]
async fn cancelling_mid_run_publishes_nothing_and_resets_to_idle() {
    let mut map = SeriesMap::new();
    map.insert("milk_s".to_string(), monthly_series(24, |i| i as f64));

    let bindings = vec![ProductBinding::new("milk", "milk_s", "Milk")];

    let mut session = ForecastSession::new(ForecastEngine::with_seed(7));
    let token = session.cancel_token();

    // Cancel from inside the first status callback, before any epochs run
    let mut on_status = |_: &str| token.cancel();

    session
        .train_all(&map, &bindings, Some(&mut on_status))
        .await
        .unwrap();

    assert!(!session.is_training());
    assert!(!session.has_forecasts());
}

#[tokio::test]
async fn a_new_run_works_after_a_cancelled_one() {
    let mut map = SeriesMap::new();
    map.insert("milk_s".to_string(), monthly_series(24, |_| 9.0));
    let bindings = vec![ProductBinding::new("milk", "milk_s", "Milk")];

    let mut session = ForecastSession::new(ForecastEngine::with_seed(7));

    let token = session.cancel_token();
    let mut cancel_immediately = |_: &str| token.cancel();
    session
        .train_all(&map, &bindings, Some(&mut cancel_immediately))
        .await
        .unwrap();
    assert!(!session.has_forecasts());

    // The stale cancellation must not leak into the next run
    session.train_all(&map, &bindings, None).await.unwrap();
    assert!(session.has_forecasts());
}
