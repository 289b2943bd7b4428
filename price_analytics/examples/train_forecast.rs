use price_analytics::{
    ForecastEngine, ForecastSession, ProductBinding, SeriesMap, TimePoint, PREDICTION_HORIZON,
};

/// Three years of synthetic monthly retail prices with a mild trend and a
/// seasonal wobble
fn synthetic_series(base: f64) -> Vec<TimePoint> {
    (0..36)
        .map(|i| {
            let year = 2019 + i / 12;
            let month = i % 12 + 1;
            let trend = i as f64 * 0.08;
            let seasonal = ((month as f64) / 12.0 * std::f64::consts::TAU).sin() * 0.6;
            TimePoint::new(format!("{year}-{month:02}-01"), base + trend + seasonal)
        })
        .collect()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("Price Analytics: On-Demand Forecast Example");
    println!("===========================================\n");

    let mut series_map = SeriesMap::new();
    series_map.insert("milk_s".to_string(), synthetic_series(19.0));
    series_map.insert("butter_s".to_string(), synthetic_series(49.0));

    let bindings = vec![
        ProductBinding::new("milk", "milk_s", "Milk (retail)"),
        ProductBinding::new("butter", "butter_s", "Butter (retail)"),
    ];

    let mut session = ForecastSession::new(ForecastEngine::with_seed(42));
    let mut on_status = |line: &str| println!("  {line}");

    println!("Training...");
    session
        .train_all(&series_map, &bindings, Some(&mut on_status))
        .await?;

    println!("\n{PREDICTION_HORIZON}-month forecasts:");
    for binding in &bindings {
        let Some(forecast) = session.forecasts().get(&binding.key) else {
            println!("  {}: no forecast", binding.label);
            continue;
        };
        println!("  {}:", binding.label);
        for point in forecast {
            println!("    {}  {:.2} CZK", point.date, point.value.unwrap_or_default());
        }
    }

    println!("\nForecasting complete!");
    Ok(())
}
