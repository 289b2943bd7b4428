use price_analytics::{
    aggregate_series, align_series_by_date, bucket_by_season, build_seasonal_matrix,
    funnel_breakdown, net_delta, radar_rings, year_set, yearly_deltas, AggregationMethod,
    DatasetLoader, ProductBinding, Season, TimeInterval,
};

const DAIRY_DOCUMENT: &str = r#"{
    "timeSeries": [
        { "date": "2020-01-01", "value": 100.0 },
        { "date": "2020-04-01", "value": 101.5 },
        { "date": "2020-07-01", "value": 104.0 },
        { "date": "2020-10-01", "value": 103.0 },
        { "date": "2021-01-01", "value": 110.0 },
        { "date": "2021-04-01", "value": 113.5 },
        { "date": "2021-07-01", "value": 118.0 },
        { "date": "2021-10-01", "value": 117.0 }
    ],
    "series": {
        "milk_z": [
            { "date": "2020-01-01", "value": 8.0 },
            { "date": "2020-07-01", "value": 8.4 },
            { "date": "2021-01-01", "value": 9.0 },
            { "date": "2021-07-01", "value": 9.6 }
        ],
        "milk_p": [
            { "date": "2020-01-01", "value": 11.0 },
            { "date": "2020-07-01", "value": 11.6 },
            { "date": "2021-01-01", "value": 12.4 },
            { "date": "2021-07-01", "value": 13.1 }
        ],
        "milk_s": [
            { "date": "2020-01-01", "value": 16.0 },
            { "date": "2020-07-01", "value": 16.8 },
            { "date": "2021-01-01", "value": 18.0 },
            { "date": "2021-07-01", "value": 19.2 }
        ]
    }
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Price Analytics: Dashboard Pipeline Example");
    println!("============================================\n");

    // Load a product-category document
    let data = DatasetLoader::from_json_str(DAIRY_DOCUMENT)?;
    println!(
        "Loaded document: {} index points, {} channel series\n",
        data.time_series.len(),
        data.series.len()
    );

    // Aggregate the composite index by year
    let yearly = aggregate_series(
        &data.time_series,
        TimeInterval::Year,
        AggregationMethod::Average,
    );
    println!("Yearly averages of the composite index:");
    for point in &yearly {
        println!("  {}: {:.2}", point.date, point.value.unwrap_or_default());
    }

    // Correlate farm-gate against retail
    let pair = align_series_by_date(&data.series["milk_z"], &data.series["milk_s"]);
    let r = pair.pearson();
    println!(
        "\nFarm-gate vs retail: {} shared dates, r = {:.3} ({})",
        pair.len(),
        r,
        pair.correlation_strength()
    );

    // Season buckets of the aligned pairs
    let buckets = bucket_by_season(&pair.xs, &pair.ys, &pair.labels);
    println!("\nObservations per season:");
    for season in Season::ALL {
        println!("  {}: {}", season, buckets[&season].x.len());
    }

    // Seasonal matrix of the retail series
    let matrix = build_seasonal_matrix(&data.series["milk_s"]);
    println!(
        "\nSeasonal matrix: {} years x 12 months (first year {})",
        matrix.years.len(),
        matrix.years.first().copied().unwrap_or_default()
    );

    // Year-over-year deltas for the retail channel
    let years = year_set(&data.series);
    let keys = vec!["milk_s".to_string()];
    let deltas = yearly_deltas(&data.series, &keys, &years);
    println!("\nYear-over-year retail changes:");
    for delta in &deltas {
        println!("  {}: {:+.2} CZK", delta.year, delta.delta);
    }
    println!("  Net: {:+.2} CZK", net_delta(&deltas));

    // Single-year funnel across the three channels
    let channels = vec![
        ProductBinding::new("farm_gate", "milk_z", "Farm-gate"),
        ProductBinding::new("industry", "milk_p", "Industry"),
        ProductBinding::new("retail", "milk_s", "Retail"),
    ];
    let stages = funnel_breakdown(&data.series, &channels, "2021");
    println!("\nPrice funnel for 2021:");
    for stage in &stages {
        println!(
            "  {:<10} {:>6.2} CZK ({:.0}%)",
            stage.label, stage.value, stage.percent_of_base
        );
    }

    // Multi-year radar rings
    let rings = radar_rings(&data.series, &channels, &[2020, 2021]);
    println!("\nRadar rings:");
    for ring in &rings {
        println!("  {}: {:?}", ring.label, ring.r);
    }

    println!("\nPipeline complete!");
    Ok(())
}
