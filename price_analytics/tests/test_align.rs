use assert_approx_eq::assert_approx_eq;
use price_analytics::{align_series_by_date, TimePoint};
use price_math::correlation::CorrelationStrength;

fn farm_gate() -> Vec<TimePoint> {
    vec![
        TimePoint::new("2021-01-01", 1.0),
        TimePoint::new("2021-02-01", 2.0),
        TimePoint::new("2021-03-01", 3.0),
        TimePoint::new("2021-04-01", 4.0),
    ]
}

fn retail() -> Vec<TimePoint> {
    vec![
        TimePoint::new("2021-02-01", 4.0),
        TimePoint::new("2021-03-01", 6.0),
        TimePoint::new("2021-04-01", 8.0),
        TimePoint::new("2021-05-01", 10.0),
    ]
}

#[test]
fn alignment_keeps_only_shared_dates() {
    let a = farm_gate();
    let b = retail();
    let pair = align_series_by_date(&a, &b);

    // Output length is bounded by both inputs, and every emitted label is a
    // date present in both series
    assert!(pair.len() <= a.len().min(b.len()));
    assert_eq!(pair.labels, vec!["2021-02-01", "2021-03-01", "2021-04-01"]);
    for label in &pair.labels {
        assert!(a.iter().any(|p| &p.date == label));
        assert!(b.iter().any(|p| &p.date == label));
    }

    assert_eq!(pair.xs, vec![2.0, 3.0, 4.0]);
    assert_eq!(pair.ys, vec![4.0, 6.0, 8.0]);
}

#[test]
fn non_numeric_values_do_not_align() {
    let a = vec![
        TimePoint::new("2021-01-01", 1.0),
        TimePoint::gap("2021-02-01"),
    ];
    let b = vec![
        TimePoint::new("2021-01-01", f64::NAN),
        TimePoint::new("2021-02-01", 5.0),
    ];

    let pair = align_series_by_date(&a, &b);
    assert!(pair.is_empty());
}

#[test]
fn perfectly_linear_pair_has_correlation_one() {
    let pair = align_series_by_date(&farm_gate(), &retail());

    assert_approx_eq!(pair.pearson(), 1.0);
    assert_eq!(pair.correlation_strength(), CorrelationStrength::High);
}

#[test]
fn empty_pair_has_zero_correlation() {
    let pair = align_series_by_date(&[], &[]);

    assert_eq!(pair.pearson(), 0.0);
    assert_eq!(pair.correlation_strength(), CorrelationStrength::Low);
}

#[test]
fn constant_side_has_zero_correlation() {
    let a = vec![
        TimePoint::new("2021-01-01", 5.0),
        TimePoint::new("2021-02-01", 5.0),
        TimePoint::new("2021-03-01", 5.0),
    ];
    let pair = align_series_by_date(&a, &farm_gate());

    // Zero variance is the defined fallback, not an error
    assert_eq!(pair.pearson(), 0.0);
}
