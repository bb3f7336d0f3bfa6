//! Property-based tests for the 18-statistic aggregator
//!
//! Whatever the input, the summary must be complete, finite and internally
//! consistent:
//! - every statistic is present and finite, including for empty input
//! - order statistics are monotone (min <= Q1 <= median <= Q3 <= 80P <= 90P <= max)
//! - aggregating the same values twice gives the same record

use eabra_core::aggregate::{aggregate, aggregate_feature, feature_names};
use eabra_core::Statistic;
use proptest::prelude::*;

fn values_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop_oneof![
        // Counts, the common case
        prop::collection::vec((0u32..60).prop_map(f64::from), 0..40),
        // Ratios
        prop::collection::vec(0.0f64..5.0, 0..40),
        // Wide range, both signs
        prop::collection::vec(-1.0e6f64..1.0e6, 0..40),
        // Constant sequences
        (0.0f64..100.0, 1usize..20).prop_map(|(v, n)| vec![v; n]),
    ]
}

fn close_enough_le(a: f64, b: f64) -> bool {
    a <= b + 1e-9 * (1.0 + b.abs())
}

proptest! {
    #[test]
    fn every_statistic_is_finite(values in values_strategy()) {
        let record = aggregate(&values);
        for (stat, value) in record.iter() {
            prop_assert!(value.is_finite(), "{} is not finite for {:?}", stat, values);
        }
        prop_assert_eq!(record.iter().count(), Statistic::COUNT);
    }

    #[test]
    fn order_statistics_are_monotone(values in values_strategy()) {
        prop_assume!(!values.is_empty());
        let r = aggregate(&values);
        let chain = [
            Statistic::Min,
            Statistic::Q1,
            Statistic::Median,
            Statistic::Q3,
            Statistic::P80,
            Statistic::P90,
            Statistic::Max,
        ];
        for pair in chain.windows(2) {
            prop_assert!(
                close_enough_le(r[pair[0]], r[pair[1]]),
                "{} > {} for {:?}", pair[0], pair[1], values
            );
        }
        prop_assert!(close_enough_le(r[Statistic::Min], r[Statistic::Avg]));
        prop_assert!(close_enough_le(r[Statistic::Avg], r[Statistic::Max]));
        prop_assert!(r[Statistic::Iqr] >= -1e-9);
        prop_assert!(r[Statistic::Var] >= 0.0);
        prop_assert!(values.contains(&r[Statistic::Mode]));
    }

    #[test]
    fn length_and_sum_match_input(values in values_strategy()) {
        let r = aggregate(&values);
        prop_assert_eq!(r[Statistic::Len], values.len() as f64);
        let sum: f64 = values.iter().sum();
        prop_assert!((r[Statistic::Sum] - sum).abs() <= 1e-6 * (1.0 + sum.abs()));
    }

    #[test]
    fn aggregation_is_deterministic(values in values_strategy()) {
        prop_assert_eq!(aggregate(&values), aggregate(&values));
    }

    #[test]
    fn named_record_matches_catalog(values in values_strategy(), tag in "[A-Z]{3}[a-z]{3}[A-Z]{3}") {
        let record = aggregate_feature(&tag, &values);
        let names: Vec<String> = record.keys().map(str::to_string).collect();
        prop_assert_eq!(names, feature_names(&tag));
    }
}

#[test]
fn constant_sequence_has_no_spread() {
    let r = aggregate(&[4.0; 7]);
    assert_eq!(r[Statistic::Var], 0.0);
    assert_eq!(r[Statistic::Std], 0.0);
    assert_eq!(r[Statistic::Rsd], 0.0);
    assert_eq!(r[Statistic::Skewness], 0.0);
    assert_eq!(r[Statistic::Kurtosis], 0.0);
    assert_eq!(r[Statistic::Mode], 4.0);
}
