//! Aggregator engine
//!
//! Every per-unit measurement an extractor family produces (one value per
//! sentence, one value per token) is summarised by the same 18 descriptive
//! statistics. This module owns that summary.
//!
//! # Statistics
//!
//! | key        | meaning                                                      |
//! |------------|--------------------------------------------------------------|
//! | `sum`      | arithmetic sum                                               |
//! | `min`      | minimum                                                      |
//! | `max`      | maximum                                                      |
//! | `len`      | number of values                                             |
//! | `median`   | 50th percentile                                              |
//! | `Q1`       | 25th percentile                                              |
//! | `Q3`       | 75th percentile                                              |
//! | `80P`      | 80th percentile                                              |
//! | `90P`      | 90th percentile                                              |
//! | `avg`      | arithmetic mean                                              |
//! | `mode`     | most frequent value, smallest value wins a tie               |
//! | `var`      | sample variance (`n - 1` divisor)                            |
//! | `std`      | sample standard deviation (`n - 1` divisor)                  |
//! | `RSD`      | `std / avg`                                                  |
//! | `IQR`      | `Q3 - Q1`                                                    |
//! | `Dolch`    | `90P - median`                                               |
//! | `skewness` | bias-corrected Fisher-Pearson skewness                       |
//! | `kurtosis` | bias-corrected excess kurtosis                               |
//!
//! Percentiles use linear interpolation between the two closest order
//! statistics at rank `p / 100 * (n - 1)`.
//!
//! # Degenerate input
//!
//! The engine never fails and never yields NaN or infinity:
//!
//! - an empty sequence produces a record of zeros,
//! - `var` and `std` are zero for a single value,
//! - `RSD` is zero when the mean is zero,
//! - `skewness` and `kurtosis` are zero for `n <= 2` and for constant input.
//!
//! The higher moments are computed as a [`Moment`] so the degenerate case stays
//! explicit until the record is assembled.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Index;

use crate::record::FeatureRecord;

/// Relative tolerance under which the second central moment counts as zero.
const MOMENT_RESOLUTION: f64 = 1e-15;

/// One of the 18 summary statistics, in canonical output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Statistic {
    Sum,
    Min,
    Max,
    Len,
    Median,
    Q1,
    Q3,
    P80,
    P90,
    Avg,
    Mode,
    Var,
    Std,
    Rsd,
    Iqr,
    Dolch,
    Skewness,
    Kurtosis,
}

impl Statistic {
    /// Number of statistics in every [`AggregateRecord`].
    pub const COUNT: usize = 18;

    /// All statistics in canonical order.
    pub const ALL: [Statistic; Statistic::COUNT] = [
        Statistic::Sum,
        Statistic::Min,
        Statistic::Max,
        Statistic::Len,
        Statistic::Median,
        Statistic::Q1,
        Statistic::Q3,
        Statistic::P80,
        Statistic::P90,
        Statistic::Avg,
        Statistic::Mode,
        Statistic::Var,
        Statistic::Std,
        Statistic::Rsd,
        Statistic::Iqr,
        Statistic::Dolch,
        Statistic::Skewness,
        Statistic::Kurtosis,
    ];

    /// The key used when naming features (`{tag}_{key}`).
    pub fn key(self) -> &'static str {
        match self {
            Statistic::Sum => "sum",
            Statistic::Min => "min",
            Statistic::Max => "max",
            Statistic::Len => "len",
            Statistic::Median => "median",
            Statistic::Q1 => "Q1",
            Statistic::Q3 => "Q3",
            Statistic::P80 => "80P",
            Statistic::P90 => "90P",
            Statistic::Avg => "avg",
            Statistic::Mode => "mode",
            Statistic::Var => "var",
            Statistic::Std => "std",
            Statistic::Rsd => "RSD",
            Statistic::Iqr => "IQR",
            Statistic::Dolch => "Dolch",
            Statistic::Skewness => "skewness",
            Statistic::Kurtosis => "kurtosis",
        }
    }

    /// Look a statistic up by its key.
    pub fn from_key(key: &str) -> Option<Statistic> {
        Statistic::ALL.into_iter().find(|stat| stat.key() == key)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The complete 18-statistic summary of a numeric sequence.
///
/// Backed by a fixed array, so a record can never be partial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateRecord {
    values: [f64; Statistic::COUNT],
}

impl AggregateRecord {
    /// The all-zero record reported for an empty sequence.
    pub fn zeros() -> Self {
        AggregateRecord {
            values: [0.0; Statistic::COUNT],
        }
    }

    pub fn get(&self, stat: Statistic) -> f64 {
        self.values[stat.index()]
    }

    fn set(&mut self, stat: Statistic, value: f64) {
        self.values[stat.index()] = finite_or_zero(value);
    }

    /// Iterate statistics and values in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Statistic, f64)> + '_ {
        Statistic::ALL
            .iter()
            .map(move |stat| (*stat, self.values[stat.index()]))
    }
}

impl Index<Statistic> for AggregateRecord {
    type Output = f64;

    fn index(&self, stat: Statistic) -> &f64 {
        &self.values[stat.index()]
    }
}

/// Outcome of a higher-moment computation.
///
/// `Degenerate` covers inputs for which the moment is undefined (too few
/// values, zero spread, non-finite intermediate). It is reported as `0.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Moment {
    Value(f64),
    Degenerate,
}

impl Moment {
    pub fn value_or_zero(self) -> f64 {
        match self {
            Moment::Value(v) if v.is_finite() => v,
            _ => 0.0,
        }
    }
}

/// Summarise `values` into the 18 statistics.
pub fn aggregate(values: &[f64]) -> AggregateRecord {
    if values.is_empty() {
        return AggregateRecord::zeros();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let sum: f64 = values.iter().sum();
    let avg = sum / n as f64;

    let median = percentile(&sorted, 50.0);
    let q1 = percentile(&sorted, 25.0);
    let q3 = percentile(&sorted, 75.0);
    let p80 = percentile(&sorted, 80.0);
    let p90 = percentile(&sorted, 90.0);

    let (var, std) = if n > 1 {
        let var = sample_variance(values, avg);
        (var, var.sqrt())
    } else {
        (0.0, 0.0)
    };

    let rsd = if avg != 0.0 { std / avg } else { 0.0 };

    let (skewness, kurtosis) = if n > 2 {
        (skewness(values, avg), kurtosis(values, avg))
    } else {
        (Moment::Degenerate, Moment::Degenerate)
    };

    let mut record = AggregateRecord::zeros();
    record.set(Statistic::Sum, sum);
    record.set(Statistic::Min, sorted[0]);
    record.set(Statistic::Max, sorted[n - 1]);
    record.set(Statistic::Len, n as f64);
    record.set(Statistic::Median, median);
    record.set(Statistic::Q1, q1);
    record.set(Statistic::Q3, q3);
    record.set(Statistic::P80, p80);
    record.set(Statistic::P90, p90);
    record.set(Statistic::Avg, avg);
    record.set(Statistic::Mode, mode(&sorted));
    record.set(Statistic::Var, var);
    record.set(Statistic::Std, std);
    record.set(Statistic::Rsd, rsd);
    record.set(Statistic::Iqr, q3 - q1);
    record.set(Statistic::Dolch, p90 - median);
    record.set(Statistic::Skewness, skewness.value_or_zero());
    record.set(Statistic::Kurtosis, kurtosis.value_or_zero());
    record
}

/// Aggregate `values` and name every statistic `{tag}_{key}`.
pub fn aggregate_feature(tag: &str, values: &[f64]) -> FeatureRecord {
    let mut features = FeatureRecord::with_capacity(Statistic::COUNT);
    for (stat, value) in aggregate(values).iter() {
        features.insert(feature_name(tag, stat), value);
    }
    features
}

/// Convenience wrapper for count sequences.
pub fn aggregate_counts(tag: &str, counts: &[usize]) -> FeatureRecord {
    let values: Vec<f64> = counts.iter().map(|c| *c as f64).collect();
    aggregate_feature(tag, &values)
}

/// `{tag}_{key}`
pub fn feature_name(tag: &str, stat: Statistic) -> String {
    format!("{}_{}", tag, stat.key())
}

/// All 18 feature names for an aggregated tag, in canonical order.
pub fn feature_names(tag: &str) -> Vec<String> {
    Statistic::ALL
        .iter()
        .map(|stat| feature_name(tag, *stat))
        .collect()
}

/// Linear-interpolation percentile over an already sorted, non-empty slice.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lower_index = rank.floor() as usize;
    let upper_index = rank.ceil() as usize;
    let frac = rank - lower_index as f64;
    let lower = sorted[lower_index];
    let upper = sorted[upper_index];
    let diff = upper - lower;
    // Interpolate from the nearer end so frac = 1 - eps stays exact at `upper`.
    if frac >= 0.5 {
        upper - diff * (1.0 - frac)
    } else {
        lower + diff * frac
    }
}

/// Most frequent value of a sorted, non-empty slice. Runs are visited in
/// ascending order and only a strictly longer run replaces the current best,
/// so ties resolve to the smallest value.
fn mode(sorted: &[f64]) -> f64 {
    let mut best = sorted[0];
    let mut best_count = 0usize;
    let mut start = 0usize;
    while start < sorted.len() {
        let value = sorted[start];
        let mut end = start + 1;
        while end < sorted.len() && sorted[end].total_cmp(&value) == Ordering::Equal {
            end += 1;
        }
        if end - start > best_count {
            best = value;
            best_count = end - start;
        }
        start = end;
    }
    best
}

fn sample_variance(values: &[f64], mean: f64) -> f64 {
    let squares: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    squares / (values.len() - 1) as f64
}

/// Population central moments `(m2, m3, m4)`.
fn central_moments(values: &[f64], mean: f64) -> (f64, f64, f64) {
    let n = values.len() as f64;
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for v in values {
        let d = v - mean;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    (m2 / n, m3 / n, m4 / n)
}

fn is_zero_spread(m2: f64, mean: f64) -> bool {
    m2 <= (MOMENT_RESOLUTION * mean).powi(2)
}

/// Bias-corrected (sample-adjusted Fisher-Pearson) skewness.
pub fn skewness(values: &[f64], mean: f64) -> Moment {
    let n = values.len() as f64;
    if values.len() <= 2 {
        return Moment::Degenerate;
    }
    let (m2, m3, _) = central_moments(values, mean);
    if is_zero_spread(m2, mean) {
        return Moment::Degenerate;
    }
    let g1 = m3 / m2.powf(1.5);
    Moment::Value((n * (n - 1.0)).sqrt() / (n - 2.0) * g1)
}

/// Bias-corrected excess kurtosis.
///
/// The correction needs four values; with exactly three the biased excess
/// kurtosis `m4 / m2^2 - 3` is reported instead.
pub fn kurtosis(values: &[f64], mean: f64) -> Moment {
    let n = values.len() as f64;
    if values.len() <= 2 {
        return Moment::Degenerate;
    }
    let (m2, _, m4) = central_moments(values, mean);
    if is_zero_spread(m2, mean) {
        return Moment::Degenerate;
    }
    let g2 = m4 / (m2 * m2);
    if values.len() > 3 {
        let corrected =
            ((n * n - 1.0) * g2 - 3.0 * (n - 1.0) * (n - 1.0)) / ((n - 2.0) * (n - 3.0));
        Moment::Value(corrected)
    } else {
        Moment::Value(g2 - 3.0)
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
