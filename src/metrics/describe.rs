//! Descriptive statistics over one numeric column
//!
//! Matches the usual dataframe `describe()` output: sample standard
//! deviation (n - 1 denominator) and percentiles by linear interpolation
//! between closest ranks. Float outputs are rounded to 2 decimals.

use serde::{Deserialize, Serialize};

/// count, mean, std, min, quartiles, max
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    /// `None` when fewer than two values exist.
    pub std: Option<f64>,
    pub min: f64,
    #[serde(rename = "25%")]
    pub p25: f64,
    #[serde(rename = "50%")]
    pub p50: f64,
    #[serde(rename = "75%")]
    pub p75: f64,
    pub max: f64,
}

/// Rounds to 2 decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Computes descriptive statistics. Returns `None` for an empty slice.
///
/// Callers must pass finite values only.
pub fn describe(values: &[f64]) -> Option<DescriptiveStats> {
    if values.is_empty() {
        return None;
    }

    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;

    let std = if n > 1 {
        let sum_sq: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
        Some(round2((sum_sq / (n - 1) as f64).sqrt()))
    } else {
        None
    };

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    Some(DescriptiveStats {
        count: n,
        mean: round2(mean),
        std,
        min: round2(sorted[0]),
        p25: round2(percentile(&sorted, 0.25)),
        p50: round2(percentile(&sorted, 0.50)),
        p75: round2(percentile(&sorted, 0.75)),
        max: round2(sorted[n - 1]),
    })
}

/// Linear-interpolated percentile over a sorted, non-empty slice.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let fraction = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_none() {
        assert!(describe(&[]).is_none());
    }

    #[test]
    fn test_single_value() {
        let stats = describe(&[42.0]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.mean, 42.0);
        assert_eq!(stats.std, None);
        assert_eq!(stats.min, 42.0);
        assert_eq!(stats.p50, 42.0);
        assert_eq!(stats.max, 42.0);
    }

    #[test]
    fn test_quartiles_interpolate() {
        // 1..=4: positions 0.75, 1.5, 2.25
        let stats = describe(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.p25, 1.75);
        assert_eq!(stats.p50, 2.5);
        assert_eq!(stats.p75, 3.25);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.mean, 2.5);
        // sample std of 1,2,3,4 = sqrt(5/3)
        assert_eq!(stats.std, Some(1.29));
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        let stats = describe(&[0.1, 0.2, 0.4]).unwrap();
        assert_eq!(stats.mean, 0.23);
        assert_eq!(stats.p25, 0.15);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(12.0), 12.0);
        assert_eq!(round2(2.345678), 2.35);
        assert_eq!(round2(-2.345678), -2.35);
    }

    #[test]
    fn test_serializes_with_percent_keys() {
        let stats = describe(&[1.0, 2.0]).unwrap();
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["count"], 2);
        assert_eq!(json["25%"], 1.25);
        assert_eq!(json["50%"], 1.5);
        assert_eq!(json["75%"], 1.75);
    }
}
