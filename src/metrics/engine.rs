//! Metrics engine
//!
//! Aggregates a loaded dataset in a fixed order:
//!
//! 1. total record count
//! 2. category distribution
//! 3. most common category (ties go to the first category encountered)
//! 4. descriptive stats for disease percentage, green area and spot area
//! 5. timestamp parsing (rows that fail are left out of steps 6-8 only)
//! 6. records per calendar day
//! 7. mean disease percentage per calendar day
//! 8. records in the last 7 days
//!
//! Calendar days are taken from the stored local timestamp as written. An
//! empty dataset yields [`MetricsOutcome::Empty`], never zeros.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::describe::{describe, round2, DescriptiveStats};
use super::errors::{MetricsError, MetricsResult};
use crate::storage::Record;

/// Aggregate statistics over a non-empty dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub total_records: usize,
    pub category_distribution: BTreeMap<String, usize>,
    pub most_common_category: Option<String>,
    pub disease_stats: DescriptiveStats,
    pub green_area_stats: DescriptiveStats,
    pub spot_area_stats: DescriptiveStats,
    pub records_per_day: BTreeMap<NaiveDate, usize>,
    pub mean_disease_per_day: BTreeMap<NaiveDate, f64>,
    pub records_last_7_days: usize,
}

/// Result of a metrics run.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricsOutcome {
    /// The dataset holds no records.
    Empty,
    Computed(Metrics),
}

/// Computes metrics relative to `now` (local wall-clock time).
pub fn compute_at(records: &[Record], now: NaiveDateTime) -> MetricsResult<MetricsOutcome> {
    if records.is_empty() {
        return Ok(MetricsOutcome::Empty);
    }

    let total_records = records.len();

    let (category_distribution, most_common_category) = categories(records);

    let disease_stats = column_stats(records, "porcentagem_doenca_folha", |r| {
        r.disease_percentage
    })?;
    let green_area_stats = column_stats(records, "area_verde_pixels", |r| r.green_area_pixels)?;
    let spot_area_stats = column_stats(records, "area_manchas_pixels", |r| r.spot_area_pixels)?;

    let timed: Vec<(NaiveDateTime, &Record)> = records
        .iter()
        .filter_map(|r| parse_recorded_at(&r.recorded_at).map(|ts| (ts, r)))
        .collect();

    let mut records_per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    let mut disease_sums: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (ts, record) in &timed {
        let day = ts.date();
        *records_per_day.entry(day).or_insert(0) += 1;
        *disease_sums.entry(day).or_insert(0.0) += record.disease_percentage;
    }

    let mean_disease_per_day = disease_sums
        .into_iter()
        .map(|(day, sum)| {
            let count = records_per_day.get(&day).copied().unwrap_or(1);
            (day, round2(sum / count as f64))
        })
        .collect();

    let window_start = now
        .checked_sub_signed(Duration::days(7))
        .ok_or(MetricsError::ClockOverflow(now))?;
    let records_last_7_days = timed.iter().filter(|(ts, _)| *ts >= window_start).count();

    Ok(MetricsOutcome::Computed(Metrics {
        total_records,
        category_distribution,
        most_common_category,
        disease_stats,
        green_area_stats,
        spot_area_stats,
        records_per_day,
        mean_disease_per_day,
        records_last_7_days,
    }))
}

/// Counts categories and picks the most common one.
///
/// Empty category cells are not counted. Ties are broken by first
/// appearance in file order.
fn categories(records: &[Record]) -> (BTreeMap<String, usize>, Option<String>) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();

    for record in records {
        let category = record.detected_category.as_str();
        if category.is_empty() {
            continue;
        }
        let count = counts.entry(category).or_insert(0);
        if *count == 0 {
            first_seen.push(category);
        }
        *count += 1;
    }

    let mut most_common: Option<(&str, usize)> = None;
    for &category in &first_seen {
        let count = counts[category];
        match most_common {
            Some((_, best)) if best >= count => {}
            _ => most_common = Some((category, count)),
        }
    }

    let distribution = counts
        .into_iter()
        .map(|(category, count)| (category.to_string(), count))
        .collect();

    (distribution, most_common.map(|(c, _)| c.to_string()))
}

fn column_stats(
    records: &[Record],
    column: &'static str,
    value: impl Fn(&Record) -> f64,
) -> MetricsResult<DescriptiveStats> {
    let mut values = Vec::with_capacity(records.len());
    for record in records {
        let v = value(record);
        if !v.is_finite() {
            return Err(MetricsError::NonFiniteValue {
                column,
                id: record.id,
            });
        }
        values.push(v);
    }
    describe(&values).ok_or(MetricsError::EmptyColumn(column))
}

/// Parses a stored `recorded_at` value into local wall-clock time.
///
/// Accepts ISO-8601 with `T` or space separator and optional fraction,
/// RFC 3339 with an offset (converted to local time), and a bare date
/// (midnight). Anything else is `None`.
pub fn parse_recorded_at(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Some(ts);
        }
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Local).naive_local());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn record(id: u64, category: &str, disease: f64, recorded_at: &str) -> Record {
        Record {
            id,
            image_name: format!("leaf_{}.jpg", id),
            detected_category: category.to_string(),
            green_area_pixels: 1000.0 - disease * 10.0,
            spot_area_pixels: disease * 10.0,
            disease_percentage: disease,
            recorded_at: recorded_at.to_string(),
        }
    }

    fn computed(outcome: MetricsOutcome) -> Metrics {
        match outcome {
            MetricsOutcome::Computed(m) => m,
            MetricsOutcome::Empty => panic!("expected computed metrics"),
        }
    }

    #[test]
    fn test_empty_dataset_is_sentinel() {
        assert_eq!(compute_at(&[], ts(2024, 1, 1, 0)).unwrap(), MetricsOutcome::Empty);
    }

    #[test]
    fn test_category_distribution_and_mode() {
        let records = vec![
            record(1, "sadia", 0.0, "2024-01-01T10:00:00"),
            record(2, "ferrugem", 10.0, "2024-01-01T11:00:00"),
            record(3, "ferrugem", 20.0, "2024-01-02T09:00:00"),
            record(4, "sadia", 0.0, "2024-01-02T10:00:00"),
            record(5, "oidio", 5.0, "2024-01-02T11:00:00"),
        ];
        let m = computed(compute_at(&records, ts(2024, 1, 3, 0)).unwrap());

        assert_eq!(m.total_records, 5);
        assert_eq!(m.category_distribution["sadia"], 2);
        assert_eq!(m.category_distribution["ferrugem"], 2);
        assert_eq!(m.category_distribution["oidio"], 1);
        // tie between sadia and ferrugem: sadia appeared first
        assert_eq!(m.most_common_category.as_deref(), Some("sadia"));
    }

    #[test]
    fn test_mode_prefers_strict_majority_over_first_seen() {
        let records = vec![
            record(1, "sadia", 0.0, ""),
            record(2, "ferrugem", 0.0, ""),
            record(3, "ferrugem", 0.0, ""),
        ];
        let m = computed(compute_at(&records, ts(2024, 1, 1, 0)).unwrap());
        assert_eq!(m.most_common_category.as_deref(), Some("ferrugem"));
    }

    #[test]
    fn test_mode_absent_when_no_categories() {
        let records = vec![record(1, "", 0.0, ""), record(2, "", 1.0, "")];
        let m = computed(compute_at(&records, ts(2024, 1, 1, 0)).unwrap());
        assert!(m.category_distribution.is_empty());
        assert_eq!(m.most_common_category, None);
    }

    #[test]
    fn test_per_day_grouping() {
        let records = vec![
            record(1, "a", 10.0, "2024-01-01T10:00:00.000000"),
            record(2, "a", 25.0, "2024-01-01T23:59:59.999999"),
            record(3, "a", 7.5, "2024-01-02T00:00:00.000000"),
        ];
        let m = computed(compute_at(&records, ts(2024, 1, 3, 0)).unwrap());

        let jan1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let jan2 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(m.records_per_day[&jan1], 2);
        assert_eq!(m.records_per_day[&jan2], 1);
        assert_eq!(m.mean_disease_per_day[&jan1], 17.5);
        assert_eq!(m.mean_disease_per_day[&jan2], 7.5);
    }

    #[test]
    fn test_unparseable_timestamps_excluded_from_time_aggregates_only() {
        let records = vec![
            record(1, "a", 10.0, "2024-01-01T10:00:00"),
            record(2, "a", 30.0, "not a date"),
            record(3, "a", 20.0, ""),
        ];
        let m = computed(compute_at(&records, ts(2024, 1, 2, 0)).unwrap());

        assert_eq!(m.total_records, 3);
        assert_eq!(m.disease_stats.count, 3);
        assert_eq!(m.disease_stats.mean, 20.0);
        assert_eq!(m.records_per_day.values().sum::<usize>(), 1);
        assert_eq!(m.records_last_7_days, 1);
    }

    #[test]
    fn test_last_seven_days_window_is_inclusive() {
        let now = ts(2024, 3, 10, 12);
        let records = vec![
            record(1, "a", 0.0, "2024-03-03T12:00:00"),
            record(2, "a", 0.0, "2024-03-03T11:59:59"),
            record(3, "a", 0.0, "2024-03-10T08:00:00"),
            record(4, "a", 0.0, "2024-02-01T08:00:00"),
        ];
        let m = computed(compute_at(&records, now).unwrap());
        assert_eq!(m.records_last_7_days, 2);
    }

    #[test]
    fn test_stats_per_column() {
        let records = vec![
            record(1, "a", 0.0, ""),
            record(2, "a", 50.0, ""),
            record(3, "a", 100.0, ""),
        ];
        let m = computed(compute_at(&records, ts(2024, 1, 1, 0)).unwrap());

        assert_eq!(m.disease_stats.count, 3);
        assert_eq!(m.disease_stats.mean, 50.0);
        assert_eq!(m.disease_stats.std, Some(50.0));
        assert_eq!(m.disease_stats.p25, 25.0);
        assert_eq!(m.spot_area_stats.max, 1000.0);
        assert_eq!(m.green_area_stats.min, 0.0);
    }

    #[test]
    fn test_non_finite_value_is_error() {
        let mut bad = record(2, "a", 0.0, "");
        bad.green_area_pixels = f64::NAN;
        let records = vec![record(1, "a", 0.0, ""), bad];

        let err = compute_at(&records, ts(2024, 1, 1, 0)).unwrap_err();
        assert_eq!(
            err,
            MetricsError::NonFiniteValue {
                column: "area_verde_pixels",
                id: 2
            }
        );
    }

    #[test]
    fn test_window_underflow_is_error() {
        let records = vec![record(1, "a", 0.0, "")];
        let err = compute_at(&records, NaiveDateTime::MIN).unwrap_err();
        assert!(matches!(err, MetricsError::ClockOverflow(_)));
    }

    #[test]
    fn test_parse_recorded_at_formats() {
        assert_eq!(
            parse_recorded_at("2024-01-05T10:00:00.123456").map(|t| t.date()),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
        assert_eq!(parse_recorded_at("2024-01-05 10:00:00"), Some(ts(2024, 1, 5, 10)));
        assert_eq!(parse_recorded_at("2024-01-05"), Some(ts(2024, 1, 5, 0)));
        assert!(parse_recorded_at("2024-01-05T10:00:00+00:00").is_some());
        assert_eq!(parse_recorded_at("05/01/2024"), None);
        assert_eq!(parse_recorded_at(""), None);
    }

    #[test]
    fn test_metrics_json_shape() {
        let records = vec![record(1, "sadia", 0.0, "2024-01-01T10:00:00")];
        let m = computed(compute_at(&records, ts(2024, 1, 2, 0)).unwrap());
        let json = serde_json::to_value(&m).unwrap();

        assert_eq!(json["total_records"], 1);
        assert_eq!(json["category_distribution"]["sadia"], 1);
        assert_eq!(json["most_common_category"], "sadia");
        assert_eq!(json["records_per_day"]["2024-01-01"], 1);
        assert_eq!(json["mean_disease_per_day"]["2024-01-01"], 0.0);
        assert!(json["disease_stats"]["std"].is_null());
        assert_eq!(json["records_last_7_days"], 1);
    }
}
