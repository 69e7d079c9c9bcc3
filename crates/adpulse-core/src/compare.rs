//! Period-over-period comparison engine.
//!
//! Division by zero is not an error here: the ratio follows a three-way
//! policy (finite / infinite / zero) and every input produces a result.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::reporting::{DailySeries, PeriodSeries};

/// Derived comparison of two period amounts.
///
/// `ratio_value` is a finite percentage, `f64::INFINITY` (prior 0,
/// current > 0) or `0.0` (both zero). Non-finite values serialize as JSON
/// `null`; `ratio_label` is the display-authoritative field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub current_amount: f64,
    pub prior_amount: f64,
    pub change_amount: f64,
    pub ratio_value: f64,
    pub ratio_label: String,
}

/// Display form of a ratio: `"∞"` for the infinite sentinel, otherwise
/// the percentage rounded to one decimal place.
pub fn ratio_label(value: f64) -> String {
    if value.is_infinite() {
        "∞".to_string()
    } else {
        format!("{value:.1}")
    }
}

pub fn compare_amounts(current: f64, prior: f64) -> ComparisonResult {
    let ratio_value = if prior > 0.0 {
        (current / prior) * 100.0 - 100.0
    } else if current > 0.0 {
        f64::INFINITY
    } else {
        0.0
    };

    ComparisonResult {
        current_amount: current,
        prior_amount: prior,
        change_amount: current - prior,
        ratio_value,
        ratio_label: ratio_label(ratio_value),
    }
}

/// Compare two indices of a period series. Missing indices read as zero.
pub fn compare_periods(series: &PeriodSeries, current: i64, baseline: i64) -> ComparisonResult {
    compare_amounts(series.amount(current), series.amount(baseline))
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Mean of all non-zero weekday amounts on dates other than `current_date`.
///
/// An empty baseline set yields `0.0`, which the ratio policy then treats
/// as a zero baseline.
pub fn trailing_average(amounts: &BTreeMap<NaiveDate, f64>, current_date: NaiveDate) -> f64 {
    let mut sum = 0.0;
    let mut count = 0u32;
    for (&date, &amount) in amounts {
        if date == current_date || is_weekend(date) || amount == 0.0 {
            continue;
        }
        sum += amount;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / f64::from(count)
    }
}

/// Compare a date's amount against the trailing-average baseline of the
/// rest of the series.
pub fn compare_to_trailing_average(
    series: &DailySeries,
    current_date: NaiveDate,
) -> ComparisonResult {
    let baseline = trailing_average(&series.amounts, current_date);
    compare_amounts(series.amount(current_date), baseline)
}
