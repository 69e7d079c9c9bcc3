//! Reporting backend abstraction and report assembly.
//!
//! The store trait supplies freshly fetched row collections; the report
//! builders are pure functions over those rows. Handlers await a fetch,
//! then call the builders synchronously.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cohort::{classify, CohortSummary};
use crate::compare::{compare_amounts, compare_periods, trailing_average, ComparisonResult};
use crate::week::WeekBounds;

/// A client's revenue keyed by period index.
///
/// Index 0 is always the most recent period; indices absent from the map
/// read as zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodSeries {
    pub id: String,
    pub name: Option<String>,
    pub manager_id: Option<String>,
    pub amounts: BTreeMap<i64, f64>,
}

impl PeriodSeries {
    pub fn amount(&self, index: i64) -> f64 {
        self.amounts.get(&index).copied().unwrap_or(0.0)
    }
}

/// A client's revenue keyed by calendar date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySeries {
    pub id: String,
    pub name: Option<String>,
    pub manager_id: Option<String>,
    pub amounts: BTreeMap<NaiveDate, f64>,
}

impl DailySeries {
    pub fn amount(&self, date: NaiveDate) -> f64 {
        self.amounts.get(&date).copied().unwrap_or(0.0)
    }
}

/// One stored daily amount, as entered through the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmountRow {
    pub client_id: String,
    pub date: NaiveDate,
    pub amount: f64,
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyReportRow {
    pub client_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<String>,
    pub amount: f64,
    /// Trailing average of weekday, non-zero amounts (the comparison baseline).
    pub baseline: f64,
    pub comparison: ComparisonResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub rows: Vec<DailyReportRow>,
    pub total: ComparisonResult,
    pub cohorts: CohortSummary,
    pub transition: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeeklyReportRow {
    pub client_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<String>,
    pub comparison: ComparisonResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeeklyReport {
    pub week: WeekBounds,
    pub prior_week: WeekBounds,
    pub rows: Vec<WeeklyReportRow>,
    pub total: ComparisonResult,
    pub cohorts: CohortSummary,
    pub transition: String,
}

/// Storage interface for the reporting side: daily amounts in, row
/// collections out. The DuckDB implementation lives in `adpulse-duckdb`.
#[async_trait::async_trait]
pub trait ReportingStore: Send + Sync + 'static {
    /// Batch upsert; `(client_id, date)` conflicts overwrite the amount.
    async fn upsert_amounts(&self, rows: &[AmountRow]) -> anyhow::Result<()>;

    /// Per-client date→amount maps over `range`. Clients with no rows in
    /// the range are still returned (with empty maps) so reports cover
    /// the full roster.
    async fn fetch_daily_series(&self, range: DateRange) -> anyhow::Result<Vec<DailySeries>>;

    /// Per-client weekly totals for `weeks` consecutive Monday–Sunday
    /// weeks, index 0 = the week containing `reference`.
    async fn fetch_weekly_series(
        &self,
        reference: NaiveDate,
        weeks: u32,
    ) -> anyhow::Result<Vec<PeriodSeries>>;

    /// Most recent date with any stored amount, if the table is non-empty.
    async fn latest_amount_date(&self) -> anyhow::Result<Option<NaiveDate>>;

    /// Revenue summed over `range` for one client.
    async fn sum_amounts(&self, client_id: &str, range: DateRange) -> anyhow::Result<f64>;
}

/// The two most recent distinct dates ≤ `date` present anywhere in the
/// fetched window. A Monday report therefore compares against Friday when
/// weekends carry no rows.
fn last_two_dates(series: &[DailySeries], date: NaiveDate) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();
    for entry in series {
        dates.extend(entry.amounts.keys().copied().filter(|d| *d <= date));
    }
    let mut iter = dates.into_iter().rev();
    (iter.next(), iter.next())
}

/// Build the daily report for `date` from fetched series.
pub fn build_daily_report(date: NaiveDate, series: &[DailySeries]) -> DailyReport {
    let mut rows = Vec::with_capacity(series.len());
    let mut total_amount = 0.0;
    let mut total_baseline = 0.0;

    for entry in series {
        let amount = entry.amount(date);
        let baseline = trailing_average(&entry.amounts, date);
        total_amount += amount;
        total_baseline += baseline;
        rows.push(DailyReportRow {
            client_id: entry.id.clone(),
            name: entry.name.clone(),
            manager_id: entry.manager_id.clone(),
            amount,
            baseline,
            comparison: compare_amounts(amount, baseline),
        });
    }

    // Day-over-day cohorts over the two most recent dates with data.
    let (current_day, prior_day) = last_two_dates(series, date);
    let day_series: Vec<PeriodSeries> = series
        .iter()
        .map(|entry| PeriodSeries {
            id: entry.id.clone(),
            name: entry.name.clone(),
            manager_id: entry.manager_id.clone(),
            amounts: BTreeMap::from([
                (0, current_day.map(|d| entry.amount(d)).unwrap_or(0.0)),
                (1, prior_day.map(|d| entry.amount(d)).unwrap_or(0.0)),
            ]),
        })
        .collect();
    let cohorts = classify(&day_series, 0, 1);
    let transition = cohorts.transition_label();

    DailyReport {
        date,
        rows,
        total: compare_amounts(total_amount, total_baseline),
        cohorts,
        transition,
    }
}

/// Build the week-over-week report from fetched weekly series.
///
/// `week`/`prior_week` are the bounds the series were fetched for;
/// index 0 of each series is `week`, index 1 is `prior_week`.
pub fn build_weekly_report(
    week: WeekBounds,
    prior_week: WeekBounds,
    series: &[PeriodSeries],
) -> WeeklyReport {
    let mut rows = Vec::with_capacity(series.len());
    let mut total_current = 0.0;
    let mut total_prior = 0.0;

    for entry in series {
        total_current += entry.amount(0);
        total_prior += entry.amount(1);
        rows.push(WeeklyReportRow {
            client_id: entry.id.clone(),
            name: entry.name.clone(),
            manager_id: entry.manager_id.clone(),
            comparison: compare_periods(entry, 0, 1),
        });
    }

    let cohorts = classify(series, 0, 1);
    let transition = cohorts.transition_label();

    WeeklyReport {
        week,
        prior_week,
        rows,
        total: compare_amounts(total_current, total_prior),
        cohorts,
        transition,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::week::week_bounds;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("date")
    }

    fn daily(id: &str, amounts: &[(NaiveDate, f64)]) -> DailySeries {
        DailySeries {
            id: id.to_string(),
            name: Some(id.to_uppercase()),
            manager_id: None,
            amounts: amounts.iter().copied().collect(),
        }
    }

    #[test]
    fn daily_report_rows_compare_against_trailing_average() {
        // Mon–Wed of a week; report for Wednesday.
        let mon = date(2024, 5, 13);
        let tue = date(2024, 5, 14);
        let wed = date(2024, 5, 15);
        let series = vec![daily("cl_a", &[(mon, 100.0), (tue, 300.0), (wed, 400.0)])];

        let report = build_daily_report(wed, &series);
        assert_eq!(report.rows.len(), 1);
        let row = &report.rows[0];
        assert_eq!(row.amount, 400.0);
        assert_eq!(row.baseline, 200.0);
        assert_eq!(row.comparison.change_amount, 200.0);
        assert_eq!(row.comparison.ratio_label, "100.0");
    }

    #[test]
    fn daily_cohorts_skip_dateless_weekend_gap() {
        // Friday and Monday rows only; the Monday report classifies
        // Monday-vs-Friday, not Monday-vs-Sunday.
        let fri = date(2024, 5, 10);
        let mon = date(2024, 5, 13);
        let series = vec![
            daily("cl_up", &[(fri, 100.0), (mon, 150.0)]),
            daily("cl_gone", &[(fri, 80.0)]),
        ];

        let report = build_daily_report(mon, &series);
        assert_eq!(report.cohorts.rising.members.len(), 1);
        assert_eq!(report.cohorts.stopped.members.len(), 1);
        assert_eq!(report.cohorts.stopped.total_amount, 80.0);
        assert_eq!(report.transition, "2 → 1");
    }

    #[test]
    fn weekly_report_totals_and_cohorts() {
        let reference = date(2024, 5, 15);
        let week = week_bounds(reference, 0);
        let prior = week_bounds(reference, -1);
        let series = vec![
            PeriodSeries {
                id: "cl_a".to_string(),
                name: None,
                manager_id: None,
                amounts: BTreeMap::from([(0, 1500.0), (1, 1000.0)]),
            },
            PeriodSeries {
                id: "cl_b".to_string(),
                name: None,
                manager_id: None,
                amounts: BTreeMap::from([(0, 800.0)]),
            },
        ];

        let report = build_weekly_report(week, prior, &series);
        assert_eq!(report.total.current_amount, 2300.0);
        assert_eq!(report.total.prior_amount, 1000.0);
        assert_eq!(report.rows[0].comparison.ratio_label, "50.0");
        assert_eq!(report.cohorts.new.total_amount, 800.0);
        assert_eq!(report.transition, "1 → 2");
    }

    #[test]
    fn missing_period_indices_read_as_zero() {
        let series = PeriodSeries {
            id: "cl_a".to_string(),
            name: None,
            manager_id: None,
            amounts: BTreeMap::new(),
        };
        assert_eq!(series.amount(0), 0.0);
        assert_eq!(series.amount(7), 0.0);
    }
}
