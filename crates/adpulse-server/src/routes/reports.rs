use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use chrono::Duration;
use serde::Deserialize;
use serde_json::json;

use adpulse_core::reporting::{build_daily_report, build_weekly_report, DateRange};
use adpulse_core::week::week_bounds;

use crate::routes::parse_date;
use crate::{error::AppError, state::AppState};

/// Days of history fetched for the trailing-average baseline.
const DAILY_REPORT_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Deserialize)]
pub struct DailyReportQuery {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WeeklyReportQuery {
    pub offset: Option<i64>,
}

/// `GET /api/reports/daily?date=` — per-client daily performance.
///
/// Each row compares the day's amount against the trailing average of
/// the preceding window (weekends and zero days excluded); cohorts
/// classify the two most recent data days.
pub async fn daily_report(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DailyReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let date = match query.date.as_deref() {
        Some(raw) => parse_date(raw, "date")?,
        None => state.week_reference_date().await,
    };

    let range = DateRange {
        start: date - Duration::days(DAILY_REPORT_WINDOW_DAYS - 1),
        end: date,
    };
    let series = state
        .store
        .fetch_daily_series(range)
        .await
        .map_err(AppError::Internal)?;

    let report = build_daily_report(date, &series);
    Ok(Json(json!({ "data": report })))
}

/// `GET /api/reports/weekly?offset=` — week-over-week performance.
///
/// `offset` is relative to the current week (0 = this week, -1 = last
/// week), where "current" follows the configured week basis.
pub async fn weekly_report(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WeeklyReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let offset = query.offset.unwrap_or(0);
    let reference = state.week_reference_date().await;

    let week = week_bounds(reference, offset);
    let prior_week = week_bounds(reference, offset - 1);

    // Index 0 = the requested week, index 1 = the week before it.
    let series = state
        .store
        .fetch_weekly_series(week.start_date, 2)
        .await
        .map_err(AppError::Internal)?;

    let report = build_weekly_report(week, prior_week, &series);
    Ok(Json(json!({ "data": report })))
}
