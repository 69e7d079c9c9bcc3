use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{Duration, NaiveDate};

use adpulse_core::reporting::{AmountRow, DailySeries, DateRange, PeriodSeries};
use adpulse_core::week::monday_of;

use crate::queries::parse_date_col;
use crate::DuckDbBackend;

fn date_param(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub async fn upsert_amounts_inner(db: &DuckDbBackend, rows: &[AmountRow]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }

    let mut conn = db.conn.lock().await;
    // One transaction per batch: atomic and one fsync instead of N.
    let tx = conn.transaction()?;
    for row in rows {
        tx.execute(
            "INSERT INTO daily_amounts (client_id, date, amount, updated_at) \
             VALUES (?1, ?2, ?3, CURRENT_TIMESTAMP) \
             ON CONFLICT (client_id, date) DO UPDATE \
             SET amount = EXCLUDED.amount, updated_at = CURRENT_TIMESTAMP",
            duckdb::params![row.client_id, date_param(row.date), row.amount],
        )?;
    }
    tx.commit()?;
    tracing::info!("Upserted {} daily amounts", rows.len());
    Ok(())
}

/// Per-client rows over `range`, one `DailySeries` per client.
///
/// LEFT JOIN from `clients` so clients without rows in the range still
/// appear with an empty map; reports cover the full roster.
pub async fn fetch_daily_series_inner(
    db: &DuckDbBackend,
    range: DateRange,
) -> Result<Vec<DailySeries>> {
    let conn = db.conn.lock().await;

    let mut stmt = conn.prepare(
        "SELECT c.id, c.name, c.manager_id, CAST(d.date AS VARCHAR), d.amount \
         FROM clients c \
         LEFT JOIN daily_amounts d \
           ON d.client_id = c.id AND d.date >= ?1 AND d.date <= ?2 \
         ORDER BY c.id",
    )?;
    let rows = stmt.query_map(
        duckdb::params![date_param(range.start), date_param(range.end)],
        |row| {
            let id: String = row.get(0)?;
            let name: String = row.get(1)?;
            let manager_id: Option<String> = row.get(2)?;
            let date: Option<String> = row.get(3)?;
            let amount: Option<f64> = row.get(4)?;
            let date = date.as_deref().map(parse_date_col).transpose()?;
            Ok((id, name, manager_id, date, amount))
        },
    )?;

    let mut series: Vec<DailySeries> = Vec::new();
    for row in rows {
        let (id, name, manager_id, date, amount) = row?;
        if series.last().map(|s: &DailySeries| s.id.as_str()) != Some(id.as_str()) {
            series.push(DailySeries {
                id,
                name: Some(name),
                manager_id,
                amounts: BTreeMap::new(),
            });
        }
        if let (Some(date), Some(amount), Some(entry)) = (date, amount, series.last_mut()) {
            entry.amounts.insert(date, amount);
        }
    }
    Ok(series)
}

/// Per-client weekly totals for `weeks` consecutive Monday–Sunday weeks,
/// index 0 = the week containing `reference`.
///
/// The week bucketing runs in Rust via [`monday_of`] so the SQL stays a
/// plain range scan.
pub async fn fetch_weekly_series_inner(
    db: &DuckDbBackend,
    reference: NaiveDate,
    weeks: u32,
) -> Result<Vec<PeriodSeries>> {
    let weeks = weeks.max(1);
    let current_monday = monday_of(reference);
    let range = DateRange {
        start: current_monday - Duration::days(7 * i64::from(weeks - 1)),
        end: current_monday + Duration::days(6),
    };

    let daily = fetch_daily_series_inner(db, range).await?;
    let series = daily
        .into_iter()
        .map(|entry| {
            let mut amounts: BTreeMap<i64, f64> = BTreeMap::new();
            for (date, amount) in entry.amounts {
                let index = (current_monday - monday_of(date)).num_days() / 7;
                *amounts.entry(index).or_insert(0.0) += amount;
            }
            PeriodSeries {
                id: entry.id,
                name: entry.name,
                manager_id: entry.manager_id,
                amounts,
            }
        })
        .collect();
    Ok(series)
}

pub async fn latest_amount_date_inner(db: &DuckDbBackend) -> Result<Option<NaiveDate>> {
    let conn = db.conn.lock().await;
    let raw: Option<String> = conn
        .prepare("SELECT CAST(MAX(date) AS VARCHAR) FROM daily_amounts")?
        .query_row([], |row| row.get(0))?;
    Ok(raw.as_deref().map(parse_date_col).transpose()?)
}

pub async fn sum_amounts_inner(
    db: &DuckDbBackend,
    client_id: &str,
    range: DateRange,
) -> Result<f64> {
    let conn = db.conn.lock().await;
    let sum: f64 = conn
        .prepare(
            "SELECT COALESCE(SUM(amount), 0) FROM daily_amounts \
             WHERE client_id = ?1 AND date >= ?2 AND date <= ?3",
        )?
        .query_row(
            duckdb::params![client_id, date_param(range.start), date_param(range.end)],
            |row| row.get(0),
        )?;
    Ok(sum)
}
