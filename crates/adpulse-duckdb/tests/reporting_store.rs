use std::sync::Arc;

use chrono::NaiveDate;

use adpulse_core::reporting::{AmountRow, DateRange, ReportingStore};
use adpulse_metadata::{CreateClientParams, DirectoryStore};
use adpulse_duckdb::DuckDbBackend;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("date")
}

async fn seed_client(db: &DuckDbBackend, name: &str) -> String {
    db.create_client(CreateClientParams {
        name: name.to_string(),
        manager_id: None,
    })
    .await
    .expect("create client")
    .id
}

#[tokio::test]
async fn upsert_overwrites_same_client_and_date() {
    let db = DuckDbBackend::open_in_memory().expect("db");
    let client_id = seed_client(&db, "Acme").await;

    let day = date(2024, 5, 13);
    db.upsert_amounts(&[AmountRow {
        client_id: client_id.clone(),
        date: day,
        amount: 100.0,
    }])
    .await
    .expect("insert");
    db.upsert_amounts(&[AmountRow {
        client_id: client_id.clone(),
        date: day,
        amount: 250.0,
    }])
    .await
    .expect("upsert");

    let range = DateRange {
        start: day,
        end: day,
    };
    let series = db.fetch_daily_series(range).await.expect("series");
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].amount(day), 250.0);

    let sum = db.sum_amounts(&client_id, range).await.expect("sum");
    assert_eq!(sum, 250.0);
}

#[tokio::test]
async fn daily_series_includes_clients_without_rows() {
    let db = DuckDbBackend::open_in_memory().expect("db");
    let active = seed_client(&db, "Active").await;
    let idle = seed_client(&db, "Idle").await;

    db.upsert_amounts(&[AmountRow {
        client_id: active.clone(),
        date: date(2024, 5, 14),
        amount: 500.0,
    }])
    .await
    .expect("insert");

    let series = db
        .fetch_daily_series(DateRange {
            start: date(2024, 5, 13),
            end: date(2024, 5, 19),
        })
        .await
        .expect("series");

    assert_eq!(series.len(), 2);
    let idle_series = series.iter().find(|s| s.id == idle).expect("idle series");
    assert!(idle_series.amounts.is_empty());
    let active_series = series.iter().find(|s| s.id == active).expect("active series");
    assert_eq!(active_series.amount(date(2024, 5, 14)), 500.0);
}

#[tokio::test]
async fn weekly_series_buckets_by_monday_anchored_week() {
    let db = DuckDbBackend::open_in_memory().expect("db");
    let client_id = seed_client(&db, "Acme").await;

    // Current week (of Wed 2024-05-15): Mon 13th + Sun 19th.
    // Prior week: Tue 7th. Two weeks back: Mon 2024-04-29.
    db.upsert_amounts(&[
        AmountRow {
            client_id: client_id.clone(),
            date: date(2024, 5, 13),
            amount: 100.0,
        },
        AmountRow {
            client_id: client_id.clone(),
            date: date(2024, 5, 19),
            amount: 50.0,
        },
        AmountRow {
            client_id: client_id.clone(),
            date: date(2024, 5, 7),
            amount: 200.0,
        },
        AmountRow {
            client_id: client_id.clone(),
            date: date(2024, 4, 29),
            amount: 40.0,
        },
    ])
    .await
    .expect("insert");

    let series = db
        .fetch_weekly_series(date(2024, 5, 15), 3)
        .await
        .expect("series");
    assert_eq!(series.len(), 1);
    let entry = &series[0];
    assert_eq!(entry.amount(0), 150.0);
    assert_eq!(entry.amount(1), 200.0);
    assert_eq!(entry.amount(2), 40.0);
}

#[tokio::test]
async fn weekly_series_excludes_rows_outside_requested_weeks() {
    let db = DuckDbBackend::open_in_memory().expect("db");
    let client_id = seed_client(&db, "Acme").await;

    db.upsert_amounts(&[
        AmountRow {
            client_id: client_id.clone(),
            date: date(2024, 5, 15),
            amount: 100.0,
        },
        // Three weeks before the reference week; outside a 2-week fetch.
        AmountRow {
            client_id: client_id.clone(),
            date: date(2024, 4, 24),
            amount: 999.0,
        },
    ])
    .await
    .expect("insert");

    let series = db
        .fetch_weekly_series(date(2024, 5, 15), 2)
        .await
        .expect("series");
    let entry = &series[0];
    assert_eq!(entry.amount(0), 100.0);
    assert_eq!(entry.amount(1), 0.0);
    assert_eq!(entry.amounts.len(), 1);
}

#[tokio::test]
async fn latest_amount_date_tracks_max_row() {
    let db = DuckDbBackend::open_in_memory().expect("db");
    assert!(db.latest_amount_date().await.expect("empty").is_none());

    let client_id = seed_client(&db, "Acme").await;
    db.upsert_amounts(&[
        AmountRow {
            client_id: client_id.clone(),
            date: date(2024, 5, 13),
            amount: 1.0,
        },
        AmountRow {
            client_id,
            date: date(2024, 5, 17),
            amount: 2.0,
        },
    ])
    .await
    .expect("insert");

    assert_eq!(
        db.latest_amount_date().await.expect("latest"),
        Some(date(2024, 5, 17))
    );
}

#[tokio::test]
async fn stores_work_through_dyn_dispatch() {
    let db = Arc::new(DuckDbBackend::open_in_memory().expect("db"));

    let directory: Arc<dyn DirectoryStore> = db.clone();
    let client = directory
        .create_client(CreateClientParams {
            name: "Acme".to_string(),
            manager_id: None,
        })
        .await
        .expect("create");

    let store: Arc<dyn ReportingStore> = db.clone();
    store
        .upsert_amounts(&[AmountRow {
            client_id: client.id,
            date: date(2024, 5, 13),
            amount: 10.0,
        }])
        .await
        .expect("upsert");

    assert_eq!(
        store.latest_amount_date().await.expect("latest"),
        Some(date(2024, 5, 13))
    );
}
