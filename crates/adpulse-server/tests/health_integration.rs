use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use adpulse_core::config::{Config, WeekBasis};
use adpulse_duckdb::DuckDbBackend;
use adpulse_server::app::build_app;
use adpulse_server::state::AppState;

fn config() -> Config {
    Config {
        port: 0,
        data_dir: "/tmp/adpulse-test".to_string(),
        cors_origins: vec![],
        duckdb_memory_limit: "1GB".to_string(),
        week_basis: WeekBasis::WallClock,
    }
}

async fn setup() -> (Arc<AppState>, axum::Router) {
    let db = DuckDbBackend::open_in_memory().expect("in-memory DuckDB");
    let state = Arc::new(AppState::new(db, config()));
    let app = build_app(Arc::clone(&state));
    (state, app)
}

#[tokio::test]
async fn health_returns_ok_with_version() {
    let (_state, app) = setup().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("request");

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    let json: Value = serde_json::from_slice(&bytes).expect("parse JSON");
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}
