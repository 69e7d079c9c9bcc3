use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
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

async fn json_body(response: axum::http::Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("parse JSON")
}

async fn post_json(app: &axum::Router, uri: &str, body: Value) -> axum::http::Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request");
    app.clone().oneshot(request).await.expect("request")
}

async fn create_manager(app: &axum::Router, name: &str) -> String {
    let response = post_json(app, "/api/managers", json!({ "name": name })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = json_body(response).await;
    json["data"]["id"].as_str().expect("id").to_string()
}

async fn create_client(app: &axum::Router, name: &str) -> String {
    let response = post_json(app, "/api/clients", json!({ "name": name })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = json_body(response).await;
    json["data"]["id"].as_str().expect("id").to_string()
}

#[tokio::test]
async fn client_crud_round_trip() {
    let (_state, app) = setup().await;

    let client_id = create_client(&app, "Acme").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/clients")
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["data"].as_array().expect("array").len(), 1);
    assert_eq!(json["data"][0]["name"], "Acme");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/clients/{client_id}"))
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/clients/{client_id}"))
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_client_name_is_unprocessable() {
    let (_state, app) = setup().await;

    let response = post_json(&app, "/api/clients", json!({ "name": "  " })).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "validation_error");
    assert_eq!(json["error"]["field"], "name");
}

#[tokio::test]
async fn manager_assignment_and_null_unassignment() {
    let (_state, app) = setup().await;

    let manager_id = create_manager(&app, "Kim").await;
    let client_id = create_client(&app, "Acme").await;

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/clients/{client_id}"))
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "manager_id": manager_id }).to_string(),
        ))
        .expect("build request");
    let response = app.clone().oneshot(request).await.expect("request");
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["data"]["manager_id"], manager_id.as_str());

    // Explicit null clears the assignment.
    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/clients/{client_id}"))
        .header("content-type", "application/json")
        .body(Body::from(json!({ "manager_id": null }).to_string()))
        .expect("build request");
    let response = app.clone().oneshot(request).await.expect("request");
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert!(json["data"]["manager_id"].is_null());
}

#[tokio::test]
async fn assigning_unknown_manager_is_rejected() {
    let (_state, app) = setup().await;
    let client_id = create_client(&app, "Acme").await;

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/clients/{client_id}"))
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "manager_id": "mgr_missing" }).to_string(),
        ))
        .expect("build request");
    let response = app.oneshot(request).await.expect("request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_manager_unassigns_their_clients() {
    let (_state, app) = setup().await;

    let manager_id = create_manager(&app, "Kim").await;
    let response = post_json(
        &app,
        "/api/clients",
        json!({ "name": "Acme", "manager_id": manager_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let client_id = json_body(response).await["data"]["id"]
        .as_str()
        .expect("id")
        .to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/managers/{manager_id}"))
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/clients/{client_id}"))
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("request");
    let json = json_body(response).await;
    assert!(json["data"]["manager_id"].is_null());
}

#[tokio::test]
async fn action_item_lifecycle() {
    let (_state, app) = setup().await;
    let client_id = create_client(&app, "Acme").await;

    let response = post_json(
        &app,
        "/api/action-items",
        json!({
            "client_id": client_id,
            "title": "Kickoff call",
            "due_date": "2024-05-17"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let item_id = json_body(response).await["data"]["id"]
        .as_str()
        .expect("id")
        .to_string();

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/action-items/{item_id}"))
        .header("content-type", "application/json")
        .body(Body::from(json!({ "done": true }).to_string()))
        .expect("build request");
    let response = app.clone().oneshot(request).await.expect("request");
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["data"]["done"], true);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/action-items?client_id={client_id}"))
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("request");
    let json = json_body(response).await;
    assert_eq!(json["data"].as_array().expect("array").len(), 1);
}
