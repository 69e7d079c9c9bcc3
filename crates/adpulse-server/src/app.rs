use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{routes, state::AppState};

/// Construct the Axum [`Router`] with all routes and middleware attached.
///
/// Middleware is applied in outer-to-inner order (outermost runs first on
/// request, last on response):
///
/// 1. `TraceLayer` — structured request/response logging via `tracing`.
/// 2. `CorsLayer` — permissive CORS; the dashboard frontend is served
///    from a separate origin.
pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route(
            "/api/clients",
            get(routes::clients::list_clients).post(routes::clients::create_client),
        )
        .route(
            "/api/clients/{client_id}",
            get(routes::clients::get_client)
                .put(routes::clients::update_client)
                .delete(routes::clients::delete_client),
        )
        .route(
            "/api/managers",
            get(routes::managers::list_managers).post(routes::managers::create_manager),
        )
        .route(
            "/api/managers/{manager_id}",
            axum::routing::put(routes::managers::update_manager)
                .delete(routes::managers::delete_manager),
        )
        .route(
            "/api/action-items",
            get(routes::action_items::list_action_items)
                .post(routes::action_items::create_action_item),
        )
        .route(
            "/api/action-items/{item_id}",
            axum::routing::put(routes::action_items::update_action_item)
                .delete(routes::action_items::delete_action_item),
        )
        .route("/api/amounts", post(routes::amounts::submit_amounts))
        .route(
            "/api/goals",
            get(routes::goals::list_goals).post(routes::goals::create_goal),
        )
        .route(
            "/api/goals/{goal_id}",
            axum::routing::put(routes::goals::update_goal).delete(routes::goals::delete_goal),
        )
        .route(
            "/api/goals/{goal_id}/progress",
            get(routes::goals::get_goal_progress),
        )
        .route("/api/reports/daily", get(routes::reports::daily_report))
        .route("/api/reports/weekly", get(routes::reports::weekly_report))
        .route("/api/weeks", get(routes::weeks::get_week_bounds))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
