use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use adpulse_core::week::week_bounds;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct WeekBoundsQuery {
    pub offset: Option<i64>,
}

/// `GET /api/weeks?offset=` — Monday–Sunday bounds for the week picker.
pub async fn get_week_bounds(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WeekBoundsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let reference = state.week_reference_date().await;
    let bounds = week_bounds(reference, query.offset.unwrap_or(0));
    Ok(Json(json!({ "data": bounds })))
}
