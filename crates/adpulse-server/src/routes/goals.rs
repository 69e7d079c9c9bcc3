use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use adpulse_core::goals::{goal_progress, CreateGoalRequest, UpdateGoalRequest};
use adpulse_core::reporting::DateRange;

use crate::routes::{parse_date, unprocessable};
use crate::{error::AppError, state::AppState};

const MAX_GOALS_PER_CLIENT: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct ListGoalsQuery {
    pub client_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GoalProgressQuery {
    pub date: Option<String>,
}

fn validate_name(name: &str) -> Result<(), (StatusCode, Json<Value>)> {
    if name.trim().is_empty() {
        return Err(unprocessable(
            "validation_error",
            "name must not be empty",
            Some("name"),
        ));
    }
    if name.len() > 100 {
        return Err(unprocessable(
            "validation_error",
            "name must be 100 characters or fewer",
            Some("name"),
        ));
    }
    Ok(())
}

/// `GET /api/goals?client_id=` — all goals, or one client's.
pub async fn list_goals(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListGoalsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let goals = state
        .db
        .list_goals(query.client_id.as_deref())
        .await
        .map_err(AppError::Internal)?;
    Ok(Json(json!({ "data": goals })))
}

/// `POST /api/goals`
pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateGoalRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !state.is_valid_client(&req.client_id).await {
        return Err(AppError::NotFound("Client not found".to_string()));
    }
    if let Err(resp) = validate_name(&req.name) {
        return Ok(resp.into_response());
    }
    if req.end_date < req.start_date {
        return Err(AppError::BadRequest(
            "end_date must be on or after start_date".to_string(),
        ));
    }
    if req.target_revenue < 0.0 || req.start_revenue.is_some_and(|v| v < 0.0) {
        return Ok(unprocessable(
            "validation_error",
            "revenue values must be non-negative",
            Some("target_revenue"),
        )
        .into_response());
    }

    let count = state
        .db
        .count_goals(&req.client_id)
        .await
        .map_err(AppError::Internal)?;
    if count >= MAX_GOALS_PER_CLIENT {
        return Ok(unprocessable(
            "limit_exceeded",
            "maximum of 50 goals per client reached",
            Some("goals"),
        )
        .into_response());
    }

    let exists = state
        .db
        .goal_name_exists(&req.client_id, &req.name, None)
        .await
        .map_err(AppError::Internal)?;
    if exists {
        return Ok(unprocessable(
            "duplicate_name",
            "goal name already exists for this client",
            Some("name"),
        )
        .into_response());
    }

    let goal = state
        .db
        .create_goal(req)
        .await
        .map_err(AppError::Internal)?;

    Ok((StatusCode::CREATED, Json(json!({ "data": goal }))).into_response())
}

/// `PUT /api/goals/:id`
pub async fn update_goal(
    State(state): State<Arc<AppState>>,
    Path(goal_id): Path<String>,
    Json(req): Json<UpdateGoalRequest>,
) -> Result<impl IntoResponse, AppError> {
    let existing = state
        .db
        .get_goal(&goal_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("Goal not found".to_string()))?;

    if let Some(ref name) = req.name {
        if let Err(resp) = validate_name(name) {
            return Ok(resp.into_response());
        }
        let exists = state
            .db
            .goal_name_exists(&existing.client_id, name, Some(&goal_id))
            .await
            .map_err(AppError::Internal)?;
        if exists {
            return Ok(unprocessable(
                "duplicate_name",
                "goal name already exists for this client",
                Some("name"),
            )
            .into_response());
        }
    }
    if let Some(end_date) = req.end_date {
        if end_date < existing.start_date {
            return Err(AppError::BadRequest(
                "end_date must be on or after start_date".to_string(),
            ));
        }
    }
    if req.target_revenue.is_some_and(|v| v < 0.0) {
        return Ok(unprocessable(
            "validation_error",
            "revenue values must be non-negative",
            Some("target_revenue"),
        )
        .into_response());
    }

    let goal = state
        .db
        .update_goal(&goal_id, req)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("Goal not found".to_string()))?;

    Ok(Json(json!({ "data": goal })).into_response())
}

/// `DELETE /api/goals/:id`
pub async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Path(goal_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state
        .db
        .delete_goal(&goal_id)
        .await
        .map_err(AppError::Internal)?;

    if !deleted {
        return Err(AppError::NotFound("Goal not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/goals/:id/progress?date=` — achievement and growth rates.
///
/// Current revenue is summed from the goal's start date through the
/// effective date (capped at the goal's end date). The effective date
/// defaults to the configured week basis.
pub async fn get_goal_progress(
    State(state): State<Arc<AppState>>,
    Path(goal_id): Path<String>,
    Query(query): Query<GoalProgressQuery>,
) -> Result<impl IntoResponse, AppError> {
    let goal = state
        .db
        .get_goal(&goal_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("Goal not found".to_string()))?;

    let as_of: NaiveDate = match query.date.as_deref() {
        Some(raw) => parse_date(raw, "date")?,
        None => state.week_reference_date().await,
    };

    let range = DateRange {
        start: goal.start_date,
        end: as_of.min(goal.end_date),
    };
    let current_revenue = state
        .store
        .sum_amounts(&goal.client_id, range)
        .await
        .map_err(AppError::Internal)?;

    let progress = goal_progress(&goal, current_revenue, as_of);
    Ok(Json(json!({ "data": progress })))
}
