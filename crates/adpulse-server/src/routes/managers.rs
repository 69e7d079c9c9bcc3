use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use adpulse_metadata::{CreateManagerParams, UpdateManagerParams};

use crate::routes::unprocessable;
use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CreateManagerRequest {
    pub name: String,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateManagerRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

fn validate_name(name: &str) -> Result<(), (StatusCode, Json<serde_json::Value>)> {
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

/// `POST /api/managers`
pub async fn create_manager(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateManagerRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(resp) = validate_name(&req.name) {
        return Ok(resp.into_response());
    }

    let manager = state
        .directory
        .create_manager(CreateManagerParams {
            name: req.name,
            email: req.email,
        })
        .await
        .map_err(AppError::Internal)?;

    Ok((StatusCode::CREATED, Json(json!({ "data": manager }))).into_response())
}

/// `GET /api/managers`
pub async fn list_managers(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let managers = state
        .directory
        .list_managers()
        .await
        .map_err(AppError::Internal)?;
    Ok(Json(json!({ "data": managers })))
}

/// `PUT /api/managers/:id`
pub async fn update_manager(
    State(state): State<Arc<AppState>>,
    Path(manager_id): Path<String>,
    Json(req): Json<UpdateManagerRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(ref name) = req.name {
        if let Err(resp) = validate_name(name) {
            return Ok(resp.into_response());
        }
    }

    let manager = state
        .directory
        .update_manager(
            &manager_id,
            UpdateManagerParams {
                name: req.name,
                email: req.email,
            },
        )
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("Manager not found".to_string()))?;

    Ok(Json(json!({ "data": manager })).into_response())
}

/// `DELETE /api/managers/:id` — their clients become unassigned.
pub async fn delete_manager(
    State(state): State<Arc<AppState>>,
    Path(manager_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state
        .directory
        .delete_manager(&manager_id)
        .await
        .map_err(AppError::Internal)?;

    if !deleted {
        return Err(AppError::NotFound("Manager not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
