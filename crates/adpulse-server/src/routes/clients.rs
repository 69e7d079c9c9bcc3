use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use adpulse_metadata::{CreateClientParams, UpdateClientParams};

use crate::routes::unprocessable;
use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CreateClientRequest {
    pub name: String,
    pub manager_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateClientRequest {
    pub name: Option<String>,
    /// Explicit `null` clears the assignment; an absent field leaves it
    /// untouched.
    #[serde(default, deserialize_with = "deserialize_optional_nullable")]
    pub manager_id: Option<Option<String>>,
}

fn deserialize_optional_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    Ok(Some(Option::<T>::deserialize(deserializer)?))
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

async fn require_manager(state: &AppState, manager_id: &str) -> Result<(), AppError> {
    let exists = state
        .directory
        .manager_exists(manager_id)
        .await
        .map_err(AppError::Internal)?;
    if exists {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "manager {manager_id} does not exist"
        )))
    }
}

/// `POST /api/clients` — add a client to the roster.
pub async fn create_client(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateClientRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(resp) = validate_name(&req.name) {
        return Ok(resp.into_response());
    }
    if let Some(ref manager_id) = req.manager_id {
        require_manager(&state, manager_id).await?;
    }

    let client = state
        .directory
        .create_client(CreateClientParams {
            name: req.name,
            manager_id: req.manager_id,
        })
        .await
        .map_err(AppError::Internal)?;

    // Add to the client cache.
    {
        let mut cache = state.client_cache.write().await;
        cache.insert(client.id.clone());
    }

    Ok((StatusCode::CREATED, Json(json!({ "data": client }))).into_response())
}

/// `GET /api/clients` — full roster, ordered by name.
pub async fn list_clients(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let clients = state
        .directory
        .list_clients()
        .await
        .map_err(AppError::Internal)?;
    Ok(Json(json!({ "data": clients })))
}

/// `GET /api/clients/:id`
pub async fn get_client(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let client = state
        .directory
        .get_client(&client_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("Client not found".to_string()))?;
    Ok(Json(json!({ "data": client })))
}

/// `PUT /api/clients/:id` — rename and/or (re)assign a manager.
pub async fn update_client(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
    Json(req): Json<UpdateClientRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(ref name) = req.name {
        if let Err(resp) = validate_name(name) {
            return Ok(resp.into_response());
        }
    }
    if let Some(Some(ref manager_id)) = req.manager_id {
        require_manager(&state, manager_id).await?;
    }

    let client = state
        .directory
        .update_client(
            &client_id,
            UpdateClientParams {
                name: req.name,
                manager_id: req.manager_id,
            },
        )
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("Client not found".to_string()))?;

    Ok(Json(json!({ "data": client })).into_response())
}

/// `DELETE /api/clients/:id` — remove a client and all its data.
pub async fn delete_client(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state
        .directory
        .delete_client(&client_id)
        .await
        .map_err(AppError::Internal)?;

    if !deleted {
        return Err(AppError::NotFound("Client not found".to_string()));
    }

    // Drop from the validity cache so later lookups re-check the DB.
    {
        let mut cache = state.client_cache.write().await;
        cache.remove(&client_id);
    }

    Ok(StatusCode::NO_CONTENT)
}
