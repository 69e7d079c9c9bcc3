use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use adpulse_metadata::{CreateActionItemParams, UpdateActionItemParams};

use crate::routes::{parse_date, unprocessable};
use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct ListActionItemsQuery {
    pub client_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateActionItemRequest {
    pub client_id: Option<String>,
    pub title: String,
    pub due_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateActionItemRequest {
    pub title: Option<String>,
    /// Explicit `null` clears the due date; an absent field leaves it
    /// untouched.
    #[serde(default, deserialize_with = "deserialize_optional_nullable")]
    pub due_date: Option<Option<String>>,
    pub done: Option<bool>,
}

fn deserialize_optional_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    Ok(Some(Option::<T>::deserialize(deserializer)?))
}

/// `GET /api/action-items?client_id=` — all items, or one client's.
pub async fn list_action_items(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListActionItemsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let items = state
        .directory
        .list_action_items(query.client_id.as_deref())
        .await
        .map_err(AppError::Internal)?;
    Ok(Json(json!({ "data": items })))
}

/// `POST /api/action-items`
pub async fn create_action_item(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateActionItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.title.trim().is_empty() {
        return Ok(unprocessable(
            "validation_error",
            "title must not be empty",
            Some("title"),
        )
        .into_response());
    }
    if let Some(ref client_id) = req.client_id {
        if !state.is_valid_client(client_id).await {
            return Err(AppError::NotFound("Client not found".to_string()));
        }
    }
    let due_date = req
        .due_date
        .as_deref()
        .map(|raw| parse_date(raw, "due_date"))
        .transpose()?;

    let item = state
        .directory
        .create_action_item(CreateActionItemParams {
            client_id: req.client_id,
            title: req.title,
            due_date,
        })
        .await
        .map_err(AppError::Internal)?;

    Ok((StatusCode::CREATED, Json(json!({ "data": item }))).into_response())
}

/// `PUT /api/action-items/:id` — edit or toggle done.
pub async fn update_action_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<String>,
    Json(req): Json<UpdateActionItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(ref title) = req.title {
        if title.trim().is_empty() {
            return Ok(unprocessable(
                "validation_error",
                "title must not be empty",
                Some("title"),
            )
            .into_response());
        }
    }
    let due_date = match req.due_date {
        Some(Some(ref raw)) => Some(Some(parse_date(raw, "due_date")?)),
        Some(None) => Some(None),
        None => None,
    };

    let item = state
        .directory
        .update_action_item(
            &item_id,
            UpdateActionItemParams {
                title: req.title,
                due_date,
                done: req.done,
            },
        )
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("Action item not found".to_string()))?;

    Ok(Json(json!({ "data": item })).into_response())
}

/// `DELETE /api/action-items/:id`
pub async fn delete_action_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state
        .directory
        .delete_action_item(&item_id)
        .await
        .map_err(AppError::Internal)?;

    if !deleted {
        return Err(AppError::NotFound("Action item not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
