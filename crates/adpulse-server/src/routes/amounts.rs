use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use adpulse_core::reporting::AmountRow;

use crate::routes::{parse_date, unprocessable};
use crate::{error::AppError, state::AppState};

const MAX_BATCH_ROWS: usize = 500;

#[derive(Debug, Deserialize)]
pub struct AmountEntry {
    pub client_id: String,
    pub date: String,
    pub amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAmountsRequest {
    pub entries: Vec<AmountEntry>,
}

/// `POST /api/amounts` — batch-enter daily revenue amounts.
///
/// Re-submitting a `(client_id, date)` pair overwrites the stored amount.
pub async fn submit_amounts(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitAmountsRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.entries.is_empty() {
        return Err(AppError::BadRequest("entries must not be empty".to_string()));
    }
    if req.entries.len() > MAX_BATCH_ROWS {
        return Err(AppError::BatchTooLarge(req.entries.len()));
    }

    let mut rows = Vec::with_capacity(req.entries.len());
    for entry in &req.entries {
        if entry.amount < 0.0 {
            return Ok(unprocessable(
                "validation_error",
                "amount must be non-negative",
                Some("amount"),
            )
            .into_response());
        }
        if !state.is_valid_client(&entry.client_id).await {
            return Ok(unprocessable(
                "unknown_client",
                &format!("client {} does not exist", entry.client_id),
                Some("client_id"),
            )
            .into_response());
        }
        rows.push(AmountRow {
            client_id: entry.client_id.clone(),
            date: parse_date(&entry.date, "date")?,
            amount: entry.amount,
        });
    }

    state
        .store
        .upsert_amounts(&rows)
        .await
        .map_err(AppError::Internal)?;

    Ok((
        StatusCode::OK,
        Json(json!({ "data": { "accepted": rows.len() } })),
    )
        .into_response())
}
