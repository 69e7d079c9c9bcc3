pub mod action_items;
pub mod amounts;
pub mod clients;
pub mod goals;
pub mod health;
pub mod managers;
pub mod reports;
pub mod weeks;

use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

/// 422 envelope for semantic validation failures, matching the error
/// shape of [`crate::error::AppError`].
pub(crate) fn unprocessable(
    code: &str,
    message: &str,
    field: Option<&str>,
) -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "error": {
                "code": code,
                "message": message,
                "field": field
            }
        })),
    )
}

/// Parse a `YYYY-MM-DD` query/body date.
pub(crate) fn parse_date(
    raw: &str,
    field: &str,
) -> Result<chrono::NaiveDate, crate::error::AppError> {
    chrono::NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| crate::error::AppError::BadRequest(format!("invalid {field} (expected YYYY-MM-DD)")))
}
