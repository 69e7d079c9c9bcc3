use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid goal category: {0} (expected weekly_revenue or monthly_revenue)")]
    InvalidCategory(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
