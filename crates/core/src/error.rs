use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Insufficient coins: need {required}, have {available}")]
    InsufficientFunds { required: i64, available: i64 },

    #[error("Upstream service error: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
