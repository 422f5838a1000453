//! Domain errors shared by every crate above `adops-core`.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Input that fails a field rule. Rendered as 400.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A uniqueness or state clash that is not a status transition.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A status change the lifecycle of `entity` does not allow.
    #[error("{entity} cannot move from '{from}' to '{to}'")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn transition(entity: &'static str, from: &str, to: &str) -> Self {
        Self::InvalidTransition {
            entity,
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}
