use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Malformed input such as a negative frame index or an empty segment range.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The operation is not allowed in the entity's current state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Stored data contradicts a configuration invariant (e.g. a trainable
    /// video whose training video has no canonical job).
    #[error("Integrity violation: {0}")]
    Integrity(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
