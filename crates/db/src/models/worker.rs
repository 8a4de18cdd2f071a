//! Worker account model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vatic_core::types::{DbId, Timestamp};

/// A row from the `workers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Worker {
    pub id: DbId,
    /// Identifier assigned by the task marketplace.
    pub external_id: String,
    pub verified: bool,
    pub blocked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a worker.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorker {
    pub external_id: String,
}
