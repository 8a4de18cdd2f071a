//! Label vocabulary model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vatic_core::types::{DbId, Timestamp};

/// A row from the `labels` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Label {
    pub id: DbId,
    pub text: String,
    pub created_at: Timestamp,
}

/// DTO for creating a label.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLabel {
    pub text: String,
}
