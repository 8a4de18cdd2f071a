//! Bonus schedule and bonus award models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vatic_core::bonus::BonusSchedule;
use vatic_core::error::CoreError;
use vatic_core::types::{DbId, Timestamp};

/// A row from the `bonus_schedules` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BonusScheduleRow {
    pub id: DbId,
    pub video_id: DbId,
    pub kind: String,
    pub rate: Decimal,
    pub created_at: Timestamp,
}

impl BonusScheduleRow {
    pub fn schedule(&self) -> Result<BonusSchedule, CoreError> {
        BonusSchedule::from_parts(&self.kind, self.rate)
    }
}

/// DTO for attaching a bonus schedule to a video.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBonusSchedule {
    /// Overridden by the URL path in the API.
    #[serde(default)]
    pub video_id: DbId,
    pub kind: String,
    pub rate: Decimal,
}

/// A row from the `bonus_awards` ledger.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BonusAward {
    pub id: DbId,
    pub schedule_id: DbId,
    pub job_id: DbId,
    pub amount: Decimal,
    pub reason: String,
    pub awarded_at: Timestamp,
}
