//! Repository for the `bonus_schedules` table.

use sqlx::{PgExecutor, PgPool};
use vatic_core::types::DbId;

use crate::models::bonus::{BonusScheduleRow, CreateBonusSchedule};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, video_id, kind, rate, created_at";

/// Provides CRUD operations for bonus schedules.
pub struct BonusScheduleRepo;

impl BonusScheduleRepo {
    /// Attach a schedule to a video, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateBonusSchedule,
    ) -> Result<BonusScheduleRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO bonus_schedules (video_id, kind, rate) VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BonusScheduleRow>(&query)
            .bind(input.video_id)
            .bind(&input.kind)
            .bind(input.rate)
            .fetch_one(pool)
            .await
    }

    /// List a video's schedules in creation order.
    pub async fn list_by_video<'e, E>(
        executor: E,
        video_id: DbId,
    ) -> Result<Vec<BonusScheduleRow>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query =
            format!("SELECT {COLUMNS} FROM bonus_schedules WHERE video_id = $1 ORDER BY id");
        sqlx::query_as::<_, BonusScheduleRow>(&query)
            .bind(video_id)
            .fetch_all(executor)
            .await
    }
}
