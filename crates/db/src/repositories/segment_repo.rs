//! Repository for the `segments` table.

use sqlx::{PgExecutor, PgPool};
use vatic_core::types::DbId;

use crate::models::segment::{CreateSegment, Segment};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, video_id, start_frame, stop_frame, created_at";

/// Provides CRUD operations for segments.
pub struct SegmentRepo;

impl SegmentRepo {
    /// Insert a new segment, returning the created row.
    ///
    /// The upper bound against the video's frame count is checked by the
    /// caller; the table only enforces `0 <= start < stop`.
    pub async fn create(pool: &PgPool, input: &CreateSegment) -> Result<Segment, sqlx::Error> {
        let query = format!(
            "INSERT INTO segments (video_id, start_frame, stop_frame)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Segment>(&query)
            .bind(input.video_id)
            .bind(input.start_frame)
            .bind(input.stop_frame)
            .fetch_one(pool)
            .await
    }

    /// Find a segment by its internal ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Segment>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM segments WHERE id = $1");
        sqlx::query_as::<_, Segment>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List all segments of a video in creation order.
    pub async fn list_by_video(pool: &PgPool, video_id: DbId) -> Result<Vec<Segment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM segments WHERE video_id = $1 ORDER BY id");
        sqlx::query_as::<_, Segment>(&query)
            .bind(video_id)
            .fetch_all(pool)
            .await
    }
}
