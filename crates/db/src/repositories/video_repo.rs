//! Repository for the `videos` and `video_labels` tables.

use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};
use vatic_core::bonus::{KIND_COMPLETION, KIND_PER_OBJECT};
use vatic_core::types::DbId;

use crate::models::video::{CreateVideo, TrainingEdge, Video};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, slug, width, height, total_frames, location, skip, \
    per_object_bonus, completion_bonus, train_with_id, is_for_training, \
    created_at, updated_at";

/// Provides CRUD operations for videos.
pub struct VideoRepo;

impl VideoRepo {
    /// Insert a new video, returning the created row.
    ///
    /// A positive per-object or completion rate also creates the matching
    /// bonus schedule in the same transaction.
    pub async fn create(pool: &PgPool, input: &CreateVideo) -> Result<Video, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO videos
                (slug, width, height, total_frames, location, skip,
                 per_object_bonus, completion_bonus, train_with_id, is_for_training)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 0),
                     COALESCE($7, 0), COALESCE($8, 0), $9, COALESCE($10, false))
             RETURNING {COLUMNS}"
        );
        let video = sqlx::query_as::<_, Video>(&query)
            .bind(&input.slug)
            .bind(input.width)
            .bind(input.height)
            .bind(input.total_frames)
            .bind(&input.location)
            .bind(input.skip)
            .bind(input.per_object_bonus)
            .bind(input.completion_bonus)
            .bind(input.train_with_id)
            .bind(input.is_for_training)
            .fetch_one(&mut *tx)
            .await?;

        for (kind, rate) in [
            (KIND_PER_OBJECT, video.per_object_bonus),
            (KIND_COMPLETION, video.completion_bonus),
        ] {
            if rate > Decimal::ZERO {
                sqlx::query(
                    "INSERT INTO bonus_schedules (video_id, kind, rate) VALUES ($1, $2, $3)",
                )
                .bind(video.id)
                .bind(kind)
                .bind(rate)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(video)
    }

    /// Find a video by its internal ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Video>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE id = $1");
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find the video owning a segment.
    pub async fn find_by_segment<'e, E>(
        executor: E,
        segment_id: DbId,
    ) -> Result<Option<Video>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM videos
             WHERE id = (SELECT video_id FROM segments WHERE id = $1)"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(segment_id)
            .fetch_optional(executor)
            .await
    }

    /// List videos, ordered by ID. Training videos are included only on request.
    pub async fn list(pool: &PgPool, include_training: bool) -> Result<Vec<Video>, sqlx::Error> {
        let query = if include_training {
            format!("SELECT {COLUMNS} FROM videos ORDER BY id")
        } else {
            format!("SELECT {COLUMNS} FROM videos WHERE is_for_training = false ORDER BY id")
        };
        sqlx::query_as::<_, Video>(&query).fetch_all(pool).await
    }

    /// All `video -> training video` edges.
    pub async fn list_training_edges(pool: &PgPool) -> Result<Vec<TrainingEdge>, sqlx::Error> {
        sqlx::query_as::<_, TrainingEdge>(
            "SELECT id, train_with_id FROM videos WHERE train_with_id IS NOT NULL ORDER BY id",
        )
        .fetch_all(pool)
        .await
    }

    /// Declare a label as relevant for a video. Returns `false` if it already was.
    pub async fn attach_label(
        pool: &PgPool,
        video_id: DbId,
        label_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO video_labels (video_id, label_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(video_id)
        .bind(label_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// IDs of the labels declared on a video.
    pub async fn label_ids<'e, E>(executor: E, video_id: DbId) -> Result<Vec<DbId>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, DbId>(
            "SELECT label_id FROM video_labels WHERE video_id = $1 ORDER BY label_id",
        )
        .bind(video_id)
        .fetch_all(executor)
        .await
    }
}
