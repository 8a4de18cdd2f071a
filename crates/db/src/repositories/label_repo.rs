//! Repository for the `labels` table.

use sqlx::PgPool;
use vatic_core::types::DbId;

use crate::models::label::{CreateLabel, Label};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, text, created_at";

/// Provides CRUD operations for labels.
pub struct LabelRepo;

impl LabelRepo {
    /// Insert a new label, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateLabel) -> Result<Label, sqlx::Error> {
        let query = format!("INSERT INTO labels (text) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Label>(&query)
            .bind(&input.text)
            .fetch_one(pool)
            .await
    }

    /// Find a label by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Label>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM labels WHERE id = $1");
        sqlx::query_as::<_, Label>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all labels alphabetically.
    pub async fn list(pool: &PgPool) -> Result<Vec<Label>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM labels ORDER BY text");
        sqlx::query_as::<_, Label>(&query).fetch_all(pool).await
    }

    /// List the labels declared on a video.
    pub async fn list_for_video(pool: &PgPool, video_id: DbId) -> Result<Vec<Label>, sqlx::Error> {
        sqlx::query_as::<_, Label>(
            "SELECT l.id, l.text, l.created_at FROM labels l
             JOIN video_labels vl ON vl.label_id = l.id
             WHERE vl.video_id = $1
             ORDER BY l.text",
        )
        .bind(video_id)
        .fetch_all(pool)
        .await
    }
}
