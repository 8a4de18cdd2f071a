//! Repository for the `paths` and `boxes` tables.

use std::collections::HashMap;

use sqlx::{PgConnection, PgExecutor, PgPool};
use vatic_core::geometry::BoundingBox;
use vatic_core::types::DbId;

use crate::models::path::{ObjectPath, PathBox, PathWithBoxes};

const PATH_COLUMNS: &str = "id, job_id, label_id, created_at";
const BOX_COLUMNS: &str = "id, path_id, frame, xtl, ytl, xbr, ybr, occluded, outside";

/// Provides persistence for annotation paths and their boxes.
pub struct PathRepo;

impl PathRepo {
    /// Insert a path and all of its boxes.
    ///
    /// Boxes are expected to be validated and sorted already.
    pub async fn insert_with_boxes(
        conn: &mut PgConnection,
        job_id: DbId,
        label_id: DbId,
        boxes: &[BoundingBox],
    ) -> Result<PathWithBoxes, sqlx::Error> {
        let query = format!(
            "INSERT INTO paths (job_id, label_id) VALUES ($1, $2) RETURNING {PATH_COLUMNS}"
        );
        let path = sqlx::query_as::<_, ObjectPath>(&query)
            .bind(job_id)
            .bind(label_id)
            .fetch_one(&mut *conn)
            .await?;

        let box_query = format!(
            "INSERT INTO boxes (path_id, frame, xtl, ytl, xbr, ybr, occluded, outside)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {BOX_COLUMNS}"
        );
        let mut stored = Vec::with_capacity(boxes.len());
        for b in boxes {
            let row = sqlx::query_as::<_, PathBox>(&box_query)
                .bind(path.id)
                .bind(b.frame)
                .bind(b.xtl)
                .bind(b.ytl)
                .bind(b.xbr)
                .bind(b.ybr)
                .bind(b.occluded)
                .bind(b.outside)
                .fetch_one(&mut *conn)
                .await?;
            stored.push(row);
        }

        Ok(PathWithBoxes { path, boxes: stored })
    }

    /// List a job's paths in creation order, each with boxes ordered by frame.
    pub async fn list_by_job(
        pool: &PgPool,
        job_id: DbId,
    ) -> Result<Vec<PathWithBoxes>, sqlx::Error> {
        let query = format!("SELECT {PATH_COLUMNS} FROM paths WHERE job_id = $1 ORDER BY id");
        let paths = sqlx::query_as::<_, ObjectPath>(&query)
            .bind(job_id)
            .fetch_all(pool)
            .await?;

        let path_ids: Vec<DbId> = paths.iter().map(|p| p.id).collect();
        let box_query = format!(
            "SELECT {BOX_COLUMNS} FROM boxes WHERE path_id = ANY($1) ORDER BY path_id, frame"
        );
        let boxes = sqlx::query_as::<_, PathBox>(&box_query)
            .bind(&path_ids)
            .fetch_all(pool)
            .await?;

        let mut by_path: HashMap<DbId, Vec<PathBox>> = HashMap::new();
        for b in boxes {
            by_path.entry(b.path_id).or_default().push(b);
        }

        Ok(paths
            .into_iter()
            .map(|path| {
                let boxes = by_path.remove(&path.id).unwrap_or_default();
                PathWithBoxes { path, boxes }
            })
            .collect())
    }

    /// Number of paths (annotated objects) on a job.
    pub async fn count_by_job<'e, E>(executor: E, job_id: DbId) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM paths WHERE job_id = $1")
            .bind(job_id)
            .fetch_one(executor)
            .await
    }
}
