//! Repository for the `jobs` table.

use sqlx::{PgConnection, PgExecutor, PgPool};
use vatic_core::job::JobStatus;
use vatic_core::qc::{CanonicalTraining, ReplacementJob, TrainingEvaluation, TrainingRedirect};
use vatic_core::types::DbId;

use crate::models::job::{CreateJob, Job};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, segment_id, group_id, worker_id, status_id, training_result, \
    redirected_from_segment_id, redirected_from_group_id, replacement_of_job_id, \
    created_at, updated_at";

/// Provides CRUD operations for jobs.
pub struct JobRepo;

impl JobRepo {
    /// Insert a new open job, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateJob) -> Result<Job, sqlx::Error> {
        let query = format!(
            "INSERT INTO jobs (segment_id, group_id, worker_id, status_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(input.segment_id)
            .bind(input.group_id)
            .bind(input.worker_id)
            .bind(JobStatus::Open.id())
            .fetch_one(pool)
            .await
    }

    /// Find a job by its internal ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Job>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Load a job and hold its row lock until the transaction ends.
    ///
    /// Uses `FOR NO KEY UPDATE` so inserts referencing the job from other
    /// connections (paths, external ledgers sharing the database) are not
    /// blocked.
    pub async fn lock_by_id(conn: &mut PgConnection, id: DbId) -> Result<Option<Job>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1 FOR NO KEY UPDATE");
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List the jobs of a segment in creation order.
    pub async fn list_by_segment(pool: &PgPool, segment_id: DbId) -> Result<Vec<Job>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE segment_id = $1 ORDER BY id");
        sqlx::query_as::<_, Job>(&query)
            .bind(segment_id)
            .fetch_all(pool)
            .await
    }

    /// First ground-truth job of the first segment of a training video.
    ///
    /// Worker jobs redirected onto the segment are never ground truth, even
    /// when they were created before it.
    pub async fn find_canonical_training(
        conn: &mut PgConnection,
        training_video_id: DbId,
    ) -> Result<Option<CanonicalTraining>, sqlx::Error> {
        let row: Option<(DbId, DbId, DbId, DbId)> = sqlx::query_as(
            "SELECT s.video_id, s.id, j.id, j.group_id
             FROM segments s
             JOIN jobs j ON j.segment_id = s.id AND j.redirected_from_segment_id IS NULL
             WHERE s.id = (SELECT id FROM segments WHERE video_id = $1 ORDER BY id LIMIT 1)
             ORDER BY j.id
             LIMIT 1",
        )
        .bind(training_video_id)
        .fetch_optional(conn)
        .await?;

        Ok(row.map(|(video_id, segment_id, job_id, group_id)| CanonicalTraining {
            video_id,
            segment_id,
            job_id,
            group_id,
        }))
    }

    /// Insert the replacement job described by a redirect plan.
    pub async fn insert_replacement(
        conn: &mut PgConnection,
        replacement: &ReplacementJob,
    ) -> Result<Job, sqlx::Error> {
        let query = format!(
            "INSERT INTO jobs (segment_id, group_id, status_id, replacement_of_job_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(replacement.segment_id)
            .bind(replacement.group_id)
            .bind(replacement.status.id())
            .bind(replacement.replacement_of_job_id)
            .fetch_one(conn)
            .await
    }

    /// Move a job onto its training segment as described by a redirect plan.
    ///
    /// The `redirected_from_segment_id IS NULL` guard makes a second redirect
    /// update nothing, which surfaces as `RowNotFound`.
    pub async fn apply_redirect(
        conn: &mut PgConnection,
        plan: &TrainingRedirect,
    ) -> Result<Job, sqlx::Error> {
        let query = format!(
            "UPDATE jobs SET
                segment_id = $2,
                group_id = $3,
                status_id = $4,
                redirected_from_segment_id = $5,
                redirected_from_group_id = $6
             WHERE id = $1 AND redirected_from_segment_id IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(plan.job_id)
            .bind(plan.segment_id)
            .bind(plan.group_id)
            .bind(plan.status.id())
            .bind(plan.original_segment_id)
            .bind(plan.original_group_id)
            .fetch_one(conn)
            .await
    }

    /// Record a training result as described by an evaluation plan.
    pub async fn apply_evaluation(
        conn: &mut PgConnection,
        plan: &TrainingEvaluation,
    ) -> Result<Job, sqlx::Error> {
        let query = format!(
            "UPDATE jobs SET training_result = $2, status_id = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(plan.job_id)
            .bind(plan.result.as_column())
            .bind(plan.status.id())
            .fetch_one(conn)
            .await
    }

    /// Set a job's status.
    pub async fn set_status(
        conn: &mut PgConnection,
        id: DbId,
        status: JobStatus,
    ) -> Result<Job, sqlx::Error> {
        let query = format!("UPDATE jobs SET status_id = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .bind(status.id())
            .fetch_one(conn)
            .await
    }
}
