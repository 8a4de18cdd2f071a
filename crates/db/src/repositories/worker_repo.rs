//! Repository for the `workers` table.

use sqlx::{PgExecutor, PgPool};
use vatic_core::types::DbId;

use crate::models::worker::{CreateWorker, Worker};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, external_id, verified, blocked, created_at, updated_at";

/// Provides CRUD operations for workers.
pub struct WorkerRepo;

impl WorkerRepo {
    /// Register a worker, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateWorker) -> Result<Worker, sqlx::Error> {
        let query = format!("INSERT INTO workers (external_id) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Worker>(&query)
            .bind(&input.external_id)
            .fetch_one(pool)
            .await
    }

    /// Find a worker by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Worker>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workers WHERE id = $1");
        sqlx::query_as::<_, Worker>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Set the `verified` flag. Returns `false` if no such worker exists.
    pub async fn set_verified<'e, E>(
        executor: E,
        id: DbId,
        verified: bool,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("UPDATE workers SET verified = $2 WHERE id = $1")
            .bind(id)
            .bind(verified)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Block a worker. Returns `false` if no such worker exists.
    pub async fn block<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("UPDATE workers SET blocked = true WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
