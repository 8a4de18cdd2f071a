//! Repository for the `bonus_awards` ledger.

use sqlx::{PgExecutor, PgPool};
use vatic_core::collaborators::BonusPayment;
use vatic_core::types::DbId;

use crate::models::bonus::BonusAward;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, schedule_id, job_id, amount, reason, awarded_at";

/// Provides ledger operations for paid bonuses.
pub struct BonusAwardRepo;

impl BonusAwardRepo {
    /// Record a paid bonus. Fails on `uq_bonus_awards_schedule_job` if the
    /// pair was already paid.
    pub async fn create<'e, E>(
        executor: E,
        payment: &BonusPayment,
    ) -> Result<BonusAward, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO bonus_awards (schedule_id, job_id, amount, reason)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BonusAward>(&query)
            .bind(payment.schedule_id)
            .bind(payment.job_id)
            .bind(payment.amount)
            .bind(&payment.reason)
            .fetch_one(executor)
            .await
    }

    /// List the bonuses paid for a job.
    pub async fn list_by_job(pool: &PgPool, job_id: DbId) -> Result<Vec<BonusAward>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bonus_awards WHERE job_id = $1 ORDER BY id");
        sqlx::query_as::<_, BonusAward>(&query)
            .bind(job_id)
            .fetch_all(pool)
            .await
    }
}
