//! Collaborator wiring for workflows.
//!
//! Worker accounts and the bonus ledger either live in this database or in
//! an external system. Database-backed collaborators write on the calling
//! workflow's own transaction, so their changes commit or roll back with it
//! and never take a second pooled connection. External systems are reached
//! through the capability traits from `vatic-core`.

use async_trait::async_trait;
use sqlx::PgConnection;
use tokio::sync::Mutex;
use vatic_core::collaborators::{BonusPayment, PaymentService, WorkerAccounts};
use vatic_core::error::CoreError;
use vatic_core::types::DbId;

use crate::repositories::{BonusAwardRepo, WorkerRepo};

/// PostgreSQL unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

/// Where a workflow sends a collaborator's calls.
pub enum Collaborator<'a, T: ?Sized> {
    /// Tables in this database, written inside the workflow's transaction.
    Database,
    /// A system outside the database, called before the workflow commits.
    External(&'a T),
}

impl<T: ?Sized> Clone for Collaborator<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Collaborator<'_, T> {}

fn internal(err: sqlx::Error) -> CoreError {
    CoreError::Internal(err.to_string())
}

fn worker_not_found(id: DbId) -> CoreError {
    CoreError::NotFound { entity: "Worker", id }
}

/// Worker accounts stored in the `workers` table, written on a borrowed
/// transaction connection.
pub struct PgWorkerAccounts<'c> {
    conn: Mutex<&'c mut PgConnection>,
}

impl<'c> PgWorkerAccounts<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl<'c> WorkerAccounts for PgWorkerAccounts<'c> {
    async fn set_verified(&self, worker_id: DbId, verified: bool) -> Result<(), CoreError> {
        let mut conn = self.conn.lock().await;
        if WorkerRepo::set_verified(&mut **conn, worker_id, verified)
            .await
            .map_err(internal)?
        {
            Ok(())
        } else {
            Err(worker_not_found(worker_id))
        }
    }

    async fn block(&self, worker_id: DbId) -> Result<(), CoreError> {
        let mut conn = self.conn.lock().await;
        if WorkerRepo::block(&mut **conn, worker_id)
            .await
            .map_err(internal)?
        {
            tracing::warn!(worker_id, "Worker blocked");
            Ok(())
        } else {
            Err(worker_not_found(worker_id))
        }
    }
}

/// Bonus ledger stored in the `bonus_awards` table, written on a borrowed
/// transaction connection.
pub struct PgPaymentLedger<'c> {
    conn: Mutex<&'c mut PgConnection>,
}

impl<'c> PgPaymentLedger<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl<'c> PaymentService for PgPaymentLedger<'c> {
    async fn award_bonus(&self, payment: &BonusPayment) -> Result<(), CoreError> {
        let mut conn = self.conn.lock().await;
        match BonusAwardRepo::create(&mut **conn, payment).await {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                Err(CoreError::Conflict(format!(
                    "schedule {} was already paid for job {}",
                    payment.schedule_id, payment.job_id
                )))
            }
            Err(err) => Err(internal(err)),
        }
    }
}
