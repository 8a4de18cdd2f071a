//! Capabilities provided by systems outside the annotation core.
//!
//! The worker-account and payment systems are owned by the task marketplace.
//! The core only calls them through these traits; `vatic-db` ships
//! PostgreSQL-backed implementations and tests substitute recording fakes.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// Worker verification and blocking.
#[async_trait]
pub trait WorkerAccounts: Send + Sync {
    /// Set the worker's `verified` flag.
    async fn set_verified(&self, worker_id: DbId, verified: bool) -> Result<(), CoreError>;

    /// Prevent the worker from accepting further jobs.
    async fn block(&self, worker_id: DbId) -> Result<(), CoreError>;
}

/// A bonus to be paid for one `(schedule, job)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BonusPayment {
    pub job_id: DbId,
    pub schedule_id: DbId,
    pub amount: Decimal,
    pub reason: String,
}

/// Bonus payment to the worker of a job.
#[async_trait]
pub trait PaymentService: Send + Sync {
    async fn award_bonus(&self, payment: &BonusPayment) -> Result<(), CoreError>;
}
