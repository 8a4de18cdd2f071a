//! Multi-entity operations, each run in a single transaction.
//!
//! Every workflow locks the job row first (`FOR NO KEY UPDATE`), so
//! concurrent calls on the same job are serialized by PostgreSQL. The
//! precondition checks then run against the locked row. Any error drops the
//! transaction, leaving the database untouched.
//!
//! Collaborator calls (worker accounts, payments) happen after the local
//! writes and before commit; a collaborator failure rolls the local writes
//! back. Database-backed collaborators share the workflow's transaction, so
//! their writes roll back too.

use vatic_core::collaborators::{BonusPayment, PaymentService, WorkerAccounts};
use vatic_core::error::CoreError;
use vatic_core::geometry;
use vatic_core::job::JobStatus;
use vatic_core::qc::{self, TrainingEvaluation};
use vatic_core::types::DbId;
use vatic_core::video::TrainingPairs;

use crate::collaborators::{Collaborator, PgPaymentLedger, PgWorkerAccounts};
use crate::models::job::{Job, TrainingAssignment};
use crate::models::path::{CreatePath, PathWithBoxes};
use crate::repositories::{BonusScheduleRepo, JobRepo, PathRepo, SegmentRepo, VideoRepo};
use crate::DbPool;

/// Error returned by workflows: a rule violation or a database failure.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

fn job_not_found(id: DbId) -> CoreError {
    CoreError::NotFound { entity: "Job", id }
}

/// Log a rejected precondition at a level matching its severity.
fn log_rejection(operation: &'static str, job_id: DbId, err: &CoreError) {
    match err {
        CoreError::Integrity(msg) => {
            tracing::error!(
                operation,
                job_id,
                error = %msg,
                "Integrity violation, check video ingestion"
            )
        }
        CoreError::InvalidState(msg) => {
            tracing::warn!(operation, job_id, error = %msg, "Rejected in current state")
        }
        other => tracing::debug!(operation, job_id, error = %other, "Rejected"),
    }
}

/// Run a pure plan, logging its rejection before converting it.
fn checked<T>(
    operation: &'static str,
    job_id: DbId,
    plan: Result<T, CoreError>,
) -> Result<T, WorkflowError> {
    plan.map_err(|err| {
        log_rejection(operation, job_id, &err);
        WorkflowError::Core(err)
    })
}

// ---------------------------------------------------------------------------
// Annotation
// ---------------------------------------------------------------------------

/// Write a path and its boxes onto an open job.
///
/// The label must be declared on the segment's video, and box frames must
/// lie inside the segment (and on a sampled frame when the video skips).
pub async fn record_path(
    pool: &DbPool,
    job_id: DbId,
    input: &CreatePath,
) -> Result<PathWithBoxes, WorkflowError> {
    let mut tx = pool.begin().await?;

    let job = JobRepo::lock_by_id(&mut tx, job_id)
        .await?
        .ok_or_else(|| job_not_found(job_id))?;
    checked("record_path", job_id, job.status()?.ensure_open())?;

    let segment = SegmentRepo::find_by_id(&mut *tx, job.segment_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Segment",
            id: job.segment_id,
        })?;
    let video = VideoRepo::find_by_segment(&mut *tx, segment.id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Video",
            id: segment.video_id,
        })?;

    let labels = VideoRepo::label_ids(&mut *tx, video.id).await?;
    geometry::validate_path_label(input.label_id, &labels)?;

    let range = segment.range();
    let boxes = geometry::prepare_path_boxes(input.boxes.clone(), range)?;
    if let Some(b) = boxes.iter().find(|b| !range.is_sampled(b.frame, video.skip)) {
        return Err(CoreError::Validation(format!(
            "frame {} is not sampled (video skip is {})",
            b.frame, video.skip
        ))
        .into());
    }

    let path = PathRepo::insert_with_boxes(&mut tx, job.id, input.label_id, &boxes).await?;
    tx.commit().await?;

    tracing::debug!(job_id, path_id = path.path.id, boxes = boxes.len(), "Path recorded");
    Ok(path)
}

/// Finalize a job's annotations (`Open -> Submitted`).
pub async fn submit_job(pool: &DbPool, job_id: DbId) -> Result<Job, WorkflowError> {
    let mut tx = pool.begin().await?;

    let job = JobRepo::lock_by_id(&mut tx, job_id)
        .await?
        .ok_or_else(|| job_not_found(job_id))?;
    let next = checked("submit_job", job_id, job.status()?.transition(JobStatus::Submitted))?;

    let job = JobRepo::set_status(&mut tx, job_id, next).await?;
    tx.commit().await?;

    tracing::info!(job_id, "Job submitted");
    Ok(job)
}

// ---------------------------------------------------------------------------
// Quality control
// ---------------------------------------------------------------------------

/// Redirect a submitted job onto the canonical training segment of its
/// video's training video and spawn a replacement on the original segment.
///
/// At most one call per job ever succeeds: later calls see the redirect
/// recorded on the locked row and fail with `InvalidState`.
pub async fn mark_as_training(
    pool: &DbPool,
    job_id: DbId,
) -> Result<TrainingAssignment, WorkflowError> {
    let mut tx = pool.begin().await?;

    let job = JobRepo::lock_by_id(&mut tx, job_id)
        .await?
        .ok_or_else(|| job_not_found(job_id))?;
    let snapshot = job.snapshot()?;

    let video = VideoRepo::find_by_segment(&mut *tx, job.offered_segment_id())
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Segment",
            id: job.offered_segment_id(),
        })?;
    let canonical = match video.train_with_id {
        Some(training_id) => JobRepo::find_canonical_training(&mut tx, training_id).await?,
        None => None,
    };

    let plan = checked(
        "mark_as_training",
        job_id,
        qc::plan_training_redirect(&snapshot, &video.pairing(), canonical),
    )?;

    let replacement = JobRepo::insert_replacement(&mut tx, &plan.replacement).await?;
    let job = JobRepo::apply_redirect(&mut tx, &plan).await?;
    let training_job = JobRepo::find_by_id(&mut *tx, plan.training_job_id)
        .await?
        .ok_or_else(|| job_not_found(plan.training_job_id))?;

    tx.commit().await?;

    tracing::info!(
        job_id,
        replacement_id = replacement.id,
        training_job_id = training_job.id,
        original_segment_id = plan.original_segment_id,
        training_segment_id = plan.segment_id,
        "Job redirected to training segment"
    );

    Ok(TrainingAssignment {
        job,
        replacement,
        training_job,
    })
}

/// Record the training result of a redirected job and update the worker's
/// verification. A failed result also blocks the worker.
pub async fn mark_training_result(
    pool: &DbPool,
    accounts: Collaborator<'_, dyn WorkerAccounts>,
    job_id: DbId,
    passed: bool,
) -> Result<Job, WorkflowError> {
    let mut tx = pool.begin().await?;

    let job = JobRepo::lock_by_id(&mut tx, job_id)
        .await?
        .ok_or_else(|| job_not_found(job_id))?;
    let plan = checked(
        "mark_training_result",
        job_id,
        qc::plan_training_evaluation(&job.snapshot()?, passed),
    )?;

    let job = JobRepo::apply_evaluation(&mut tx, &plan).await?;

    match accounts {
        Collaborator::Database => update_worker(&PgWorkerAccounts::new(&mut tx), &plan).await?,
        Collaborator::External(external) => update_worker(external, &plan).await?,
    }

    tx.commit().await?;

    tracing::info!(
        job_id,
        worker_id = plan.worker_id,
        passed,
        blocked = plan.block,
        "Training result recorded"
    );
    Ok(job)
}

async fn update_worker(
    accounts: &dyn WorkerAccounts,
    plan: &TrainingEvaluation,
) -> Result<(), CoreError> {
    accounts.set_verified(plan.worker_id, plan.verified).await?;
    if plan.block {
        accounts.block(plan.worker_id).await?;
    }
    Ok(())
}

/// Build the training-pair index from all paired videos.
pub async fn load_training_pairs(pool: &DbPool) -> Result<TrainingPairs, sqlx::Error> {
    let edges = VideoRepo::list_training_edges(pool).await?;
    Ok(TrainingPairs::from_edges(
        edges.into_iter().map(|e| (e.id, e.train_with_id)),
    ))
}

// ---------------------------------------------------------------------------
// Bonuses
// ---------------------------------------------------------------------------

/// Evaluate every bonus schedule of the video the job was offered on, pay
/// each award, and finalize the job.
///
/// Schedules are applied in creation order and zero-rate schedules still
/// produce a payment. Every award is computed and checked before the first
/// payment call. Only `Submitted` or `Evaluated` jobs qualify, so a
/// finalized job is never paid twice through this path.
pub async fn award_bonuses(
    pool: &DbPool,
    payments: Collaborator<'_, dyn PaymentService>,
    job_id: DbId,
) -> Result<Vec<BonusPayment>, WorkflowError> {
    let mut tx = pool.begin().await?;

    let job = JobRepo::lock_by_id(&mut tx, job_id)
        .await?
        .ok_or_else(|| job_not_found(job_id))?;
    let next = checked("award_bonuses", job_id, job.status()?.transition(JobStatus::Finalized))?;

    let video = VideoRepo::find_by_segment(&mut *tx, job.offered_segment_id())
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Segment",
            id: job.offered_segment_id(),
        })?;
    let schedules = BonusScheduleRepo::list_by_video(&mut *tx, video.id).await?;
    let path_count = PathRepo::count_by_job(&mut *tx, job.id).await?;
    let path_count = usize::try_from(path_count)
        .map_err(|_| CoreError::Internal(format!("negative path count {path_count}")))?;

    let due = schedules
        .iter()
        .map(|row| {
            let award = row.schedule()?.award(path_count);
            award.validate()?;
            Ok(BonusPayment {
                job_id: job.id,
                schedule_id: row.id,
                amount: award.amount,
                reason: award.reason,
            })
        })
        .collect::<Result<Vec<_>, CoreError>>();
    let due = checked("award_bonuses", job_id, due)?;

    match payments {
        Collaborator::Database => pay_all(&PgPaymentLedger::new(&mut tx), &due).await?,
        Collaborator::External(external) => pay_all(external, &due).await?,
    }

    JobRepo::set_status(&mut tx, job_id, next).await?;
    tx.commit().await?;

    tracing::info!(job_id, awards = due.len(), path_count, "Job finalized");
    Ok(due)
}

async fn pay_all(payments: &dyn PaymentService, due: &[BonusPayment]) -> Result<(), CoreError> {
    for payment in due {
        payments.award_bonus(payment).await?;
        tracing::debug!(
            job_id = payment.job_id,
            schedule_id = payment.schedule_id,
            amount = %payment.amount,
            reason = %payment.reason,
            "Bonus awarded"
        );
    }
    Ok(())
}
