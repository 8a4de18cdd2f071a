//! Quality-control workflow transitions.
//!
//! A submitted job on a trainable video can be silently redirected onto the
//! ground-truth segment of the paired training video. The worker's result on
//! that segment is later compared against the canonical training job, and a
//! replacement job is spawned on the original segment so the requested work
//! still gets annotated.
//!
//! The functions here are pure: they take a snapshot of the rows involved
//! and return the complete set of changes as a value. The database layer
//! applies a plan inside one transaction while holding the job row lock.

use serde::Serialize;

use crate::error::CoreError;
use crate::job::{JobStatus, TrainingResult};
use crate::types::DbId;

/// The job fields the QC rules look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSnapshot {
    pub id: DbId,
    pub status: JobStatus,
    pub segment_id: DbId,
    pub group_id: DbId,
    pub worker_id: Option<DbId>,
    /// Set once the job has been moved onto a training segment.
    pub redirected_from_segment_id: Option<DbId>,
    pub training_result: TrainingResult,
}

impl JobSnapshot {
    pub fn is_redirected(&self) -> bool {
        self.redirected_from_segment_id.is_some()
    }
}

/// The video a job was offered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoPairing {
    pub video_id: DbId,
    pub is_for_training: bool,
    pub train_with: Option<DbId>,
}

/// First job of the first segment of a training video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CanonicalTraining {
    pub video_id: DbId,
    pub segment_id: DbId,
    pub job_id: DbId,
    pub group_id: DbId,
}

/// A job to be inserted as a replacement for a redirected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReplacementJob {
    pub segment_id: DbId,
    pub group_id: DbId,
    pub replacement_of_job_id: DbId,
    pub status: JobStatus,
}

/// Every change `mark_as_training` makes, computed up front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainingRedirect {
    pub job_id: DbId,
    pub original_segment_id: DbId,
    pub original_group_id: DbId,
    /// New segment and group of the redirected job.
    pub segment_id: DbId,
    pub group_id: DbId,
    pub status: JobStatus,
    pub replacement: ReplacementJob,
    /// Ground-truth job the redirected result will be compared against.
    pub training_job_id: DbId,
}

/// Every change `mark_training_result` makes, computed up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrainingEvaluation {
    pub job_id: DbId,
    pub worker_id: DbId,
    pub result: TrainingResult,
    pub status: JobStatus,
    /// Value for the worker's `verified` flag.
    pub verified: bool,
    /// Whether the worker must be blocked.
    pub block: bool,
}

/// Resolve the canonical training job for a video.
///
/// A video without `train_with` is not trainable (`InvalidState`). A video
/// whose training video has no segment or no job was set up incorrectly by
/// ingestion (`Integrity`).
pub fn resolve_canonical_training(
    video: &VideoPairing,
    canonical: Option<CanonicalTraining>,
) -> Result<CanonicalTraining, CoreError> {
    if video.is_for_training {
        return Err(CoreError::InvalidState(format!(
            "video {} is a training video and cannot be probed",
            video.video_id
        )));
    }
    let Some(training_id) = video.train_with else {
        return Err(CoreError::InvalidState(format!(
            "video {} is not paired with a training video",
            video.video_id
        )));
    };
    match canonical {
        Some(c) if c.video_id == training_id => Ok(c),
        Some(c) => Err(CoreError::Integrity(format!(
            "canonical training job {} belongs to video {}, expected {training_id}",
            c.job_id, c.video_id
        ))),
        None => Err(CoreError::Integrity(format!(
            "training video {training_id} of video {} has no segment with a job",
            video.video_id
        ))),
    }
}

/// Plan redirecting `job` onto the canonical training segment.
///
/// Fails with `InvalidState` if the job was already redirected or is not
/// submitted; a failed plan means nothing is written.
pub fn plan_training_redirect(
    job: &JobSnapshot,
    video: &VideoPairing,
    canonical: Option<CanonicalTraining>,
) -> Result<TrainingRedirect, CoreError> {
    if job.is_redirected() {
        return Err(CoreError::InvalidState(format!(
            "job {} has already been redirected to a training segment",
            job.id
        )));
    }
    let status = job.status.transition(JobStatus::TrainingPending)?;
    let canonical = resolve_canonical_training(video, canonical)?;

    Ok(TrainingRedirect {
        job_id: job.id,
        original_segment_id: job.segment_id,
        original_group_id: job.group_id,
        segment_id: canonical.segment_id,
        group_id: canonical.group_id,
        status,
        replacement: ReplacementJob {
            segment_id: job.segment_id,
            group_id: job.group_id,
            replacement_of_job_id: job.id,
            status: JobStatus::Open,
        },
        training_job_id: canonical.job_id,
    })
}

/// Plan recording the training result of a redirected job.
pub fn plan_training_evaluation(
    job: &JobSnapshot,
    passed: bool,
) -> Result<TrainingEvaluation, CoreError> {
    if !job.is_redirected() {
        return Err(CoreError::InvalidState(format!(
            "job {} was never redirected to a training segment",
            job.id
        )));
    }
    if job.training_result != TrainingResult::Unevaluated {
        return Err(CoreError::InvalidState(format!(
            "job {} already has a training result",
            job.id
        )));
    }
    let status = job.status.transition(JobStatus::Evaluated)?;
    let worker_id = job.worker_id.ok_or_else(|| {
        CoreError::InvalidState(format!("job {} has no assigned worker", job.id))
    })?;

    Ok(TrainingEvaluation {
        job_id: job.id,
        worker_id,
        result: TrainingResult::from_passed(passed),
        status,
        verified: passed,
        block: !passed,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
