//! Job entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vatic_core::error::CoreError;
use vatic_core::job::{JobStatus, StatusId};
use vatic_core::qc::JobSnapshot;
use vatic_core::types::{DbId, Timestamp};

/// A row from the `jobs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub id: DbId,
    pub segment_id: DbId,
    /// Assignment group used by the marketplace to batch pay and verify.
    pub group_id: DbId,
    pub worker_id: Option<DbId>,
    pub status_id: StatusId,
    pub training_result: Option<bool>,
    pub redirected_from_segment_id: Option<DbId>,
    pub redirected_from_group_id: Option<DbId>,
    pub replacement_of_job_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Job {
    pub fn status(&self) -> Result<JobStatus, CoreError> {
        JobStatus::from_id(self.status_id)
    }

    pub fn snapshot(&self) -> Result<JobSnapshot, CoreError> {
        Ok(JobSnapshot {
            id: self.id,
            status: self.status()?,
            segment_id: self.segment_id,
            group_id: self.group_id,
            worker_id: self.worker_id,
            redirected_from_segment_id: self.redirected_from_segment_id,
            training_result: self.training_result.into(),
        })
    }

    /// Segment the worker was originally offered, before any redirection.
    pub fn offered_segment_id(&self) -> DbId {
        self.redirected_from_segment_id.unwrap_or(self.segment_id)
    }
}

/// DTO for creating a job when a worker accepts a unit of work.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateJob {
    /// Overridden by the URL path in the API.
    #[serde(default)]
    pub segment_id: DbId,
    pub group_id: DbId,
    pub worker_id: Option<DbId>,
}

/// Request body for recording a training result.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MarkTrainingResult {
    pub passed: bool,
}

/// Result of redirecting a job onto its training segment.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingAssignment {
    /// The redirected job, now on the training segment.
    pub job: Job,
    /// New open job on the original segment, to be re-enqueued.
    pub replacement: Job,
    /// Ground-truth job to evaluate the redirected result against.
    pub training_job: Job,
}
