//! Job lifecycle states and the training-result tri-state.
//!
//! ```text
//! Open -> Submitted -> Finalized
//!            |
//!            +-> TrainingPending -> Evaluated -> Finalized
//! ```
//!
//! Status discriminants match the seed rows of the `job_statuses` table.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Being annotated; paths and boxes may change.
    Open = 1,
    /// Annotations finalized, awaiting QC selection and bonus evaluation.
    Submitted = 2,
    /// Redirected onto a training segment, awaiting evaluation.
    TrainingPending = 3,
    /// Training result recorded.
    Evaluated = 4,
    /// Bonuses awarded; terminal.
    Finalized = 5,
}

impl JobStatus {
    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    pub fn from_id(id: StatusId) -> Result<Self, CoreError> {
        match id {
            1 => Ok(Self::Open),
            2 => Ok(Self::Submitted),
            3 => Ok(Self::TrainingPending),
            4 => Ok(Self::Evaluated),
            5 => Ok(Self::Finalized),
            other => Err(CoreError::Internal(format!("unknown job status id {other}"))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Submitted => "submitted",
            Self::TrainingPending => "training_pending",
            Self::Evaluated => "evaluated",
            Self::Finalized => "finalized",
        }
    }

    pub fn can_transition_to(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (Self::Open, Self::Submitted)
                | (Self::Submitted, Self::TrainingPending)
                | (Self::Submitted, Self::Finalized)
                | (Self::TrainingPending, Self::Evaluated)
                | (Self::Evaluated, Self::Finalized)
        )
    }

    /// Move to `next`, failing with `InvalidState` on an illegal edge.
    pub fn transition(self, next: JobStatus) -> Result<JobStatus, CoreError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidState(format!(
                "job cannot move from {} to {}",
                self.name(),
                next.name()
            )))
        }
    }

    /// Annotations may only be written while the job is open.
    pub fn ensure_open(self) -> Result<(), CoreError> {
        if self == Self::Open {
            Ok(())
        } else {
            Err(CoreError::InvalidState(format!(
                "job is {} and its annotations are read-only",
                self.name()
            )))
        }
    }
}

impl From<JobStatus> for StatusId {
    fn from(value: JobStatus) -> Self {
        value as StatusId
    }
}

/// Outcome of a training evaluation, stored as a nullable boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingResult {
    Unevaluated,
    Passed,
    Failed,
}

impl TrainingResult {
    pub fn from_passed(passed: bool) -> Self {
        if passed {
            Self::Passed
        } else {
            Self::Failed
        }
    }

    pub fn as_column(self) -> Option<bool> {
        match self {
            Self::Unevaluated => None,
            Self::Passed => Some(true),
            Self::Failed => Some(false),
        }
    }
}

impl From<Option<bool>> for TrainingResult {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => Self::Unevaluated,
            Some(passed) => Self::from_passed(passed),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const ALL: [JobStatus; 5] = [
        JobStatus::Open,
        JobStatus::Submitted,
        JobStatus::TrainingPending,
        JobStatus::Evaluated,
        JobStatus::Finalized,
    ];

    #[test]
    fn status_ids_round_trip() {
        for status in ALL {
            assert_eq!(JobStatus::from_id(status.id()).unwrap(), status);
        }
        assert!(JobStatus::from_id(0).is_err());
    }

    #[test]
    fn ordinary_path_skips_training() {
        assert!(JobStatus::Open.can_transition_to(JobStatus::Submitted));
        assert!(JobStatus::Submitted.can_transition_to(JobStatus::Finalized));
    }

    #[test]
    fn qc_path_goes_through_evaluation() {
        assert!(JobStatus::Submitted.can_transition_to(JobStatus::TrainingPending));
        assert!(JobStatus::TrainingPending.can_transition_to(JobStatus::Evaluated));
        assert!(JobStatus::Evaluated.can_transition_to(JobStatus::Finalized));
        assert!(!JobStatus::TrainingPending.can_transition_to(JobStatus::Finalized));
    }

    #[test]
    fn finalized_is_terminal() {
        for next in ALL {
            assert_matches!(
                JobStatus::Finalized.transition(next),
                Err(CoreError::InvalidState(_))
            );
        }
    }

    #[test]
    fn only_open_jobs_accept_annotations() {
        assert!(JobStatus::Open.ensure_open().is_ok());
        assert!(JobStatus::Submitted.ensure_open().is_err());
    }

    #[test]
    fn training_result_column_mapping() {
        assert_eq!(TrainingResult::from(None), TrainingResult::Unevaluated);
        assert_eq!(TrainingResult::from(Some(false)), TrainingResult::Failed);
        assert_eq!(TrainingResult::Passed.as_column(), Some(true));
    }
}
