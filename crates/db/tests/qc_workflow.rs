//! Integration tests for the training redirect and training evaluation
//! workflows.

mod common;

use std::time::Duration;

use assert_matches::assert_matches;
use common::{
    create_job, create_segment, create_worker, new_training_video, new_video, qc_fixture,
    submitted_fixture, RecordingAccounts,
};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use vatic_core::error::CoreError;
use vatic_core::job::JobStatus;
use vatic_db::collaborators::Collaborator::{Database, External};
use vatic_db::models::video::CreateVideo;
use vatic_db::repositories::{JobRepo, VideoRepo, WorkerRepo};
use vatic_db::workflow::{self, WorkflowError};

async fn replacement_count(pool: &PgPool, job_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM jobs WHERE replacement_of_job_id = $1")
        .bind(job_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// mark_as_training
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn mark_as_training_redirects_job(pool: PgPool) {
    let fx = submitted_fixture(&pool).await;

    let assignment = workflow::mark_as_training(&pool, fx.job.id).await.unwrap();

    let job = assignment.job;
    assert_eq!(job.id, fx.job.id);
    assert_eq!(job.segment_id, fx.training_segment.id);
    assert_eq!(job.group_id, fx.canonical_job.group_id);
    assert_eq!(job.status_id, JobStatus::TrainingPending.id());
    assert_eq!(job.redirected_from_segment_id, Some(fx.segment.id));
    assert_eq!(job.redirected_from_group_id, Some(42));
    assert_eq!(job.worker_id, Some(fx.worker.id));
    assert_eq!(assignment.training_job.id, fx.canonical_job.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mark_as_training_spawns_replacement(pool: PgPool) {
    let fx = submitted_fixture(&pool).await;

    let assignment = workflow::mark_as_training(&pool, fx.job.id).await.unwrap();

    let replacement = assignment.replacement;
    assert_eq!(replacement.segment_id, fx.segment.id);
    assert_eq!(replacement.group_id, 42);
    assert_eq!(replacement.status_id, JobStatus::Open.id());
    assert_eq!(replacement.replacement_of_job_id, Some(fx.job.id));
    assert_eq!(replacement.worker_id, None);

    assert_eq!(replacement_count(&pool, fx.job.id).await, 1);
    // Only the replacement remains on the original segment.
    let on_segment = JobRepo::list_by_segment(&pool, fx.segment.id).await.unwrap();
    assert_eq!(on_segment.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn canonical_job_is_first_job_of_first_segment(pool: PgPool) {
    let fx = submitted_fixture(&pool).await;
    // A later job on the canonical segment does not change the pick.
    create_job(&pool, fx.training_segment.id, 950, None).await;

    let assignment = workflow::mark_as_training(&pool, fx.job.id).await.unwrap();

    assert_eq!(assignment.training_job.id, fx.canonical_job.id);
    assert_eq!(assignment.job.group_id, 900);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn redirected_worker_job_never_becomes_ground_truth(pool: PgPool) {
    let training = VideoRepo::create(&pool, &new_training_video("gt-harbor"))
        .await
        .unwrap();
    let training_segment = create_segment(&pool, training.id, 0, 100).await;
    let video = VideoRepo::create(
        &pool,
        &CreateVideo {
            train_with_id: Some(training.id),
            ..new_video("harbor")
        },
    )
    .await
    .unwrap();
    let segment = create_segment(&pool, video.id, 0, 100).await;
    // The worker job is created before the ground-truth job, so it has the
    // lower id once it sits on the training segment.
    let first = create_job(&pool, segment.id, 7, None).await;
    let ground_truth = create_job(&pool, training_segment.id, 900, None).await;
    let second = create_job(&pool, segment.id, 8, None).await;
    for job in [&first, &second] {
        workflow::submit_job(&pool, job.id).await.unwrap();
    }

    let a = workflow::mark_as_training(&pool, first.id).await.unwrap();
    let b = workflow::mark_as_training(&pool, second.id).await.unwrap();

    assert_eq!(a.job.segment_id, training_segment.id);
    assert_eq!(a.training_job.id, ground_truth.id);
    assert_eq!(b.training_job.id, ground_truth.id);
    assert_eq!(b.job.group_id, 900);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_mark_as_training_is_rejected(pool: PgPool) {
    let fx = submitted_fixture(&pool).await;
    workflow::mark_as_training(&pool, fx.job.id).await.unwrap();

    let second = workflow::mark_as_training(&pool, fx.job.id).await;

    assert_matches!(second, Err(WorkflowError::Core(CoreError::InvalidState(_))));
    assert_eq!(replacement_count(&pool, fx.job.id).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_mark_as_training_redirects_once(pool: PgPool) {
    let fx = submitted_fixture(&pool).await;

    let (a, b) = tokio::join!(
        workflow::mark_as_training(&pool, fx.job.id),
        workflow::mark_as_training(&pool, fx.job.id),
    );

    let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1);
    let failure = if a.is_ok() { b } else { a };
    assert_matches!(failure, Err(WorkflowError::Core(CoreError::InvalidState(_))));
    assert_eq!(replacement_count(&pool, fx.job.id).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn open_job_cannot_be_marked(pool: PgPool) {
    let fx = qc_fixture(&pool).await;

    let result = workflow::mark_as_training(&pool, fx.job.id).await;

    assert_matches!(result, Err(WorkflowError::Core(CoreError::InvalidState(_))));
    let job = JobRepo::find_by_id(&pool, fx.job.id).await.unwrap().unwrap();
    assert_eq!(job.segment_id, fx.segment.id);
    assert_eq!(replacement_count(&pool, fx.job.id).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unpaired_video_is_not_trainable(pool: PgPool) {
    let video = VideoRepo::create(&pool, &new_video("loading-dock")).await.unwrap();
    let segment = create_segment(&pool, video.id, 0, 50).await;
    let job = create_job(&pool, segment.id, 1, None).await;
    workflow::submit_job(&pool, job.id).await.unwrap();

    let result = workflow::mark_as_training(&pool, job.id).await;

    assert_matches!(result, Err(WorkflowError::Core(CoreError::InvalidState(_))));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn training_video_without_jobs_is_integrity_violation(pool: PgPool) {
    let training = VideoRepo::create(&pool, &new_training_video("gt-empty"))
        .await
        .unwrap();
    // A segment with no job is as broken as no segment at all.
    create_segment(&pool, training.id, 0, 10).await;
    let video = VideoRepo::create(
        &pool,
        &CreateVideo {
            train_with_id: Some(training.id),
            ..new_video("crosswalk")
        },
    )
    .await
    .unwrap();
    let segment = create_segment(&pool, video.id, 0, 50).await;
    let job = create_job(&pool, segment.id, 1, None).await;
    workflow::submit_job(&pool, job.id).await.unwrap();

    let result = workflow::mark_as_training(&pool, job.id).await;

    assert_matches!(result, Err(WorkflowError::Core(CoreError::Integrity(_))));
    let job = JobRepo::find_by_id(&pool, job.id).await.unwrap().unwrap();
    assert_eq!(job.status_id, JobStatus::Submitted.id());
    assert_eq!(replacement_count(&pool, job.id).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_job_is_not_found(pool: PgPool) {
    let result = workflow::mark_as_training(&pool, 999_999).await;
    assert_matches!(
        result,
        Err(WorkflowError::Core(CoreError::NotFound { entity: "Job", .. }))
    );
}

// ---------------------------------------------------------------------------
// mark_training_result
// ---------------------------------------------------------------------------

async fn redirected_fixture(pool: &PgPool) -> common::QcFixture {
    let fx = submitted_fixture(pool).await;
    workflow::mark_as_training(pool, fx.job.id).await.unwrap();
    fx
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_training_blocks_worker(pool: PgPool) {
    let fx = redirected_fixture(&pool).await;
    let accounts = RecordingAccounts::default();

    let job = workflow::mark_training_result(&pool, External(&accounts), fx.job.id, false)
        .await
        .unwrap();

    assert_eq!(job.training_result, Some(false));
    assert_eq!(job.status_id, JobStatus::Evaluated.id());
    assert_eq!(*accounts.verified.lock().unwrap(), vec![(fx.worker.id, false)]);
    assert_eq!(*accounts.blocked.lock().unwrap(), vec![fx.worker.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn passed_training_verifies_worker(pool: PgPool) {
    let fx = redirected_fixture(&pool).await;
    let accounts = RecordingAccounts::default();

    let job = workflow::mark_training_result(&pool, External(&accounts), fx.job.id, true)
        .await
        .unwrap();

    assert_eq!(job.training_result, Some(true));
    assert_eq!(*accounts.verified.lock().unwrap(), vec![(fx.worker.id, true)]);
    assert!(accounts.blocked.lock().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn training_result_recorded_once(pool: PgPool) {
    let fx = redirected_fixture(&pool).await;
    let accounts = RecordingAccounts::default();
    workflow::mark_training_result(&pool, External(&accounts), fx.job.id, false)
        .await
        .unwrap();

    let again = workflow::mark_training_result(&pool, External(&accounts), fx.job.id, false)
        .await;

    assert_matches!(again, Err(WorkflowError::Core(CoreError::InvalidState(_))));
    assert_eq!(accounts.blocked.lock().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unredirected_job_cannot_be_evaluated(pool: PgPool) {
    let fx = submitted_fixture(&pool).await;
    let accounts = RecordingAccounts::default();

    let result = workflow::mark_training_result(&pool, External(&accounts), fx.job.id, true)
        .await;

    assert_matches!(result, Err(WorkflowError::Core(CoreError::InvalidState(_))));
    assert!(accounts.verified.lock().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn evaluation_requires_assigned_worker(pool: PgPool) {
    let fx = qc_fixture(&pool).await;
    let job = create_job(&pool, fx.segment.id, 43, None).await;
    workflow::submit_job(&pool, job.id).await.unwrap();
    workflow::mark_as_training(&pool, job.id).await.unwrap();
    let accounts = RecordingAccounts::default();

    let result = workflow::mark_training_result(&pool, External(&accounts), job.id, true)
        .await;

    assert_matches!(result, Err(WorkflowError::Core(CoreError::InvalidState(_))));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn collaborator_failure_rolls_back_evaluation(pool: PgPool) {
    let fx = redirected_fixture(&pool).await;
    let accounts = RecordingAccounts {
        fail_block: true,
        ..Default::default()
    };

    let result = workflow::mark_training_result(&pool, External(&accounts), fx.job.id, false)
        .await;

    assert_matches!(result, Err(WorkflowError::Core(CoreError::Internal(_))));
    let job = JobRepo::find_by_id(&pool, fx.job.id).await.unwrap().unwrap();
    assert_eq!(job.training_result, None);
    assert_eq!(job.status_id, JobStatus::TrainingPending.id());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn database_accounts_block_worker(pool: PgPool) {
    let fx = redirected_fixture(&pool).await;

    workflow::mark_training_result(&pool, Database, fx.job.id, false)
        .await
        .unwrap();

    let worker = WorkerRepo::find_by_id(&pool, fx.worker.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!worker.verified);
    assert!(worker.blocked);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn database_accounts_verify_worker(pool: PgPool) {
    let fx = redirected_fixture(&pool).await;
    let other = create_worker(&pool, "Z9Y8X7").await;

    workflow::mark_training_result(&pool, Database, fx.job.id, true)
        .await
        .unwrap();

    let worker = WorkerRepo::find_by_id(&pool, fx.worker.id)
        .await
        .unwrap()
        .unwrap();
    assert!(worker.verified);
    assert!(!worker.blocked);
    let other = WorkerRepo::find_by_id(&pool, other.id).await.unwrap().unwrap();
    assert!(!other.verified);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn database_accounts_share_the_workflow_connection(
    pool_options: PgPoolOptions,
    connect_options: PgConnectOptions,
) {
    let pool = pool_options
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(connect_options)
        .await
        .unwrap();
    let fx = redirected_fixture(&pool).await;

    let job = workflow::mark_training_result(&pool, Database, fx.job.id, false)
        .await
        .unwrap();

    assert_eq!(job.status_id, JobStatus::Evaluated.id());
    let worker = WorkerRepo::find_by_id(&pool, fx.worker.id)
        .await
        .unwrap()
        .unwrap();
    assert!(worker.blocked);
}
