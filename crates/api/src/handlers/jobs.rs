//! Handlers for the job lifecycle: assignment, annotation capture,
//! submission, quality control and bonus evaluation.
//!
//! Multi-entity operations run through `vatic_db::workflow`, which locks the
//! job row for the duration of its transaction.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use vatic_core::error::CoreError;
use vatic_core::types::DbId;
use vatic_db::collaborators::Collaborator;
use vatic_db::models::job::{CreateJob, Job, MarkTrainingResult};
use vatic_db::models::path::CreatePath;
use vatic_db::repositories::{BonusAwardRepo, JobRepo, PathRepo};
use vatic_db::workflow;

use crate::error::{AppError, AppResult};
use crate::handlers::segments::ensure_segment_exists;
use crate::response::DataResponse;
use crate::state::AppState;

/// Verify that a job exists, returning the full row.
async fn ensure_job_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<Job> {
    JobRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Job", id }))
}

// ---------------------------------------------------------------------------
// Assignment
// ---------------------------------------------------------------------------

/// GET /api/v1/segments/{id}/jobs
pub async fn list_jobs(
    State(state): State<AppState>,
    Path(segment_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_segment_exists(&state.pool, segment_id).await?;
    let jobs = JobRepo::list_by_segment(&state.pool, segment_id).await?;
    Ok(Json(DataResponse { data: jobs }))
}

/// POST /api/v1/segments/{id}/jobs
///
/// Create an open job on the segment, optionally assigned to a worker.
pub async fn create_job(
    State(state): State<AppState>,
    Path(segment_id): Path<DbId>,
    Json(mut input): Json<CreateJob>,
) -> AppResult<impl IntoResponse> {
    ensure_segment_exists(&state.pool, segment_id).await?;
    input.segment_id = segment_id;

    let job = JobRepo::create(&state.pool, &input).await?;
    tracing::info!(
        job_id = job.id,
        segment_id,
        group_id = job.group_id,
        worker_id = ?job.worker_id,
        "Job created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: job })))
}

/// GET /api/v1/jobs/{id}
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let job = ensure_job_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: job }))
}

// ---------------------------------------------------------------------------
// Annotation
// ---------------------------------------------------------------------------

/// GET /api/v1/jobs/{id}/paths
pub async fn list_paths(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_job_exists(&state.pool, id).await?;
    let paths = PathRepo::list_by_job(&state.pool, id).await?;
    Ok(Json(DataResponse { data: paths }))
}

/// POST /api/v1/jobs/{id}/paths
///
/// Record one annotated object (a path and its boxes) on an open job.
pub async fn record_path(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreatePath>,
) -> AppResult<impl IntoResponse> {
    let path = workflow::record_path(&state.pool, id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: path })))
}

/// POST /api/v1/jobs/{id}/submit
pub async fn submit_job(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let job = workflow::submit_job(&state.pool, id).await?;
    Ok(Json(DataResponse { data: job }))
}

// ---------------------------------------------------------------------------
// Quality control
// ---------------------------------------------------------------------------

/// POST /api/v1/jobs/{id}/mark-training
///
/// Redirect a submitted job onto its video's training segment. Returns the
/// redirected job, the replacement job and the ground-truth job.
pub async fn mark_as_training(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let assignment = workflow::mark_as_training(&state.pool, id).await?;
    Ok(Json(DataResponse { data: assignment }))
}

/// POST /api/v1/jobs/{id}/training-result
pub async fn mark_training_result(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<MarkTrainingResult>,
) -> AppResult<impl IntoResponse> {
    let job = workflow::mark_training_result(&state.pool, Collaborator::Database, id, input.passed)
        .await?;
    Ok(Json(DataResponse { data: job }))
}

// ---------------------------------------------------------------------------
// Bonuses
// ---------------------------------------------------------------------------

/// GET /api/v1/jobs/{id}/bonuses
pub async fn list_bonuses(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_job_exists(&state.pool, id).await?;
    let awards = BonusAwardRepo::list_by_job(&state.pool, id).await?;
    Ok(Json(DataResponse { data: awards }))
}

/// POST /api/v1/jobs/{id}/bonuses
///
/// Award every bonus schedule of the job's video and finalize the job.
pub async fn award_bonuses(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let payments = workflow::award_bonuses(&state.pool, Collaborator::Database, id).await?;
    Ok(Json(DataResponse { data: payments }))
}
