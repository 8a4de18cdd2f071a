use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use vatic_core::error::CoreError;
use vatic_core::types::DbId;
use vatic_db::models::worker::CreateWorker;
use vatic_db::repositories::WorkerRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Registration of a marketplace worker by its external identifier.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateWorkerRequest {
    #[validate(length(min = 1, max = 64))]
    pub external_id: String,
}

/// POST /api/v1/workers
pub async fn create_worker(
    State(state): State<AppState>,
    Json(input): Json<CreateWorkerRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let worker = WorkerRepo::create(
        &state.pool,
        &CreateWorker {
            external_id: input.external_id,
        },
    )
    .await?;
    tracing::info!(worker_id = worker.id, "Worker registered");

    Ok((StatusCode::CREATED, Json(DataResponse { data: worker })))
}

/// GET /api/v1/workers/{id}
pub async fn get_worker(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let worker = WorkerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Worker",
            id,
        }))?;
    Ok(Json(DataResponse { data: worker }))
}
