use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use vatic_core::error::CoreError;
use vatic_core::types::DbId;
use vatic_core::video::FrameRange;
use vatic_db::models::segment::{CreateSegment, Segment};
use vatic_db::repositories::SegmentRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::videos::ensure_video_exists;
use crate::response::DataResponse;
use crate::state::AppState;

/// Verify that a segment exists, returning the full row.
pub(crate) async fn ensure_segment_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<Segment> {
    SegmentRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Segment",
            id,
        }))
}

/// GET /api/v1/videos/{id}/segments
pub async fn list_segments(
    State(state): State<AppState>,
    Path(video_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_video_exists(&state.pool, video_id).await?;
    let segments = SegmentRepo::list_by_video(&state.pool, video_id).await?;
    Ok(Json(DataResponse { data: segments }))
}

/// POST /api/v1/videos/{id}/segments
///
/// The range must satisfy `0 <= start_frame < stop_frame <= total_frames`.
pub async fn create_segment(
    State(state): State<AppState>,
    Path(video_id): Path<DbId>,
    Json(mut input): Json<CreateSegment>,
) -> AppResult<impl IntoResponse> {
    let video = ensure_video_exists(&state.pool, video_id).await?;
    FrameRange::new(input.start_frame, input.stop_frame, video.total_frames)?;
    input.video_id = video_id;

    let segment = SegmentRepo::create(&state.pool, &input).await?;
    tracing::info!(
        video_id,
        segment_id = segment.id,
        start = segment.start_frame,
        stop = segment.stop_frame,
        "Segment created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: segment })))
}

/// GET /api/v1/segments/{id}
pub async fn get_segment(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let segment = ensure_segment_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: segment }))
}
