//! Handlers for video ingestion and per-video resources.
//!
//! Ingestion validates the video's shape and its training pairing before
//! inserting. A video paired with a training video may later have its jobs
//! redirected for quality control, so the pairing rules are checked here
//! rather than at redirect time.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vatic_core::bonus::BonusSchedule;
use vatic_core::error::CoreError;
use vatic_core::frames;
use vatic_core::types::DbId;
use vatic_core::video;
use vatic_db::models::bonus::{BonusScheduleRow, CreateBonusSchedule};
use vatic_db::models::video::{CreateVideo, Video};
use vatic_db::repositories::{BonusScheduleRepo, LabelRepo, VideoRepo};
use vatic_db::workflow;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ListVideosParams {
    /// Include training videos (default: false).
    pub include_training: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct AttachLabelRequest {
    pub label_id: DbId,
}

/// A bonus schedule with its worker-facing description.
#[derive(Debug, Serialize)]
pub struct BonusScheduleView {
    #[serde(flatten)]
    pub schedule: BonusScheduleRow,
    pub description: ScheduleDescription,
}

#[derive(Debug, Serialize)]
pub struct ScheduleDescription {
    pub rate: Decimal,
    pub text: &'static str,
}

impl BonusScheduleView {
    fn from_row(row: BonusScheduleRow) -> Result<Self, CoreError> {
        let (rate, text) = row.schedule()?.description();
        Ok(Self {
            schedule: row,
            description: ScheduleDescription { rate, text },
        })
    }
}

#[derive(Debug, Serialize)]
pub struct FrameLocation {
    pub video_id: DbId,
    pub frame: i64,
    /// Storage path under the video's location.
    pub path: String,
    /// Public URL, when `FRAME_BASE_URL` is configured.
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TrainingPairsView {
    pub video_id: DbId,
    pub is_for_training: bool,
    /// Training video this video is checked against.
    pub training_for: Option<DbId>,
    /// Videos checked against this one, if it is a training video.
    pub trained_by: Vec<DbId>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Verify that a video exists, returning the full row.
pub(crate) async fn ensure_video_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<Video> {
    VideoRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Video",
            id,
        }))
}

// ---------------------------------------------------------------------------
// Videos
// ---------------------------------------------------------------------------

/// GET /api/v1/videos
pub async fn list_videos(
    State(state): State<AppState>,
    Query(params): Query<ListVideosParams>,
) -> AppResult<impl IntoResponse> {
    let videos = VideoRepo::list(&state.pool, params.include_training.unwrap_or(false)).await?;
    Ok(Json(DataResponse { data: videos }))
}

/// POST /api/v1/videos
///
/// Ingest a video. When `train_with_id` is given it must name an existing,
/// unpaired training video.
pub async fn create_video(
    State(state): State<AppState>,
    Json(input): Json<CreateVideo>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    if let Some(train_with_id) = input.train_with_id {
        let target = VideoRepo::find_by_id(&state.pool, train_with_id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Validation(format!(
                    "train_with_id {train_with_id} does not reference a video"
                )))
            })?;
        video::validate_train_with(
            None,
            input.is_for_training.unwrap_or(false),
            &target.training_target(),
        )?;
    }

    let video = VideoRepo::create(&state.pool, &input).await?;
    tracing::info!(
        video_id = video.id,
        slug = %video.slug,
        train_with_id = ?video.train_with_id,
        is_for_training = video.is_for_training,
        "Video ingested"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: video })))
}

/// GET /api/v1/videos/{id}
pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let video = ensure_video_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: video }))
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// GET /api/v1/videos/{id}/labels
pub async fn list_video_labels(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_video_exists(&state.pool, id).await?;
    let labels = LabelRepo::list_for_video(&state.pool, id).await?;
    Ok(Json(DataResponse { data: labels }))
}

/// POST /api/v1/videos/{id}/labels
///
/// Declare a label as annotatable on the video. Idempotent; returns the
/// video's full label list.
pub async fn attach_label(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AttachLabelRequest>,
) -> AppResult<impl IntoResponse> {
    ensure_video_exists(&state.pool, id).await?;
    LabelRepo::find_by_id(&state.pool, input.label_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Label",
            id: input.label_id,
        }))?;

    if VideoRepo::attach_label(&state.pool, id, input.label_id).await? {
        tracing::info!(video_id = id, label_id = input.label_id, "Label attached");
    }

    let labels = LabelRepo::list_for_video(&state.pool, id).await?;
    Ok(Json(DataResponse { data: labels }))
}

// ---------------------------------------------------------------------------
// Bonus schedules
// ---------------------------------------------------------------------------

/// GET /api/v1/videos/{id}/bonus-schedules
pub async fn list_bonus_schedules(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_video_exists(&state.pool, id).await?;
    let views = BonusScheduleRepo::list_by_video(&state.pool, id)
        .await?
        .into_iter()
        .map(BonusScheduleView::from_row)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(DataResponse { data: views }))
}

/// POST /api/v1/videos/{id}/bonus-schedules
pub async fn create_bonus_schedule(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<CreateBonusSchedule>,
) -> AppResult<impl IntoResponse> {
    BonusSchedule::from_parts(&input.kind, input.rate)?;
    ensure_video_exists(&state.pool, id).await?;
    input.video_id = id;

    let row = BonusScheduleRepo::create(&state.pool, &input).await?;
    tracing::info!(
        video_id = id,
        schedule_id = row.id,
        kind = %row.kind,
        rate = %row.rate,
        "Bonus schedule created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: BonusScheduleView::from_row(row)?,
        }),
    ))
}

// ---------------------------------------------------------------------------
// Frames and training pairs
// ---------------------------------------------------------------------------

/// GET /api/v1/videos/{id}/frames/{frame}
pub async fn get_frame(
    State(state): State<AppState>,
    Path((id, frame)): Path<(DbId, i64)>,
) -> AppResult<impl IntoResponse> {
    let video = ensure_video_exists(&state.pool, id).await?;
    let path = video.frame_path(frame)?;
    let url = match &state.config.frame_base_url {
        Some(base) => Some(frames::video_frame_path(
            frame,
            video.total_frames,
            Some(&format!("{base}/{}", video.slug)),
        )?),
        None => None,
    };

    Ok(Json(DataResponse {
        data: FrameLocation {
            video_id: id,
            frame,
            path,
            url,
        },
    }))
}

/// GET /api/v1/videos/{id}/training-pairs
pub async fn get_training_pairs(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let video = ensure_video_exists(&state.pool, id).await?;
    let pairs = workflow::load_training_pairs(&state.pool).await?;

    Ok(Json(DataResponse {
        data: TrainingPairsView {
            video_id: id,
            is_for_training: video.is_for_training,
            training_for: pairs.training_for(id),
            trained_by: pairs.trained_by(id).to_vec(),
        },
    }))
}
