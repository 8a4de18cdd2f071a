//! Route definitions for video ingestion and per-video resources.

use axum::routing::get;
use axum::Router;

use crate::handlers::{segments, videos};
use crate::state::AppState;

/// Video routes mounted at `/videos`.
///
/// ```text
/// GET    /                          -> list_videos
/// POST   /                          -> create_video
/// GET    /{id}                      -> get_video
/// GET    /{id}/labels               -> list_video_labels
/// POST   /{id}/labels               -> attach_label
/// GET    /{id}/segments             -> list_segments
/// POST   /{id}/segments             -> create_segment
/// GET    /{id}/bonus-schedules      -> list_bonus_schedules
/// POST   /{id}/bonus-schedules      -> create_bonus_schedule
/// GET    /{id}/frames/{frame}       -> get_frame
/// GET    /{id}/training-pairs       -> get_training_pairs
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(videos::list_videos).post(videos::create_video))
        .route("/{id}", get(videos::get_video))
        .route(
            "/{id}/labels",
            get(videos::list_video_labels).post(videos::attach_label),
        )
        .route(
            "/{id}/segments",
            get(segments::list_segments).post(segments::create_segment),
        )
        .route(
            "/{id}/bonus-schedules",
            get(videos::list_bonus_schedules).post(videos::create_bonus_schedule),
        )
        .route("/{id}/frames/{frame}", get(videos::get_frame))
        .route("/{id}/training-pairs", get(videos::get_training_pairs))
}
