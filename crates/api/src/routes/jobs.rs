//! Route definitions for the job lifecycle and quality control.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::jobs;
use crate::state::AppState;

/// Job routes mounted at `/jobs`.
///
/// ```text
/// GET    /{id}                    -> get_job
/// GET    /{id}/paths              -> list_paths
/// POST   /{id}/paths              -> record_path
/// POST   /{id}/submit             -> submit_job
/// POST   /{id}/mark-training      -> mark_as_training
/// POST   /{id}/training-result    -> mark_training_result
/// GET    /{id}/bonuses            -> list_bonuses
/// POST   /{id}/bonuses            -> award_bonuses
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(jobs::get_job))
        .route("/{id}/paths", get(jobs::list_paths).post(jobs::record_path))
        .route("/{id}/submit", post(jobs::submit_job))
        .route("/{id}/mark-training", post(jobs::mark_as_training))
        .route("/{id}/training-result", post(jobs::mark_training_result))
        .route(
            "/{id}/bonuses",
            get(jobs::list_bonuses).post(jobs::award_bonuses),
        )
}
