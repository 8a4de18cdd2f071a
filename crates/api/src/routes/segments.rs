use axum::routing::get;
use axum::Router;

use crate::handlers::{jobs, segments};
use crate::state::AppState;

/// Segment routes mounted at `/segments`.
///
/// ```text
/// GET    /{id}         -> get_segment
/// GET    /{id}/jobs    -> list_jobs
/// POST   /{id}/jobs    -> create_job
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(segments::get_segment))
        .route("/{id}/jobs", get(jobs::list_jobs).post(jobs::create_job))
}
