pub mod health;
pub mod jobs;
pub mod labels;
pub mod segments;
pub mod videos;
pub mod workers;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /labels                              list, create
///
/// /workers                             create
/// /workers/{id}                        get
///
/// /videos                              list, ingest
/// /videos/{id}                         get
/// /videos/{id}/labels                  list, attach
/// /videos/{id}/segments                list, create
/// /videos/{id}/bonus-schedules         list, create
/// /videos/{id}/frames/{frame}          frame storage path
/// /videos/{id}/training-pairs          training video and reverse lookup
///
/// /segments/{id}                       get
/// /segments/{id}/jobs                  list, create
///
/// /jobs/{id}                           get
/// /jobs/{id}/paths                     list, record
/// /jobs/{id}/submit                    Open -> Submitted (POST)
/// /jobs/{id}/mark-training             redirect onto training segment (POST)
/// /jobs/{id}/training-result           record training result (POST)
/// /jobs/{id}/bonuses                   list awards, award and finalize (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/labels", labels::router())
        .nest("/workers", workers::router())
        .nest("/videos", videos::router())
        .nest("/segments", segments::router())
        .nest("/jobs", jobs::router())
}
