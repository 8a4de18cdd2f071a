use axum::routing::{get, post};
use axum::Router;

use crate::handlers::workers;
use crate::state::AppState;

/// Worker routes mounted at `/workers`.
///
/// ```text
/// POST   /        -> create_worker
/// GET    /{id}    -> get_worker
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(workers::create_worker))
        .route("/{id}", get(workers::get_worker))
}
