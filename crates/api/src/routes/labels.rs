//! Route definitions for the label vocabulary.

use axum::routing::get;
use axum::Router;

use crate::handlers::labels;
use crate::state::AppState;

/// Label routes mounted at `/labels`.
///
/// ```text
/// GET    /        -> list_labels
/// POST   /        -> create_label
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(labels::list_labels).post(labels::create_label))
}
