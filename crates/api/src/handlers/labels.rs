use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use vatic_db::models::label::CreateLabel;
use vatic_db::repositories::LabelRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateLabelRequest {
    #[validate(length(min = 1, max = 250))]
    pub text: String,
}

/// GET /api/v1/labels
pub async fn list_labels(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let labels = LabelRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: labels }))
}

/// POST /api/v1/labels
///
/// Add a label to the vocabulary. Label text is unique.
pub async fn create_label(
    State(state): State<AppState>,
    Json(input): Json<CreateLabelRequest>,
) -> AppResult<impl IntoResponse> {
    let input = CreateLabelRequest {
        text: input.text.trim().to_string(),
    };
    input.validate()?;

    let label = LabelRepo::create(&state.pool, &CreateLabel { text: input.text }).await?;
    tracing::info!(label_id = label.id, text = %label.text, "Label created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: label })))
}
