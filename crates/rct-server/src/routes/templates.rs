use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use rct_core::entities::{NewTemplate, QuestionnaireTemplate};
use rct_core::responses::TemplateDetail;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_templates(
    State(state): State<AppState>,
) -> Result<Json<Vec<QuestionnaireTemplate>>, ApiError> {
    Ok(Json(state.service.list_templates().await?))
}

pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TemplateDetail>, ApiError> {
    Ok(Json(state.service.get_template_detail(id).await?))
}

/// Create a template with its questions and choices.
pub async fn create_template(
    State(state): State<AppState>,
    Json(new): Json<NewTemplate>,
) -> Result<(StatusCode, Json<TemplateDetail>), ApiError> {
    let detail = state.service.create_template(&new).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}
