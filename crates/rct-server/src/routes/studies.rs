use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use rct_core::entities::{NewStudy, Study};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_studies(State(state): State<AppState>) -> Result<Json<Vec<Study>>, ApiError> {
    Ok(Json(state.service.list_studies().await?))
}

pub async fn create_study(
    State(state): State<AppState>,
    Json(new): Json<NewStudy>,
) -> Result<(StatusCode, Json<Study>), ApiError> {
    let study = state.service.create_study(&new).await?;
    Ok((StatusCode::CREATED, Json(study)))
}

pub async fn get_study(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Study>, ApiError> {
    Ok(Json(state.service.get_study(id).await?))
}
