use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use rct_core::entities::{NewParticipant, Participant};
use rct_core::enums::ParticipantStatus;
use rct_core::responses::{ParticipantCreated, ParticipantDetail};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: ParticipantStatus,
}

pub async fn list_participants(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Participant>>, ApiError> {
    let limit = query.limit.unwrap_or(state.default_limit);
    Ok(Json(state.service.list_participants(limit).await?))
}

/// Creates the participant and its Baseline visit.
pub async fn create_participant(
    State(state): State<AppState>,
    Json(new): Json<NewParticipant>,
) -> Result<(StatusCode, Json<ParticipantCreated>), ApiError> {
    let created = state.service.create_participant(new).await?;
    tracing::info!(
        participant_id = %created.participant.participant_id,
        "participant created"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn participant_detail(
    State(state): State<AppState>,
    Path(pid): Path<i64>,
) -> Result<Json<ParticipantDetail>, ApiError> {
    Ok(Json(state.service.participant_detail(pid).await?))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(pid): Path<i64>,
    Json(change): Json<StatusChange>,
) -> Result<Json<Participant>, ApiError> {
    Ok(Json(
        state
            .service
            .update_participant_status(pid, change.status)
            .await?,
    ))
}
