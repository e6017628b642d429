use axum::Json;
use axum::extract::State;
use rct_core::entities::Participant;

use crate::error::ApiError;
use crate::state::AppState;

/// The ten most recently created participants.
pub async fn recent_participants(
    State(state): State<AppState>,
) -> Result<Json<Vec<Participant>>, ApiError> {
    Ok(Json(state.service.recent_participants().await?))
}
