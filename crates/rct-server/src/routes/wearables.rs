use axum::Json;
use axum::extract::{Path, State};
use rct_core::responses::WearableDashboard;

use crate::error::ApiError;
use crate::state::AppState;

/// 24-hour wearable summary as of now.
pub async fn summary(
    State(state): State<AppState>,
    Path(pid): Path<i64>,
) -> Result<Json<WearableDashboard>, ApiError> {
    Ok(Json(state.service.wearable_dashboard(pid).await?))
}
