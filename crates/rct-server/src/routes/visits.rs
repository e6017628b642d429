use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use rct_core::entities::Visit;
use rct_core::enums::VisitType;
use rct_core::responses::VisitDashboard;
use rct_db::error::DatabaseError;
use serde::Deserialize;

use crate::error::{ApiError, Notice};
use crate::routes::participant_path;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CreateVisit {
    #[serde(default)]
    pub visit_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChange {
    pub is_complete: bool,
}

fn parse_visit_type(raw: &str) -> Option<VisitType> {
    VisitType::ALL
        .into_iter()
        .find(|vt| vt.as_str().eq_ignore_ascii_case(raw.trim()))
}

/// Create a visit of the requested type.
///
/// A missing type or a type the participant already has is reported as a
/// notice pointing back at the participant page.
pub async fn create_visit(
    State(state): State<AppState>,
    Path(pid): Path<i64>,
    Json(body): Json<CreateVisit>,
) -> Result<(StatusCode, Json<Visit>), ApiError> {
    let back = participant_path(pid);
    let Some(visit_type) = body.visit_type.as_deref().and_then(parse_visit_type) else {
        return Err(Notice::error(back, "Please select a valid visit type.").into());
    };

    match state.service.create_visit(pid, visit_type).await {
        Ok(visit) => {
            tracing::info!(participant_pk = pid, visit_id = visit.id, visit_type = %visit_type, "visit created");
            Ok((StatusCode::CREATED, Json(visit)))
        }
        Err(DatabaseError::Duplicate(message)) => Err(Notice::warning(back, message).into()),
        Err(e) => Err(e.into()),
    }
}

pub async fn visit_dashboard(
    State(state): State<AppState>,
    Path((pid, vid)): Path<(i64, i64)>,
) -> Result<Json<VisitDashboard>, ApiError> {
    Ok(Json(state.service.visit_dashboard(pid, vid).await?))
}

pub async fn set_completion(
    State(state): State<AppState>,
    Path((pid, vid)): Path<(i64, i64)>,
    Json(change): Json<CompletionChange>,
) -> Result<Json<Visit>, ApiError> {
    Ok(Json(
        state
            .service
            .set_visit_complete(pid, vid, change.is_complete)
            .await?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visit_type_parsing_is_lenient_about_case() {
        assert_eq!(parse_visit_type("visit1"), Some(VisitType::Visit1));
        assert_eq!(parse_visit_type(" EXIT "), Some(VisitType::Exit));
        assert_eq!(parse_visit_type(""), None);
        assert_eq!(parse_visit_type("VISIT3"), None);
    }
}
