use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use rct_core::entities::VisitAssessment;
use rct_core::responses::{QuestionnaireForm, VisitQuestionnaires};
use rct_core::scoring::AnswerSubmission;
use serde::Deserialize;

use crate::error::{ApiError, Notice};
use crate::routes::visit_path;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AssignTemplate {
    #[serde(default)]
    pub template_id: Option<i64>,
}

pub async fn list_for_visit(
    State(state): State<AppState>,
    Path((pid, vid)): Path<(i64, i64)>,
) -> Result<Json<VisitQuestionnaires>, ApiError> {
    Ok(Json(state.service.visit_questionnaires(pid, vid).await?))
}

/// Assign a template to the visit. Re-assigning returns the existing
/// assessment.
pub async fn assign(
    State(state): State<AppState>,
    Path((pid, vid)): Path<(i64, i64)>,
    Json(body): Json<AssignTemplate>,
) -> Result<(StatusCode, Json<VisitAssessment>), ApiError> {
    let Some(template_id) = body.template_id else {
        let back = format!("{}/questionnaires", visit_path(pid, vid));
        return Err(Notice::warning(back, "Please select a questionnaire to add.").into());
    };
    let assessment = state.service.assign_template(pid, vid, template_id).await?;
    Ok((StatusCode::CREATED, Json(assessment)))
}

pub async fn form(
    State(state): State<AppState>,
    Path((pid, vid, aid)): Path<(i64, i64, i64)>,
) -> Result<Json<QuestionnaireForm>, ApiError> {
    Ok(Json(state.service.questionnaire_form(pid, vid, aid).await?))
}

pub async fn submit(
    State(state): State<AppState>,
    Path((pid, vid, aid)): Path<(i64, i64, i64)>,
    Json(submission): Json<AnswerSubmission>,
) -> Result<Json<VisitAssessment>, ApiError> {
    let assessment = state
        .service
        .submit_answers(pid, vid, aid, &submission)
        .await?;
    tracing::info!(assessment_id = aid, total_score = ?assessment.total_score, "questionnaire submitted");
    Ok(Json(assessment))
}
