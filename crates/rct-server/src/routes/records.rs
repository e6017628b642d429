use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use rct_core::category::DataCategory;
use rct_core::entities::Neuroimaging;
use rct_core::forms::RecordForm;
use rct_core::responses::DataEntryView;
use serde::Deserialize;

use crate::error::{ApiError, Notice};
use crate::routes::visit_path;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub filename: Option<String>,
}

/// Resolve a category slug, or send the user back to the visit dashboard.
///
/// The visit is checked first so a missing visit is a 404, never a redirect
/// to a dashboard that does not exist.
async fn resolve_category(
    state: &AppState,
    pid: i64,
    vid: i64,
    slug: &str,
) -> Result<DataCategory, ApiError> {
    match DataCategory::from_slug(slug) {
        Ok(category) => Ok(category),
        Err(e) => {
            state.service.get_visit(pid, vid).await?;
            Err(Notice::error(visit_path(pid, vid), e.to_string()).into())
        }
    }
}

/// Open a category's record for data entry, creating it on first access.
pub async fn open_record(
    State(state): State<AppState>,
    Path((pid, vid, slug)): Path<(i64, i64, String)>,
) -> Result<Json<DataEntryView>, ApiError> {
    let category = resolve_category(&state, pid, vid, &slug).await?;
    Ok(Json(
        state
            .service
            .get_or_create_record(pid, vid, category)
            .await?,
    ))
}

pub async fn save_record(
    State(state): State<AppState>,
    Path((pid, vid, slug)): Path<(i64, i64, String)>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<DataEntryView>, ApiError> {
    let category = resolve_category(&state, pid, vid, &slug).await?;
    let form = RecordForm::from_json(category, body)?;
    let view = state.service.save_record(pid, vid, form).await?;
    tracing::info!(visit_id = vid, category = %category, "record saved");
    Ok(Json(view))
}

/// Store the raw request body as the visit's MRI report.
pub async fn upload_mri_report(
    State(state): State<AppState>,
    Path((pid, vid)): Path<(i64, i64)>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<Json<Neuroimaging>, ApiError> {
    if body.is_empty() {
        return Err(ApiError::BadRequest("report body is empty".into()));
    }
    let file_name = query.filename.as_deref().unwrap_or("report.pdf");
    let record = state
        .service
        .attach_mri_report(&state.media, pid, vid, file_name, &body)
        .await?;
    Ok(Json(record))
}
