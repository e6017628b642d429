use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use rct_core::errors::CoreError;
use rct_core::validation::{FieldError, ValidationErrors};
use rct_db::error::DatabaseError;
use serde::Serialize;

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Conflict(String),
    Validation(ValidationErrors),
    /// A recoverable workflow outcome sent back to the originating page.
    Notice(Notice),
    Internal(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// `303 See Other` back to `location`, with a message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    #[serde(skip)]
    pub location: String,
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn warning(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl From<Notice> for ApiError {
    fn from(notice: Notice) -> Self {
        Self::Notice(notice)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct ValidationBody<'a> {
    error: &'static str,
    fields: &'a [FieldError],
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Self::Validation(errors) => {
                let body = ValidationBody {
                    error: "validation failed",
                    fields: errors.errors(),
                };
                return (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
            }
            Self::Notice(notice) => {
                tracing::debug!(location = %notice.location, message = %notice.message, "notice");
                return (
                    StatusCode::SEE_OTHER,
                    [(header::LOCATION, notice.location.clone())],
                    Json(notice),
                )
                    .into_response();
            }
            Self::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<DatabaseError> for ApiError {
    fn from(e: DatabaseError) -> Self {
        match e {
            DatabaseError::NotFound { .. } => Self::NotFound(e.to_string()),
            DatabaseError::Duplicate(msg) => Self::Conflict(msg),
            DatabaseError::Validation(errors) => Self::Validation(errors),
            DatabaseError::Core(core) => core.into(),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Validation(errors) => Self::Validation(errors),
            other => Self::BadRequest(other.to_string()),
        }
    }
}
