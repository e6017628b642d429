use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;
use crate::state::AppState;

/// Bearer-token middleware.
///
/// Accepts `Authorization: Bearer <token>` when the token is one of the
/// configured API tokens. With no tokens configured every request is refused.
pub async fn require_token(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".into()))?;

    if !state.api_tokens.iter().any(|known| !known.is_empty() && known == token) {
        tracing::warn!(path = %req.uri().path(), "rejected API token");
        return Err(ApiError::Unauthorized("invalid bearer token".into()));
    }

    Ok(next.run(req).await)
}
