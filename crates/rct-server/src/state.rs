use std::sync::Arc;

use rct_db::media::MediaStore;
use rct_db::service::RctService;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RctService>,
    pub media: MediaStore,
    pub api_tokens: Arc<Vec<String>>,
    /// Page size for list routes when the request gives none.
    pub default_limit: u32,
}
