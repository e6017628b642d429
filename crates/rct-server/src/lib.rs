//! # rct-server
//!
//! JSON HTTP API over the RCT service. Every route except `/health` requires
//! a bearer token from `server.api_tokens`.

pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post, put};
use rct_config::RctConfig;
use rct_db::media::MediaStore;
use rct_db::service::RctService;
use tower_http::cors::{Any, CorsLayer};

pub use state::AppState;

/// Upper bound for uploaded report bodies.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Build the application router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        .route("/dashboard", get(routes::dashboard::recent_participants))
        .route(
            "/studies",
            get(routes::studies::list_studies).post(routes::studies::create_study),
        )
        .route("/studies/{id}", get(routes::studies::get_study))
        .route(
            "/participants",
            get(routes::participants::list_participants)
                .post(routes::participants::create_participant),
        )
        .route(
            "/participants/{pid}",
            get(routes::participants::participant_detail),
        )
        .route(
            "/participants/{pid}/status",
            put(routes::participants::update_status),
        )
        .route("/participants/{pid}/visits", post(routes::visits::create_visit))
        .route(
            "/participants/{pid}/visits/{vid}",
            get(routes::visits::visit_dashboard),
        )
        .route(
            "/participants/{pid}/visits/{vid}/complete",
            put(routes::visits::set_completion),
        )
        .route(
            "/participants/{pid}/visits/{vid}/questionnaires",
            get(routes::questionnaires::list_for_visit).post(routes::questionnaires::assign),
        )
        .route(
            "/participants/{pid}/visits/{vid}/assessments/{aid}",
            get(routes::questionnaires::form).post(routes::questionnaires::submit),
        )
        .route(
            "/participants/{pid}/visits/{vid}/neuroimaging/report",
            put(routes::records::upload_mri_report)
                .layer(axum::extract::DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            "/participants/{pid}/visits/{vid}/{category}",
            get(routes::records::open_record).post(routes::records::save_record),
        )
        .route(
            "/participants/{pid}/wearables",
            get(routes::wearables::summary),
        )
        .route(
            "/templates",
            get(routes::templates::list_templates).post(routes::templates::create_template),
        )
        .route("/templates/{id}", get(routes::templates::get_template))
        .route_layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::auth::require_token,
        ));

    Router::new()
        // Health (no auth)
        .route("/health", get(routes::health::health_check))
        .merge(protected)
        .layer(axum_mw::from_fn(middleware::request_log::log_request))
        .layer(cors)
        .with_state(state)
}

/// Open the database named in `config` and assemble the shared state.
///
/// # Errors
///
/// Returns an error if the configured offset is invalid or the database
/// cannot be opened.
pub async fn open_state(config: &RctConfig) -> anyhow::Result<AppState> {
    let offset = config.server.fixed_offset()?;
    let service = RctService::new_local(&config.database.path)
        .await
        .with_context(|| format!("failed to open database at {}", config.database.path))?
        .with_fixed_offset(offset);

    Ok(AppState {
        service: Arc::new(service),
        media: MediaStore::new(config.media.root.clone()),
        api_tokens: Arc::new(config.server.api_tokens.clone()),
        default_limit: config.general.default_limit,
    })
}

/// Serve the API until Ctrl-C.
///
/// # Errors
///
/// Returns an error if state cannot be opened or the address cannot be bound.
pub async fn serve(config: &RctConfig, bind: Option<&str>) -> anyhow::Result<()> {
    let state = open_state(config).await?;
    if !config.server.is_configured() {
        tracing::warn!("no server.api_tokens configured; every protected route will answer 401");
    }

    let addr = bind.unwrap_or(&config.server.bind);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(addr = %addr, database = %config.database.path, "rct server listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
        })
        .await
        .context("server error")
}
