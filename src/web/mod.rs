// Web server — Axum JSON API for the dashboard.
//
// Every /api/* route serves a chart-ready JSON shape derived from the
// read-only analysis state. The interactive front-end (dropdowns, sliders,
// tabs) lives elsewhere and only consumes these endpoints, so there is no
// asset serving and no auth — this is an internal research tool.

use std::sync::Arc;

use anyhow::Result;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::analysis::Analysis;
use crate::model::search::TopicMatcher;

pub mod handlers;

/// Shared application state threaded through all Axum handlers.
/// Everything is read-only after startup — no locking needed.
#[derive(Clone)]
pub struct AppState {
    pub analysis: Arc<Analysis>,
    pub matcher: Arc<dyn TopicMatcher>,
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(
    analysis: Arc<Analysis>,
    matcher: Arc<dyn TopicMatcher>,
    port: u16,
    bind: &str,
) -> Result<()> {
    let state = AppState { analysis, matcher };
    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!("Kreide dashboard API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Assemble the router. Public so router-level tests can drive it
/// without a socket.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/overview", get(handlers::overview::get_overview))
        .route("/api/topics", get(handlers::topics::list_topics))
        .route("/api/topics/download", get(handlers::topics::download_topics))
        .route(
            "/api/topics/similarity",
            get(handlers::topics::topic_similarity),
        )
        .route(
            "/api/topics/{id}/sentences",
            get(handlers::topics::topic_sentences),
        )
        .route("/api/distribution", get(handlers::distribution::total))
        .route(
            "/api/distribution/levels",
            get(handlers::distribution::per_level),
        )
        .route("/api/levels/focus", get(handlers::levels::focus))
        .route("/api/levels/radar", get(handlers::levels::radar))
        .route("/api/regions", get(handlers::regions::matrix))
        .route("/api/curriculum", get(handlers::curriculum::lookup))
        .route("/api/search", get(handlers::search::search))
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([axum::http::Method::GET, axum::http::Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check — always returns 200 OK.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}
