// Topic table endpoints.
//
// GET /api/topics                — the table as JSON
// GET /api/topics/download       — same table as an attachment
// GET /api/topics/similarity     — pairwise cosine similarity matrix
// GET /api/topics/{id}/sentences — threshold-filtered sentences
//
// The table keeps its German column labels (Thema, Schlüsselwörter,
// Anzahl) because that is the artifact users download and cite.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::web::{api_error, AppState};

/// Threshold slider bounds: the UI offers 0.5–1.0 in 0.05 steps.
const THRESHOLD_MIN: f64 = 0.5;
const THRESHOLD_MAX: f64 = 1.0;
const THRESHOLD_DEFAULT: f64 = 0.8;

#[derive(Deserialize, Default)]
pub struct SentencesQuery {
    pub threshold: Option<f64>,
}

/// GET /api/topics — the full topic table, "Sonstiges" last.
pub async fn list_topics(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({ "topics": state.analysis.topic_table() }))
}

/// GET /api/topics/download — the table as a file attachment.
pub async fn download_topics(State(state): State<AppState>) -> Response {
    let table = state.analysis.topic_table();
    match serde_json::to_vec_pretty(table) {
        Ok(body) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/json"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"topics.json\"",
                ),
            ],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize topic table");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Serialization error")
        }
    }
}

/// GET /api/topics/similarity — dendrogram/heatmap input.
pub async fn topic_similarity(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.analysis.topic_similarity().clone())
}

/// GET /api/topics/{id}/sentences — sentences whose probability for the
/// topic strictly exceeds the threshold. The id -1 addresses "Sonstiges".
pub async fn topic_sentences(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<SentencesQuery>,
) -> Response {
    let threshold = params
        .threshold
        .unwrap_or(THRESHOLD_DEFAULT)
        .clamp(THRESHOLD_MIN, THRESHOLD_MAX);

    match state.analysis.topic_sentences(id, threshold) {
        Ok(sentences) => Json(serde_json::json!({
            "topic": id,
            "threshold": threshold,
            "total": sentences.len(),
            "sentences": sentences,
        }))
        .into_response(),
        Err(_) => api_error(StatusCode::NOT_FOUND, "Unknown topic id"),
    }
}
