// GET /api/curriculum — all sentences of one (bundesland, stufe) pair.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::data::models::SchoolLevel;
use crate::web::{api_error, AppState};

#[derive(Deserialize)]
pub struct CurriculumQuery {
    pub bundesland: String,
    /// German display string, e.g. "Sekundarstufe I"
    pub stufe: String,
}

pub async fn lookup(
    State(state): State<AppState>,
    Query(params): Query<CurriculumQuery>,
) -> Response {
    let Some(stufe) = SchoolLevel::parse(&params.stufe) else {
        return api_error(
            StatusCode::BAD_REQUEST,
            "stufe must be \"Sekundarstufe I\" or \"Sekundarstufe II\"",
        );
    };

    let sentences = state.analysis.curriculum(&params.bundesland, stufe);

    Json(serde_json::json!({
        "bundesland": params.bundesland,
        "stufe": stufe,
        "total": sentences.len(),
        "sentences": sentences,
    }))
    .into_response()
}
