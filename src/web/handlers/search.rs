// GET /api/search — free-text keyword search over the topics.
//
// The query goes through the configured TopicMatcher backend (embedding
// model when its files are on disk, keyword overlap otherwise); results
// strictly above the threshold come back as topic table rows with scores.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::model::search::search_topics;
use crate::web::{api_error, AppState};

const SEARCH_THRESHOLD_DEFAULT: f64 = 0.5;

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub threshold: Option<f64>,
}

pub async fn search(State(state): State<AppState>, Query(params): Query<SearchQuery>) -> Response {
    let threshold = params.threshold.unwrap_or(SEARCH_THRESHOLD_DEFAULT);

    match search_topics(
        state.matcher.as_ref(),
        state.analysis.artifact(),
        &params.q,
        threshold,
    )
    .await
    {
        Ok(results) => Json(serde_json::json!({
            "query": params.q,
            "threshold": threshold,
            "backend": state.matcher.backend(),
            "total": results.len(),
            "results": results,
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, query = %params.q, "Search failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Search failed")
        }
    }
}
