// Topic distribution endpoints (pie chart inputs).
//
// GET /api/distribution        — mean over all curricula
// GET /api/distribution/levels — one distribution per school level

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::data::models::SchoolLevel;
use crate::web::AppState;

/// GET /api/distribution — shares including "Sonstiges"; sums to ~1.
pub async fn total(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "distribution": state.analysis.overall_distribution(),
    }))
}

/// GET /api/distribution/levels — the two-pie view.
pub async fn per_level(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "sek1": state.analysis.level_distribution(SchoolLevel::SekI),
        "sek2": state.analysis.level_distribution(SchoolLevel::SekII),
    }))
}
