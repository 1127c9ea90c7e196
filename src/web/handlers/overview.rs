// GET /api/overview — headline numbers for the landing page.
//
// Counts (Bundesländer, Kernlehrpläne, Sätze, Themen), the artifact
// timestamp, and the residual data-quality counter in one round-trip.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::web::AppState;

pub async fn get_overview(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.analysis.overview())
}
