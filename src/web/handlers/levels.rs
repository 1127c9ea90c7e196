// Level-focus endpoints — how topic emphasis shifts from Sek I to Sek II.
//
// GET /api/levels/focus — percent rows with diff, sorted by diff
// GET /api/levels/radar — residual-free rows in prominence order
//
// Both are restricted to regions that publish curricula for both levels.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::web::AppState;

pub async fn focus(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({ "rows": state.analysis.level_focus() }))
}

pub async fn radar(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({ "rows": state.analysis.level_radar() }))
}
