// GET /api/regions — the regions × topics heatmap matrix.
//
// Optional ?level= selects which curricula to include, using the German
// display strings the dropdown shows. Without a level, both levels are
// combined (restricted to regions that have both).

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::analysis::aggregate::LevelSelection;
use crate::data::models::SchoolLevel;
use crate::web::{api_error, AppState};

#[derive(Deserialize, Default)]
pub struct RegionsQuery {
    /// "Sekundarstufe I" | "Sekundarstufe II" | "Sekundarstufe I & II"
    pub level: Option<String>,
}

pub async fn matrix(
    State(state): State<AppState>,
    Query(params): Query<RegionsQuery>,
) -> Response {
    let selection = match params.level.as_deref() {
        None | Some("Sekundarstufe I & II") => LevelSelection::Combined,
        Some(s) => match SchoolLevel::parse(s) {
            Some(level) => LevelSelection::Single(level),
            None => {
                return api_error(
                    StatusCode::BAD_REQUEST,
                    "level must be \"Sekundarstufe I\", \"Sekundarstufe II\" or \"Sekundarstufe I & II\"",
                );
            }
        },
    };

    Json(state.analysis.region_matrix(selection).clone()).into_response()
}
