//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::warn;

use super::AppState;
use super::types::{CalculateRequest, ErrorResponse, RulesQuery};
use crate::diversity::calculate_diversity;
use crate::loads::Location;
use crate::rules::RuleTable;

fn bad_request(error: impl ToString) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

/// Runs the engine on the posted circuit list.
///
/// `POST /calculate` → 200 + `DiversityResult` JSON
/// invalid loads or supply → 400 + `ErrorResponse`
pub async fn calculate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CalculateRequest>,
) -> impl IntoResponse {
    let supply = request.supply.unwrap_or(state.supply);
    match calculate_diversity(&request.loads, &supply) {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            warn!(error = %e, "rejected calculation request");
            Err(bad_request(e))
        }
    }
}

/// Returns the rule table for a location.
///
/// `GET /rules` → domestic table
/// `GET /rules?location=commercial` → Table H2
/// `GET /rules?location=moon` → 400 + `ErrorResponse`
pub async fn get_rules(Query(query): Query<RulesQuery>) -> impl IntoResponse {
    let location = match query.location.as_deref().map(Location::parse) {
        None => Location::default(),
        Some(Ok(location)) => location,
        Some(Err(e)) => return Err(bad_request(e)),
    };
    Ok(Json(RuleTable::for_location(location)))
}

/// Returns the result the server was started with.
///
/// `GET /result` → 200 + `DiversityResult` JSON, or 404 when none was computed
pub async fn get_result(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.result {
        Some(result) => Ok(Json(result.clone())),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "no installation was loaded at startup".to_string(),
            }),
        )),
    }
}
