use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::{error::ApiResult, main_lib::AppState};
use jurisdesk_court_data::{Case, LookupDiagnostics};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupResponse {
    case: Case,
    diagnostics: LookupDiagnostics,
}

async fn lookup_case(
    Path(number): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<LookupResponse>> {
    let (result, diagnostics) = state.resolver.resolve_with_diagnostics(&number).await;
    let case = result?;
    Ok(Json(LookupResponse { case, diagnostics }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/lookup/{number}", get(lookup_case))
}
