use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::{error::ApiResult, main_lib::AppState};
use jurisdesk_core::cases::{
    Case, CaseFilter, CaseSummary, CaseUpdate, Movement, NewCase, NewMovement,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportRequest {
    case_number: String,
}

async fn list_cases(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<CaseFilter>,
) -> ApiResult<Json<Vec<Case>>> {
    Ok(Json(state.case_service.filter_cases(&filter)?))
}

async fn create_case(
    State(state): State<Arc<AppState>>,
    Json(new_case): Json<NewCase>,
) -> ApiResult<(StatusCode, Json<Case>)> {
    let case = state.case_service.create_case(new_case).await?;
    Ok((StatusCode::CREATED, Json(case)))
}

async fn import_case(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ImportRequest>,
) -> ApiResult<(StatusCode, Json<Case>)> {
    let case = state.case_service.import_case(&request.case_number).await?;
    Ok((StatusCode::CREATED, Json(case)))
}

async fn get_summary(State(state): State<Arc<AppState>>) -> ApiResult<Json<CaseSummary>> {
    Ok(Json(state.case_service.summary()?))
}

async fn get_case(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Case>> {
    Ok(Json(state.case_service.get_case(&id)?))
}

async fn update_case(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<CaseUpdate>,
) -> ApiResult<Json<Case>> {
    Ok(Json(state.case_service.update_case(&id, update).await?))
}

/// Deletes the case together with its ledger.
async fn delete_case(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.case_service.delete_case(&id).await?;
    state.ledger_service.delete_ledger(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_movement(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(movement): Json<NewMovement>,
) -> ApiResult<(StatusCode, Json<Movement>)> {
    let movement = state.case_service.add_movement(&id, movement).await?;
    Ok((StatusCode::CREATED, Json(movement)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/cases", get(list_cases).post(create_case))
        .route("/cases/import", post(import_case))
        .route("/cases/summary", get(get_summary))
        .route(
            "/cases/{id}",
            get(get_case).put(update_case).delete(delete_case),
        )
        .route("/cases/{id}/movements", post(add_movement))
}
