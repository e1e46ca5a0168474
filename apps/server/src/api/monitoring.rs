use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use crate::{error::ApiResult, main_lib::AppState};
use jurisdesk_core::monitoring::{CheckOutcome, MonitoringStats, NewWatch, WatchedCase};

async fn list_watched(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<WatchedCase>>> {
    Ok(Json(state.monitoring_service.list()?))
}

async fn watch_case(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewWatch>,
) -> ApiResult<(StatusCode, Json<WatchedCase>)> {
    let watched = state.monitoring_service.watch(request).await?;
    Ok((StatusCode::CREATED, Json(watched)))
}

async fn get_stats(State(state): State<Arc<AppState>>) -> ApiResult<Json<MonitoringStats>> {
    Ok(Json(state.monitoring_service.stats()?))
}

async fn check_due(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<CheckOutcome>>> {
    Ok(Json(state.monitoring_service.check_due(Utc::now()).await?))
}

async fn get_watched(
    Path(number): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<WatchedCase>> {
    Ok(Json(state.monitoring_service.get(&number)?))
}

async fn stop_watching(
    Path(number): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.monitoring_service.stop(&number).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn pause(
    Path(number): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<WatchedCase>> {
    Ok(Json(state.monitoring_service.pause(&number).await?))
}

async fn resume(
    Path(number): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<WatchedCase>> {
    Ok(Json(state.monitoring_service.resume(&number).await?))
}

async fn check_now(
    Path(number): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CheckOutcome>> {
    Ok(Json(state.monitoring_service.check(&number).await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/monitoring", get(list_watched).post(watch_case))
        .route("/monitoring/stats", get(get_stats))
        .route("/monitoring/check-due", post(check_due))
        .route(
            "/monitoring/{number}",
            get(get_watched).delete(stop_watching),
        )
        .route("/monitoring/{number}/pause", post(pause))
        .route("/monitoring/{number}/resume", post(resume))
        .route("/monitoring/{number}/check", post(check_now))
}
