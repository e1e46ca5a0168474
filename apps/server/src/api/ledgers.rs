use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{error::ApiResult, main_lib::AppState};
use jurisdesk_core::ledger::{
    BulkPayment, Expense, ExpenseStatus, Fee, FeeStatus, FinancialReport, Ledger, NewExpense,
    NewFee, NewPayment, Payment,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateLedgerRequest {
    case_id: String,
    claim_value: Option<Decimal>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClaimValueRequest {
    claim_value: Decimal,
}

#[derive(Deserialize)]
struct FeeStatusRequest {
    status: FeeStatus,
}

#[derive(Deserialize)]
struct ExpenseStatusRequest {
    status: ExpenseStatus,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BulkSettleRequest {
    case_ids: Vec<String>,
    /// Defaults to today
    paid_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BulkPartialRequest {
    case_ids: Vec<String>,
    amount: Decimal,
    paid_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct ReportQuery {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct OverdueQuery {
    today: Option<NaiveDate>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RemovedEntry {
    case_id: String,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

async fn list_ledgers(State(state): State<Arc<AppState>>) -> Json<Vec<Ledger>> {
    Json(state.ledger_service.list_ledgers())
}

async fn create_ledger(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateLedgerRequest>,
) -> ApiResult<(StatusCode, Json<Ledger>)> {
    let ledger = state
        .ledger_service
        .create_ledger(&request.case_id, request.claim_value)
        .await?;
    Ok((StatusCode::CREATED, Json(ledger)))
}

async fn get_ledger(
    Path(case_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Ledger>> {
    Ok(Json(state.ledger_service.get_ledger(&case_id)?))
}

async fn delete_ledger(
    Path(case_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    if state.ledger_service.delete_ledger(&case_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Ok(StatusCode::NOT_FOUND)
    }
}

async fn update_claim_value(
    Path(case_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<ClaimValueRequest>,
) -> ApiResult<Json<Ledger>> {
    let ledger = state
        .ledger_service
        .update_claim_value(&case_id, request.claim_value)
        .await?;
    Ok(Json(ledger))
}

async fn add_fee(
    Path(case_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(fee): Json<NewFee>,
) -> ApiResult<(StatusCode, Json<Fee>)> {
    let fee = state.ledger_service.add_fee(&case_id, fee).await?;
    Ok((StatusCode::CREATED, Json(fee)))
}

async fn add_expense(
    Path(case_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(expense): Json<NewExpense>,
) -> ApiResult<(StatusCode, Json<Expense>)> {
    let expense = state.ledger_service.add_expense(&case_id, expense).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

async fn add_payment(
    Path(case_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(payment): Json<NewPayment>,
) -> ApiResult<(StatusCode, Json<Payment>)> {
    let payment = state.ledger_service.add_payment(&case_id, payment).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

async fn update_fee_status(
    Path((case_id, entry_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<FeeStatusRequest>,
) -> ApiResult<Json<Fee>> {
    let fee = state
        .ledger_service
        .update_fee_status(&case_id, &entry_id, request.status)
        .await?;
    Ok(Json(fee))
}

async fn update_expense_status(
    Path((case_id, entry_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExpenseStatusRequest>,
) -> ApiResult<Json<Expense>> {
    let expense = state
        .ledger_service
        .update_expense_status(&case_id, &entry_id, request.status)
        .await?;
    Ok(Json(expense))
}

async fn remove_fee(
    Path(entry_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<RemovedEntry>> {
    let case_id = state.ledger_service.remove_fee(&entry_id).await?;
    Ok(Json(RemovedEntry { case_id }))
}

async fn remove_expense(
    Path(entry_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<RemovedEntry>> {
    let case_id = state.ledger_service.remove_expense(&entry_id).await?;
    Ok(Json(RemovedEntry { case_id }))
}

async fn remove_payment(
    Path(entry_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<RemovedEntry>> {
    let case_id = state.ledger_service.remove_payment(&entry_id).await?;
    Ok(Json(RemovedEntry { case_id }))
}

async fn bulk_settle(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BulkSettleRequest>,
) -> ApiResult<Json<Vec<BulkPayment>>> {
    let paid_date = request.paid_date.unwrap_or_else(today);
    let created = state
        .ledger_service
        .bulk_settle(&request.case_ids, paid_date)
        .await?;
    Ok(Json(created))
}

async fn bulk_partial_payment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BulkPartialRequest>,
) -> ApiResult<Json<Vec<BulkPayment>>> {
    let paid_date = request.paid_date.unwrap_or_else(today);
    let created = state
        .ledger_service
        .bulk_partial_payment(&request.case_ids, request.amount, paid_date)
        .await?;
    Ok(Json(created))
}

async fn get_report(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Json<FinancialReport>> {
    Ok(Json(state.ledger_service.report(query.start, query.end)?))
}

async fn get_overdue(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OverdueQuery>,
) -> Json<Vec<Ledger>> {
    Json(
        state
            .ledger_service
            .overdue(query.today.unwrap_or_else(today)),
    )
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ledgers", get(list_ledgers).post(create_ledger))
        .route("/ledgers/report", get(get_report))
        .route("/ledgers/overdue", get(get_overdue))
        .route("/ledgers/bulk/settle", post(bulk_settle))
        .route("/ledgers/bulk/partial", post(bulk_partial_payment))
        .route("/ledgers/{case_id}", get(get_ledger).delete(delete_ledger))
        .route("/ledgers/{case_id}/claim-value", put(update_claim_value))
        .route("/ledgers/{case_id}/fees", post(add_fee))
        .route("/ledgers/{case_id}/expenses", post(add_expense))
        .route("/ledgers/{case_id}/payments", post(add_payment))
        .route(
            "/ledgers/{case_id}/fees/{entry_id}/status",
            put(update_fee_status),
        )
        .route(
            "/ledgers/{case_id}/expenses/{entry_id}/status",
            put(update_expense_status),
        )
        .route("/fees/{entry_id}", delete(remove_fee))
        .route("/expenses/{entry_id}", delete(remove_expense))
        .route("/payments/{entry_id}", delete(remove_payment))
}
