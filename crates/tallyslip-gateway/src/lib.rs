use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use tallyslip_core::{
    IssuerDetails, ReceiptRecord, ReceiptStatus, ReceiptStore, StoreError,
};
use tallyslip_document::render_document;
use tallyslip_finance::{ReceiptSummary, issue_receipt, summarize};
use tallyslip_platform::{
    CreateReceiptRequest, DocumentQuery, ListReceiptsQuery, ListReceiptsResponse,
    PreviewResponse,
};
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn ReceiptStore>,
    issuer: Arc<IssuerDetails>,
}

impl AppState {
    pub fn new(store: Arc<dyn ReceiptStore>, issuer: IssuerDetails) -> Self {
        Self {
            store,
            issuer: Arc::new(issuer),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/receipts", get(list_receipts).post(create_receipt))
        .route("/receipts/preview", post(preview_receipt))
        .route("/receipts/summary", get(receipt_summary))
        .route("/receipts/{id}", get(get_receipt))
        .route("/receipts/{id}/document", get(receipt_document))
        .route("/receipts/{id}/paid", post(mark_receipt_paid))
        .route("/receipts/{id}/cancel", post(cancel_receipt))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

/// Recomputed on every form edit. Only magnitude limits apply; nothing is stored.
async fn preview_receipt(
    Json(payload): Json<CreateReceiptRequest>,
) -> Result<Json<PreviewResponse>, (StatusCode, String)> {
    payload.check_bounds().map_err(invalid_request)?;
    Ok(Json(PreviewResponse::from_input(&payload)))
}

async fn create_receipt(
    State(state): State<AppState>,
    Json(payload): Json<CreateReceiptRequest>,
) -> Result<(StatusCode, Json<ReceiptRecord>), (StatusCode, String)> {
    payload.validate().map_err(invalid_request)?;

    let record = issue_receipt(payload, Utc::now().date_naive());
    state
        .store
        .append(record.clone())
        .await
        .map_err(store_error)?;

    info!(
        "issued receipt {} for {} (payable {}, due {})",
        record.id,
        record.input.organization,
        record.totals.payable_amount,
        record.totals.due_amount
    );
    Ok((StatusCode::CREATED, Json(record)))
}

async fn list_receipts(
    State(state): State<AppState>,
    Query(query): Query<ListReceiptsQuery>,
) -> Result<Json<ListReceiptsResponse>, (StatusCode, String)> {
    let status = query
        .status
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .map(str::parse::<ReceiptStatus>)
        .transpose()
        .map_err(invalid_request)?;

    let receipts = state
        .store
        .list_all()
        .await
        .into_iter()
        .filter(|record| status.is_none_or(|wanted| record.status == wanted))
        .collect();

    Ok(Json(ListReceiptsResponse { receipts }))
}

async fn receipt_summary(State(state): State<AppState>) -> Json<ReceiptSummary> {
    let records = state.store.list_all().await;
    Json(summarize(&records))
}

async fn get_receipt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReceiptRecord>, (StatusCode, String)> {
    find_receipt(&state, &id).await.map(Json)
}

async fn receipt_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DocumentQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let record = find_receipt(&state, &id).await?;
    let body = render_document(&record, state.issuer.as_ref(), query.kind.unwrap_or_default());

    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body))
}

async fn mark_receipt_paid(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReceiptRecord>, (StatusCode, String)> {
    let record = state.store.mark_paid(&id).await.map_err(store_error)?;
    info!("receipt {} marked paid", record.id);
    Ok(Json(record))
}

async fn cancel_receipt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReceiptRecord>, (StatusCode, String)> {
    let record = state.store.cancel(&id).await.map_err(store_error)?;
    info!("receipt {} cancelled", record.id);
    Ok(Json(record))
}

async fn find_receipt(state: &AppState, id: &str) -> Result<ReceiptRecord, (StatusCode, String)> {
    state
        .store
        .find(id)
        .await
        .ok_or_else(|| store_error(StoreError::NotFound(id.to_string())))
}

fn invalid_request(err: impl std::fmt::Display) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, err.to_string())
}

fn store_error(err: StoreError) -> (StatusCode, String) {
    match err {
        StoreError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        StoreError::DuplicateId(_) | StoreError::InvalidTransition { .. } => {
            (StatusCode::CONFLICT, err.to_string())
        }
        StoreError::Io(_) | StoreError::Serialize(_) => {
            error!("receipt store failure: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to persist receipt".to_string(),
            )
        }
    }
}
