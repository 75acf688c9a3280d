//! HTTP handlers for invoicing endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::auth::{require_role, require_section};
use crate::middleware::CurrentUser;
use crate::services::billing::{
    BillingService, BillingStats, CreateInvoiceInput, InvoiceQuery, InvoiceRecord,
    InvoiceWithItems, UpdateStatusInput,
};
use crate::AppState;
use shared::models::{Section, UserRole};
use shared::types::PaginatedResponse;

const INVOICE_WRITERS: &[UserRole] = &[UserRole::Admin, UserRole::Cajero];

/// Create an invoice, deducting stock
pub async fn create_invoice(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateInvoiceInput>,
) -> AppResult<(StatusCode, Json<InvoiceWithItems>)> {
    require_role(&current_user.0, INVOICE_WRITERS)?;
    let service = BillingService::new(state.db, state.config.business.clone());
    let invoice = service
        .create_invoice(current_user.0.user_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

/// List invoices with search and filters
pub async fn list_invoices(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<InvoiceQuery>,
) -> AppResult<Json<PaginatedResponse<InvoiceRecord>>> {
    require_section(&current_user.0, Section::Billing)?;
    let service = BillingService::new(state.db, state.config.business.clone());
    let invoices = service.list_invoices(query).await?;
    Ok(Json(invoices))
}

/// Get an invoice with its lines
pub async fn get_invoice(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(invoice_id): Path<Uuid>,
) -> AppResult<Json<InvoiceWithItems>> {
    require_section(&current_user.0, Section::Billing)?;
    let service = BillingService::new(state.db, state.config.business.clone());
    let invoice = service.get_invoice(invoice_id).await?;
    Ok(Json(invoice))
}

/// Change an invoice's status
pub async fn update_invoice_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(invoice_id): Path<Uuid>,
    Json(input): Json<UpdateStatusInput>,
) -> AppResult<Json<InvoiceWithItems>> {
    require_role(&current_user.0, INVOICE_WRITERS)?;
    let service = BillingService::new(state.db, state.config.business.clone());
    let invoice = service.update_status(invoice_id, input).await?;
    Ok(Json(invoice))
}

/// Counts and totals per status
pub async fn invoice_stats(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<BillingStats>> {
    require_section(&current_user.0, Section::Billing)?;
    let service = BillingService::new(state.db, state.config.business.clone());
    let stats = service.stats().await?;
    Ok(Json(stats))
}
