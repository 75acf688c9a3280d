//! HTTP handlers for supplier endpoints. All of these are admin only.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::auth::require_role;
use crate::middleware::CurrentUser;
use crate::services::supplier::{
    SuppliedProduct, SupplierInput, SupplierQuery, SupplierRecord, SupplierService,
};
use crate::AppState;
use shared::models::UserRole;
use shared::types::PaginatedResponse;

const SUPPLIER_ROLES: &[UserRole] = &[UserRole::Admin];

/// List suppliers
pub async fn list_suppliers(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<SupplierQuery>,
) -> AppResult<Json<PaginatedResponse<SupplierRecord>>> {
    require_role(&current_user.0, SUPPLIER_ROLES)?;
    let service = SupplierService::new(state.db);
    let suppliers = service.list(query).await?;
    Ok(Json(suppliers))
}

/// Get one supplier
pub async fn get_supplier(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(supplier_id): Path<Uuid>,
) -> AppResult<Json<SupplierRecord>> {
    require_role(&current_user.0, SUPPLIER_ROLES)?;
    let service = SupplierService::new(state.db);
    let supplier = service.get(supplier_id).await?;
    Ok(Json(supplier))
}

/// Create a supplier
pub async fn create_supplier(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<SupplierInput>,
) -> AppResult<(StatusCode, Json<SupplierRecord>)> {
    require_role(&current_user.0, SUPPLIER_ROLES)?;
    let service = SupplierService::new(state.db);
    let supplier = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

/// Update a supplier
pub async fn update_supplier(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(supplier_id): Path<Uuid>,
    Json(input): Json<SupplierInput>,
) -> AppResult<Json<SupplierRecord>> {
    require_role(&current_user.0, SUPPLIER_ROLES)?;
    let service = SupplierService::new(state.db);
    let supplier = service.update(supplier_id, input).await?;
    Ok(Json(supplier))
}

/// Deactivate a supplier
pub async fn delete_supplier(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(supplier_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_role(&current_user.0, SUPPLIER_ROLES)?;
    let service = SupplierService::new(state.db);
    service.delete(supplier_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Products sourced from one supplier
pub async fn supplier_products(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(supplier_id): Path<Uuid>,
) -> AppResult<Json<Vec<SuppliedProduct>>> {
    require_role(&current_user.0, SUPPLIER_ROLES)?;
    let service = SupplierService::new(state.db);
    let products = service.products(supplier_id).await?;
    Ok(Json(products))
}
