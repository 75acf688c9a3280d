//! HTTP handlers for inventory management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::auth::{require_role, require_section};
use crate::middleware::CurrentUser;
use crate::services::inventory::{
    CategoryInput, CategoryRecord, InventoryMetrics, InventoryService, LowStockEntry,
    ProductInput, ProductQuery, ProductRecord, SetStockInput, StockMovementRecord,
};
use crate::AppState;
use shared::models::{Section, UserRole};
use shared::types::PaginatedResponse;

const PRODUCT_WRITERS: &[UserRole] = &[UserRole::Admin, UserRole::Bodega];

/// List products with search and filters
pub async fn list_products(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<PaginatedResponse<ProductRecord>>> {
    require_section(&current_user.0, Section::Inventory)?;
    let service = InventoryService::new(state.db);
    let products = service.list_products(query).await?;
    Ok(Json(products))
}

/// Get one product
pub async fn get_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ProductRecord>> {
    require_section(&current_user.0, Section::Inventory)?;
    let service = InventoryService::new(state.db);
    let product = service.get_product(product_id).await?;
    Ok(Json(product))
}

/// Create a product
pub async fn create_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<ProductInput>,
) -> AppResult<(StatusCode, Json<ProductRecord>)> {
    require_role(&current_user.0, PRODUCT_WRITERS)?;
    let service = InventoryService::new(state.db);
    let product = service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product
pub async fn update_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(input): Json<ProductInput>,
) -> AppResult<Json<ProductRecord>> {
    require_role(&current_user.0, PRODUCT_WRITERS)?;
    let service = InventoryService::new(state.db);
    let product = service.update_product(product_id, input).await?;
    Ok(Json(product))
}

/// Deactivate a product
pub async fn delete_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_role(&current_user.0, PRODUCT_WRITERS)?;
    let service = InventoryService::new(state.db);
    service.delete_product(product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Set a product's stock to an absolute count
pub async fn set_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(input): Json<SetStockInput>,
) -> AppResult<Json<ProductRecord>> {
    require_role(&current_user.0, PRODUCT_WRITERS)?;
    let service = InventoryService::new(state.db);
    let product = service
        .set_stock(product_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(product))
}

/// Products at or below their minimum stock
pub async fn low_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<LowStockEntry>>> {
    require_section(&current_user.0, Section::Inventory)?;
    let service = InventoryService::new(state.db);
    let entries = service.low_stock().await?;
    Ok(Json(entries))
}

/// Catalog counts and value
pub async fn inventory_metrics(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<InventoryMetrics>> {
    require_section(&current_user.0, Section::Inventory)?;
    let service = InventoryService::new(state.db);
    let metrics = service.metrics().await?;
    Ok(Json(metrics))
}

#[derive(Debug, Deserialize)]
pub struct MovementQuery {
    pub product_id: Option<Uuid>,
    pub limit: Option<i64>,
}

/// Recent stock movements
pub async fn list_movements(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<MovementQuery>,
) -> AppResult<Json<Vec<StockMovementRecord>>> {
    require_section(&current_user.0, Section::Inventory)?;
    let service = InventoryService::new(state.db);
    let movements = service
        .list_movements(query.product_id, query.limit.unwrap_or(100))
        .await?;
    Ok(Json(movements))
}

/// List categories with product counts
pub async fn list_categories(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<CategoryRecord>>> {
    require_section(&current_user.0, Section::Inventory)?;
    let service = InventoryService::new(state.db);
    let categories = service.list_categories().await?;
    Ok(Json(categories))
}

/// Create a category
pub async fn create_category(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CategoryInput>,
) -> AppResult<(StatusCode, Json<CategoryRecord>)> {
    require_role(&current_user.0, PRODUCT_WRITERS)?;
    let service = InventoryService::new(state.db);
    let category = service.create_category(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Update a category
pub async fn update_category(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(category_id): Path<Uuid>,
    Json(input): Json<CategoryInput>,
) -> AppResult<Json<CategoryRecord>> {
    require_role(&current_user.0, PRODUCT_WRITERS)?;
    let service = InventoryService::new(state.db);
    let category = service.update_category(category_id, input).await?;
    Ok(Json(category))
}

/// Delete a category
pub async fn delete_category(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(category_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_role(&current_user.0, PRODUCT_WRITERS)?;
    let service = InventoryService::new(state.db);
    service.delete_category(category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
