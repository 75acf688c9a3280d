//! HTTP handlers for customer endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::auth::require_section;
use crate::middleware::CurrentUser;
use crate::services::customer::{
    CustomerInput, CustomerQuery, CustomerRecord, CustomerService, CustomerStats,
};
use crate::AppState;
use shared::models::Section;
use shared::types::PaginatedResponse;

/// List customers
pub async fn list_customers(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<CustomerQuery>,
) -> AppResult<Json<PaginatedResponse<CustomerRecord>>> {
    require_section(&current_user.0, Section::Customers)?;
    let service = CustomerService::new(state.db);
    let customers = service.list(query).await?;
    Ok(Json(customers))
}

/// Get one customer
pub async fn get_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<CustomerRecord>> {
    require_section(&current_user.0, Section::Customers)?;
    let service = CustomerService::new(state.db);
    let customer = service.get(customer_id).await?;
    Ok(Json(customer))
}

/// Create a customer
pub async fn create_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CustomerInput>,
) -> AppResult<(StatusCode, Json<CustomerRecord>)> {
    require_section(&current_user.0, Section::Customers)?;
    let service = CustomerService::new(state.db);
    let customer = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// Update a customer
pub async fn update_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
    Json(input): Json<CustomerInput>,
) -> AppResult<Json<CustomerRecord>> {
    require_section(&current_user.0, Section::Customers)?;
    let service = CustomerService::new(state.db);
    let customer = service.update(customer_id, input).await?;
    Ok(Json(customer))
}

/// Deactivate a customer
pub async fn delete_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_section(&current_user.0, Section::Customers)?;
    let service = CustomerService::new(state.db);
    service.delete(customer_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Purchase history summary for one customer
pub async fn customer_stats(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<CustomerStats>> {
    require_section(&current_user.0, Section::Customers)?;
    let service = CustomerService::new(state.db);
    let stats = service.stats(customer_id).await?;
    Ok(Json(stats))
}
