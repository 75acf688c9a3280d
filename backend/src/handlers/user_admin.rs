//! HTTP handlers for the user administration panel.
//!
//! The admin check happens in the service against the caller's stored
//! profile, not the token claim.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::user_admin::{
    CreateUserInput, CreateUserResponse, UpdatePasswordInput, UpdatePasswordResponse,
    UpdateUserInput, UserAdminService, UserSummary,
};
use crate::AppState;

/// Create a staff account
pub async fn create_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateUserInput>,
) -> AppResult<(StatusCode, Json<CreateUserResponse>)> {
    let service = UserAdminService::new(state.db);
    let response = service.create_user(current_user.0.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// List all staff accounts
pub async fn list_users(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<UserSummary>>> {
    let service = UserAdminService::new(state.db);
    let users = service.list_users(current_user.0.user_id).await?;
    Ok(Json(users))
}

/// Update a staff profile
pub async fn update_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<Uuid>,
    Json(input): Json<UpdateUserInput>,
) -> AppResult<Json<UserSummary>> {
    let service = UserAdminService::new(state.db);
    let user = service
        .update_user(current_user.0.user_id, user_id, input)
        .await?;
    Ok(Json(user))
}

/// Delete a staff account
pub async fn delete_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = UserAdminService::new(state.db);
    service.delete_user(current_user.0.user_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Reset another user's password
pub async fn update_password(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<UpdatePasswordInput>,
) -> AppResult<Json<UpdatePasswordResponse>> {
    let service = UserAdminService::new(state.db);
    let response = service
        .update_password(current_user.0.user_id, input)
        .await?;
    Ok(Json(response))
}
