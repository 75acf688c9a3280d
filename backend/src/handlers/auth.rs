//! Authentication handlers

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::CurrentUser;
use crate::services::auth::{AuthTokens, LoginInput, LoginResponse, SessionUser};
use crate::services::AuthService;
use crate::AppState;

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginInput>,
) -> AppResult<Json<LoginResponse>> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let response = auth_service.login(body).await?;
    Ok(Json(response))
}

/// Refresh token endpoint handler
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> AppResult<Json<AuthTokens>> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let tokens = auth_service.refresh_token(&body.refresh_token).await?;
    Ok(Json(tokens))
}

/// Current session endpoint handler.
///
/// Resolves the profile from the database, so a role change shows up on
/// the next call even while the old token is still valid.
pub async fn me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<SessionUser>> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let session = auth_service.resolve_session(user.user_id).await?;
    Ok(Json(session))
}

/// Logout endpoint handler, revokes the presented refresh token
pub async fn logout(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Json(body): Json<LogoutRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    auth_service.logout(&body.refresh_token).await?;
    Ok(Json(serde_json::json!({ "message": "Sesión cerrada" })))
}
