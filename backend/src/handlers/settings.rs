//! HTTP handlers for system settings and user preferences

use std::collections::HashMap;

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::middleware::auth::require_section;
use crate::middleware::CurrentUser;
use crate::services::settings::{SettingsService, UpdateSettingsInput};
use crate::AppState;
use shared::models::{Section, UserPreferences};

/// All system settings as stored
pub async fn get_settings(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<HashMap<String, String>>> {
    require_section(&current_user.0, Section::Settings)?;
    let service = SettingsService::new(state.db);
    let settings = service.get_settings().await?;
    Ok(Json(settings))
}

/// Upsert settings values
pub async fn update_settings(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<UpdateSettingsInput>,
) -> AppResult<Json<HashMap<String, String>>> {
    require_section(&current_user.0, Section::Settings)?;
    let service = SettingsService::new(state.db);
    let settings = service
        .update_settings(current_user.0.user_id, input)
        .await?;
    Ok(Json(settings))
}

/// The caller's display preferences
pub async fn get_preferences(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<UserPreferences>> {
    let service = SettingsService::new(state.db);
    let preferences = service.get_preferences(current_user.0.user_id).await?;
    Ok(Json(preferences))
}

/// Save the caller's display preferences
pub async fn update_preferences(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(preferences): Json<UserPreferences>,
) -> AppResult<Json<UserPreferences>> {
    let service = SettingsService::new(state.db);
    let preferences = service
        .update_preferences(current_user.0.user_id, preferences)
        .await?;
    Ok(Json(preferences))
}
