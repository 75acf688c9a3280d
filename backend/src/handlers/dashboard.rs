//! HTTP handlers for the dashboard

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::middleware::auth::require_section;
use crate::middleware::CurrentUser;
use crate::services::dashboard::{DashboardMetrics, DashboardService};
use crate::AppState;
use shared::models::Section;

/// Full dashboard payload
pub async fn get_dashboard(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<DashboardMetrics>> {
    require_section(&current_user.0, Section::Dashboard)?;
    let service = DashboardService::new(state.db, state.config.business.clone());
    let metrics = service.metrics().await?;
    Ok(Json(metrics))
}
