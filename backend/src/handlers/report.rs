//! HTTP handlers for stock reports and data exports

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::auth::require_section;
use crate::middleware::CurrentUser;
use crate::services::report::{
    CreateStockReportInput, ReportService, SalesReportQuery, StockReportQuery,
    StockReportRecord, UpdateReportStatusInput,
};
use crate::AppState;
use shared::models::Section;

#[derive(Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>, // "json" or "csv"
}

/// File a stock report
pub async fn create_stock_report(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateStockReportInput>,
) -> AppResult<(StatusCode, Json<StockReportRecord>)> {
    require_section(&current_user.0, Section::Reports)?;
    let service = ReportService::new(state.db, state.config.business.clone());
    let report = service
        .create_stock_report(current_user.0.user_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// List stock reports with filters
pub async fn list_stock_reports(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<StockReportQuery>,
) -> AppResult<Json<Vec<StockReportRecord>>> {
    require_section(&current_user.0, Section::Reports)?;
    let service = ReportService::new(state.db, state.config.business.clone());
    let reports = service.list_stock_reports(query).await?;
    Ok(Json(reports))
}

/// Get one stock report
pub async fn get_stock_report(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(report_id): Path<Uuid>,
) -> AppResult<Json<StockReportRecord>> {
    require_section(&current_user.0, Section::Reports)?;
    let service = ReportService::new(state.db, state.config.business.clone());
    let report = service.get_stock_report(report_id).await?;
    Ok(Json(report))
}

/// Move a stock report to another status
pub async fn update_stock_report_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(report_id): Path<Uuid>,
    Json(input): Json<UpdateReportStatusInput>,
) -> AppResult<Json<StockReportRecord>> {
    require_section(&current_user.0, Section::Reports)?;
    let service = ReportService::new(state.db, state.config.business.clone());
    let report = service
        .update_report_status(report_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(report))
}

/// Per-product stock and value, as JSON or CSV
pub async fn inventory_report(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ExportQuery>,
) -> AppResult<impl IntoResponse> {
    require_section(&current_user.0, Section::Reports)?;
    let service = ReportService::new(state.db, state.config.business.clone());
    let rows = service.inventory_report().await?;

    if query.format.as_deref() == Some("csv") {
        let csv = ReportService::export_to_csv(&rows)?;
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"inventario.csv\"",
                ),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(rows).into_response())
    }
}

/// Daily sales totals over a date range, as JSON or CSV
pub async fn sales_report(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<SalesReportQuery>,
) -> AppResult<impl IntoResponse> {
    require_section(&current_user.0, Section::Reports)?;
    let service = ReportService::new(state.db, state.config.business.clone());
    let rows = service.sales_report(query.start, query.end).await?;

    if query.format.as_deref() == Some("csv") {
        let csv = ReportService::export_to_csv(&rows)?;
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"ventas.csv\"",
                ),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(rows).into_response())
    }
}
