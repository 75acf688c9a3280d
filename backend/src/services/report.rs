//! Stock reports and exportable inventory/sales reports

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::config::BusinessConfig;
use crate::error::{AppError, AppResult};
use shared::models::{generate_report_number, ReportPriority, ReportStatus, ReportType};

/// Report service
#[derive(Clone)]
pub struct ReportService {
    db: PgPool,
    business: BusinessConfig,
}

/// A stock incident report with its product joined in
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockReportRecord {
    pub id: Uuid,
    pub report_number: String,
    pub product_id: Uuid,
    pub product_code: String,
    pub product_name: String,
    pub report_type: String,
    pub priority: String,
    pub status: String,
    pub description: Option<String>,
    pub quantity_affected: Option<i32>,
    pub reported_by: Option<Uuid>,
    pub resolved_by: Option<Uuid>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for filing a stock report
#[derive(Debug, Deserialize)]
pub struct CreateStockReportInput {
    pub product_id: Uuid,
    pub report_type: String,
    /// Defaults to "medium" when omitted
    pub priority: Option<String>,
    pub description: Option<String>,
    pub quantity_affected: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StockReportQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub report_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateReportStatusInput {
    pub status: String,
}

/// One product line on the inventory report
#[derive(Debug, Serialize, FromRow)]
pub struct InventoryReportRow {
    pub code: String,
    pub name: String,
    pub category: Option<String>,
    pub supplier: Option<String>,
    pub stock: i32,
    pub min_stock: i32,
    pub unit_price: Decimal,
    pub stock_value: Decimal,
}

/// One day on the sales report
#[derive(Debug, Serialize, FromRow)]
pub struct SalesReportRow {
    pub day: NaiveDate,
    pub invoice_count: i64,
    pub items_sold: i64,
    pub total: Decimal,
}

#[derive(Debug, Default, Deserialize)]
pub struct SalesReportQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub format: Option<String>,
}

const STOCK_REPORT_COLUMNS: &str = r#"
    r.id, r.report_number, r.product_id, p.code AS product_code,
    p.name AS product_name, r.report_type, r.priority, r.status,
    r.description, r.quantity_affected, r.reported_by, r.resolved_by,
    r.resolved_at, r.created_at, r.updated_at
"#;

impl ReportService {
    /// Create a new ReportService instance
    pub fn new(db: PgPool, business: BusinessConfig) -> Self {
        Self { db, business }
    }

    /// File a stock report. Numbers come from the wall clock, so two
    /// reports in the same millisecond would collide; the UNIQUE
    /// constraint turns that into an error instead of a duplicate.
    pub async fn create_stock_report(
        &self,
        reported_by: Uuid,
        input: CreateStockReportInput,
    ) -> AppResult<StockReportRecord> {
        let report_type =
            ReportType::parse(&input.report_type).ok_or_else(|| AppError::Validation {
                field: "report_type".to_string(),
                message: "Report type must be low_stock, damaged, expired or recount".to_string(),
                message_es: "El tipo debe ser low_stock, damaged, expired o recount".to_string(),
            })?;
        let priority = match input.priority.as_deref() {
            None | Some("") => ReportPriority::Medium,
            Some(raw) => ReportPriority::parse(raw).ok_or_else(|| AppError::Validation {
                field: "priority".to_string(),
                message: "Priority must be low, medium, high or critical".to_string(),
                message_es: "La prioridad debe ser low, medium, high o critical".to_string(),
            })?,
        };

        let product_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
                .bind(input.product_id)
                .fetch_one(&self.db)
                .await?;
        if !product_exists {
            return Err(AppError::NotFound("Product".to_string()));
        }

        let report_number =
            generate_report_number(self.business.now_local().timestamp_millis());

        let report_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO stock_reports (
                report_number, product_id, report_type, priority,
                description, quantity_affected, reported_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&report_number)
        .bind(input.product_id)
        .bind(report_type.as_str())
        .bind(priority.as_str())
        .bind(&input.description)
        .bind(input.quantity_affected)
        .bind(reported_by)
        .fetch_one(&self.db)
        .await?;

        self.get_stock_report(report_id).await
    }

    /// Get one stock report by id
    pub async fn get_stock_report(&self, report_id: Uuid) -> AppResult<StockReportRecord> {
        sqlx::query_as::<_, StockReportRecord>(&format!(
            r#"
            SELECT {STOCK_REPORT_COLUMNS}
            FROM stock_reports r
            JOIN products p ON p.id = r.product_id
            WHERE r.id = $1
            "#
        ))
        .bind(report_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock report".to_string()))
    }

    /// List stock reports, newest first, with optional filters
    pub async fn list_stock_reports(
        &self,
        query: StockReportQuery,
    ) -> AppResult<Vec<StockReportRecord>> {
        let status = Self::parse_filter(query.status.as_deref(), |raw| {
            ReportStatus::parse(raw).map(|s| s.as_str())
        })?;
        let priority = Self::parse_filter(query.priority.as_deref(), |raw| {
            ReportPriority::parse(raw).map(|p| p.as_str())
        })?;
        let report_type = Self::parse_filter(query.report_type.as_deref(), |raw| {
            ReportType::parse(raw).map(|t| t.as_str())
        })?;

        let reports = sqlx::query_as::<_, StockReportRecord>(&format!(
            r#"
            SELECT {STOCK_REPORT_COLUMNS}
            FROM stock_reports r
            JOIN products p ON p.id = r.product_id
            WHERE ($1::text IS NULL OR r.status = $1)
              AND ($2::text IS NULL OR r.priority = $2)
              AND ($3::text IS NULL OR r.report_type = $3)
            ORDER BY r.created_at DESC
            "#
        ))
        .bind(status)
        .bind(priority)
        .bind(report_type)
        .fetch_all(&self.db)
        .await?;

        Ok(reports)
    }

    /// Move a stock report to another status.
    ///
    /// Entering `resolved` stamps who resolved it and when; moving out of
    /// `resolved` clears both again.
    pub async fn update_report_status(
        &self,
        report_id: Uuid,
        user_id: Uuid,
        input: UpdateReportStatusInput,
    ) -> AppResult<StockReportRecord> {
        let status = ReportStatus::parse(&input.status).ok_or_else(|| AppError::Validation {
            field: "status".to_string(),
            message: "Status must be open, in_progress, resolved or dismissed".to_string(),
            message_es: "El estado debe ser open, in_progress, resolved o dismissed".to_string(),
        })?;

        let resolved = status == ReportStatus::Resolved;
        let result = sqlx::query(
            r#"
            UPDATE stock_reports
            SET status = $1,
                resolved_by = CASE WHEN $2 THEN $3 ELSE NULL END,
                resolved_at = CASE WHEN $2 THEN NOW() ELSE NULL END,
                updated_at = NOW()
            WHERE id = $4
            "#,
        )
        .bind(status.as_str())
        .bind(resolved)
        .bind(user_id)
        .bind(report_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Stock report".to_string()));
        }

        self.get_stock_report(report_id).await
    }

    /// Per-product stock and retail value across the active catalog
    pub async fn inventory_report(&self) -> AppResult<Vec<InventoryReportRow>> {
        let rows = sqlx::query_as::<_, InventoryReportRow>(
            r#"
            SELECT p.code, p.name,
                   c.name AS category, s.name AS supplier,
                   p.stock, p.min_stock, p.price AS unit_price,
                   (p.stock * p.price) AS stock_value
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            LEFT JOIN suppliers s ON s.id = p.supplier_id
            WHERE p.is_active = TRUE
            ORDER BY p.name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Daily sales totals over a date range. Cancelled invoices are
    /// excluded. Defaults to the last 30 store-local days.
    pub async fn sales_report(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> AppResult<Vec<SalesReportRow>> {
        let end = end.unwrap_or_else(|| self.business.today());
        let start = start.unwrap_or(end - Duration::days(30));
        if start > end {
            return Err(AppError::Validation {
                field: "start".to_string(),
                message: "Start date is after the end date".to_string(),
                message_es: "La fecha inicial es posterior a la final".to_string(),
            });
        }

        let rows = sqlx::query_as::<_, SalesReportRow>(
            r#"
            SELECT d.day, d.invoice_count, COALESCE(s.items_sold, 0) AS items_sold, d.total
            FROM (
                SELECT invoice_date AS day,
                       COUNT(*) AS invoice_count,
                       COALESCE(SUM(total), 0) AS total
                FROM invoices
                WHERE status <> 'cancelled' AND invoice_date BETWEEN $1 AND $2
                GROUP BY invoice_date
            ) d
            LEFT JOIN (
                SELECT i.invoice_date AS day, SUM(ii.quantity)::BIGINT AS items_sold
                FROM invoices i
                JOIN invoice_items ii ON ii.invoice_id = i.id
                WHERE i.status <> 'cancelled' AND i.invoice_date BETWEEN $1 AND $2
                GROUP BY i.invoice_date
            ) s ON s.day = d.day
            ORDER BY d.day ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Export report rows as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }

    fn parse_filter(
        raw: Option<&str>,
        parse: impl Fn(&str) -> Option<&'static str>,
    ) -> AppResult<Option<&'static str>> {
        match raw {
            None | Some("") | Some("all") => Ok(None),
            Some(value) => parse(value).map(Some).ok_or_else(|| AppError::Validation {
                field: "filter".to_string(),
                message: format!("Unknown filter value: {}", value),
                message_es: format!("Valor de filtro desconocido: {}", value),
            }),
        }
    }
}
