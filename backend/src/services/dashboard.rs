//! Dashboard metrics aggregated over sales and the catalog

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::config::BusinessConfig;
use crate::error::AppResult;
use shared::billing::round_currency;

/// Dashboard service
#[derive(Clone)]
pub struct DashboardService {
    db: PgPool,
    business: BusinessConfig,
}

/// Everything the dashboard landing view shows
#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    /// Sales since the first of the store-local month, cancelled excluded
    pub month_sales_total: Decimal,
    pub month_invoice_count: i64,
    pub month_products_sold: i64,
    pub active_customers: i64,
    pub average_ticket: Decimal,
    pub sales_by_month: Vec<MonthlySales>,
    pub category_distribution: Vec<CategorySlice>,
    pub top_products: Vec<TopProduct>,
    pub low_stock: Vec<LowStockSummary>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct MonthlySales {
    /// First day of the month
    pub month: NaiveDate,
    pub invoice_count: i64,
    pub total: Decimal,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CategorySlice {
    pub category: String,
    pub color: Option<String>,
    pub product_count: i64,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct TopProduct {
    pub product_name: String,
    pub product_code: String,
    pub quantity_sold: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct LowStockSummary {
    pub code: String,
    pub name: String,
    pub stock: i32,
    pub min_stock: i32,
    pub stock_status: String,
}

const LOW_STOCK_LIMIT: i64 = 10;
const TOP_PRODUCTS_LIMIT: i64 = 5;

impl DashboardService {
    /// Create a new DashboardService instance
    pub fn new(db: PgPool, business: BusinessConfig) -> Self {
        Self { db, business }
    }

    /// Collect the full dashboard payload
    pub async fn metrics(&self) -> AppResult<DashboardMetrics> {
        let today = self.business.today();
        let month_start = today.with_day(1).unwrap_or(today);

        // Month-to-date sales
        let (month_invoice_count, month_sales_total): (i64, Decimal) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COALESCE(SUM(total), 0)
            FROM invoices
            WHERE status <> 'cancelled' AND invoice_date >= $1
            "#,
        )
        .bind(month_start)
        .fetch_one(&self.db)
        .await?;

        // Units sold month to date
        let month_products_sold: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(ii.quantity), 0)::BIGINT
            FROM invoice_items ii
            JOIN invoices i ON i.id = ii.invoice_id
            WHERE i.status <> 'cancelled' AND i.invoice_date >= $1
            "#,
        )
        .bind(month_start)
        .fetch_one(&self.db)
        .await?;

        // Customers with at least one purchase this month
        let active_customers: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(DISTINCT customer_id)
            FROM invoices
            WHERE status <> 'cancelled' AND invoice_date >= $1
              AND customer_id IS NOT NULL
            "#,
        )
        .bind(month_start)
        .fetch_one(&self.db)
        .await?;

        let average_ticket = if month_invoice_count > 0 {
            round_currency(month_sales_total / Decimal::from(month_invoice_count))
        } else {
            Decimal::ZERO
        };

        // Last six calendar months including the current one
        let series_start = Self::months_back(month_start, 5);
        let sales_by_month = sqlx::query_as::<_, MonthlySales>(
            r#"
            SELECT DATE_TRUNC('month', invoice_date)::DATE AS month,
                   COUNT(*) AS invoice_count,
                   COALESCE(SUM(total), 0) AS total
            FROM invoices
            WHERE status <> 'cancelled' AND invoice_date >= $1
            GROUP BY DATE_TRUNC('month', invoice_date)
            ORDER BY month ASC
            "#,
        )
        .bind(series_start)
        .fetch_all(&self.db)
        .await?;

        // Active product counts per category
        let category_distribution = sqlx::query_as::<_, CategorySlice>(
            r#"
            SELECT COALESCE(c.name, 'Sin categoría') AS category,
                   c.color,
                   COUNT(p.id) AS product_count
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            WHERE p.is_active = TRUE
            GROUP BY c.name, c.color
            ORDER BY product_count DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        // Best sellers by units, all time
        let top_products = sqlx::query_as::<_, TopProduct>(
            r#"
            SELECT ii.product_name, ii.product_code,
                   SUM(ii.quantity)::BIGINT AS quantity_sold,
                   COALESCE(SUM(ii.line_total), 0) AS revenue
            FROM invoice_items ii
            JOIN invoices i ON i.id = ii.invoice_id
            WHERE i.status <> 'cancelled'
            GROUP BY ii.product_name, ii.product_code
            ORDER BY quantity_sold DESC
            LIMIT $1
            "#,
        )
        .bind(TOP_PRODUCTS_LIMIT)
        .fetch_all(&self.db)
        .await?;

        // Worst-stocked products first
        let low_stock = sqlx::query_as::<_, LowStockSummary>(
            r#"
            SELECT code, name, stock, min_stock, stock_status
            FROM low_stock_products
            ORDER BY CASE stock_status
                WHEN 'critical' THEN 0
                WHEN 'low' THEN 1
                ELSE 2
            END, stock ASC
            LIMIT $1
            "#,
        )
        .bind(LOW_STOCK_LIMIT)
        .fetch_all(&self.db)
        .await?;

        Ok(DashboardMetrics {
            month_sales_total,
            month_invoice_count,
            month_products_sold,
            active_customers,
            average_ticket,
            sales_by_month,
            category_distribution,
            top_products,
            low_stock,
        })
    }

    /// First day of the month `count` months before `from` (itself a first
    /// of month)
    fn months_back(from: NaiveDate, count: u32) -> NaiveDate {
        let mut date = from;
        for _ in 0..count {
            // Stepping one day before the first lands in the previous month
            let previous = date - Duration::days(1);
            date = previous.with_day(1).unwrap_or(previous);
        }
        date
    }
}
