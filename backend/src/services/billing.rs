//! Billing service: invoice numbering, creation, queries, and status changes

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::config::BusinessConfig;
use crate::error::{AppError, AppResult};
use shared::billing::{next_invoice_number, round_currency, DraftItem, InvoiceDraft};
use shared::models::{InvoiceStatus, MovementType};
use shared::types::{PaginatedResponse, Pagination, PaginationMeta};

/// Billing service for invoices
#[derive(Clone)]
pub struct BillingService {
    db: PgPool,
    business: BusinessConfig,
}

/// Invoice header row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InvoiceRecord {
    pub id: Uuid,
    pub invoice_number: String,
    pub customer_id: Option<Uuid>,
    pub customer_name: String,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: String,
    pub subtotal: Decimal,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Invoice line row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InvoiceItemRecord {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub product_id: Option<Uuid>,
    pub product_code: String,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount: Decimal,
    pub line_total: Decimal,
}

/// Invoice header plus its lines
#[derive(Debug, Serialize)]
pub struct InvoiceWithItems {
    #[serde(flatten)]
    pub invoice: InvoiceRecord,
    pub items: Vec<InvoiceItemRecord>,
}

/// One line of an invoice creation request
#[derive(Debug, Deserialize)]
pub struct CreateInvoiceItem {
    pub product_id: Uuid,
    pub quantity: i32,
    pub discount: Option<Decimal>,
}

/// Input for creating an invoice
#[derive(Debug, Deserialize)]
pub struct CreateInvoiceInput {
    pub customer_id: Option<Uuid>,
    /// Used when no registered customer is attached
    pub customer_name: Option<String>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    /// Overrides the configured default tax rate when present
    pub tax_rate: Option<Decimal>,
    pub items: Vec<CreateInvoiceItem>,
}

/// Query parameters for the invoice listing
#[derive(Debug, Default, Deserialize)]
pub struct InvoiceQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusInput {
    pub status: String,
}

/// Counts and totals per invoice status
#[derive(Debug, Serialize)]
pub struct BillingStats {
    pub total_invoices: i64,
    pub total_billed: Decimal,
    pub paid_count: i64,
    pub paid_total: Decimal,
    pub pending_count: i64,
    pub pending_total: Decimal,
    pub cancelled_count: i64,
    pub overdue_count: i64,
}

#[derive(FromRow)]
struct ProductForSale {
    id: Uuid,
    code: String,
    name: String,
    price: Decimal,
    stock: i32,
    is_active: bool,
}

impl BillingService {
    /// Create a new BillingService instance
    pub fn new(db: PgPool, business: BusinessConfig) -> Self {
        Self { db, business }
    }

    /// Next invoice number, reading the latest issued one under a row lock.
    ///
    /// Must run inside the transaction that inserts the invoice so two
    /// concurrent sales cannot observe the same latest number. The UNIQUE
    /// constraint on invoice_number backstops anything that slips through.
    async fn next_number(&self, tx: &mut Transaction<'_, Postgres>) -> AppResult<String> {
        let latest: Option<String> = sqlx::query_scalar(
            r#"
            SELECT invoice_number FROM invoices
            ORDER BY invoice_number DESC
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .fetch_optional(&mut **tx)
        .await?;

        Ok(next_invoice_number(latest.as_deref()))
    }

    /// Create an invoice and deduct stock, all in one transaction.
    ///
    /// Either the invoice exists and every line's stock came off, or
    /// nothing changed. Movement audit rows are written after commit and
    /// are best effort.
    pub async fn create_invoice(
        &self,
        created_by: Uuid,
        input: CreateInvoiceInput,
    ) -> AppResult<InvoiceWithItems> {
        if input.items.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "An invoice needs at least one item".to_string(),
                message_es: "La factura necesita al menos un producto".to_string(),
            });
        }

        let tax_rate = match input.tax_rate {
            Some(rate) if rate >= Decimal::ZERO => rate,
            Some(_) => {
                return Err(AppError::Validation {
                    field: "tax_rate".to_string(),
                    message: "Tax rate cannot be negative".to_string(),
                    message_es: "La tasa de impuesto no puede ser negativa".to_string(),
                })
            }
            None => self.default_tax_rate().await?,
        };

        let customer_name = match input.customer_id {
            Some(customer_id) => {
                sqlx::query_scalar::<_, String>("SELECT name FROM customers WHERE id = $1")
                    .bind(customer_id)
                    .fetch_optional(&self.db)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Customer".to_string()))?
            }
            None => input
                .customer_name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .unwrap_or("Cliente general")
                .to_string(),
        };

        // Assemble a draft first. This reuses the same stock guards the
        // cart uses, so a request with a bad quantity or an oversell fails
        // before any database write.
        let mut draft = InvoiceDraft::new(tax_rate);
        draft.customer_id = input.customer_id;
        draft.customer_name = customer_name;
        draft.payment_method = input.payment_method;
        draft.notes = input.notes;
        for line in &input.items {
            let product = sqlx::query_as::<_, ProductForSale>(
                "SELECT id, code, name, price, stock, is_active FROM products WHERE id = $1",
            )
            .bind(line.product_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product {}", line.product_id)))?;

            if !product.is_active {
                return Err(AppError::Validation {
                    field: "items".to_string(),
                    message: format!("Product {} is inactive", product.code),
                    message_es: format!("El producto {} está inactivo", product.code),
                });
            }

            draft.add_item(DraftItem {
                product_id: product.id,
                product_name: product.name,
                product_code: product.code,
                quantity: line.quantity,
                unit_price: product.price,
                discount: line.discount.unwrap_or(Decimal::ZERO),
                available_stock: product.stock,
            })?;
        }

        let totals = draft.totals();
        let invoice_date = self.business.today();
        let due_date = invoice_date + Duration::days(self.business.invoice_due_days);

        let mut tx = self.db.begin().await?;

        let invoice_number = self.next_number(&mut tx).await?;

        let invoice_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO invoices (
                invoice_number, customer_id, customer_name, invoice_date, due_date,
                status, subtotal, tax_rate, tax_amount, discount, total,
                payment_method, notes, created_by
            )
            VALUES ($1, $2, $3, $4, $5, 'pending', $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id
            "#,
        )
        .bind(&invoice_number)
        .bind(draft.customer_id)
        .bind(&draft.customer_name)
        .bind(invoice_date)
        .bind(due_date)
        .bind(totals.subtotal)
        .bind(tax_rate)
        .bind(totals.tax_amount)
        .bind(draft.total_discount())
        .bind(totals.total)
        .bind(&draft.payment_method)
        .bind(&draft.notes)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        for item in &draft.items {
            sqlx::query(
                r#"
                INSERT INTO invoice_items (
                    invoice_id, product_id, product_code, product_name,
                    quantity, unit_price, discount, line_total
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(invoice_id)
            .bind(item.product_id)
            .bind(&item.product_code)
            .bind(&item.product_name)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.discount)
            .bind(round_currency(item.line_total()))
            .execute(&mut *tx)
            .await?;

            // Conditional decrement. Zero rows affected means another sale
            // took the stock since the draft was validated.
            let decremented = sqlx::query(
                "UPDATE products SET stock = stock - $1, updated_at = NOW() WHERE id = $2 AND stock >= $1",
            )
            .bind(item.quantity)
            .bind(item.product_id)
            .execute(&mut *tx)
            .await?;

            if decremented.rows_affected() == 0 {
                return Err(AppError::InsufficientStock(item.product_name.clone()));
            }
        }

        tx.commit().await?;

        self.record_sale_movements(invoice_id, &invoice_number, created_by, &draft.items)
            .await;

        self.get_invoice(invoice_id).await
    }

    /// Write the exit movement per sold line. Best effort: the sale already
    /// committed, so failures here only log.
    async fn record_sale_movements(
        &self,
        invoice_id: Uuid,
        invoice_number: &str,
        user_id: Uuid,
        items: &[DraftItem],
    ) {
        for item in items {
            let stock_after =
                sqlx::query_scalar::<_, i32>("SELECT stock FROM products WHERE id = $1")
                    .bind(item.product_id)
                    .fetch_one(&self.db)
                    .await;

            let result = match stock_after {
                Ok(new_stock) => sqlx::query(
                    r#"
                    INSERT INTO stock_movements (
                        product_id, movement_type, quantity, previous_stock, new_stock,
                        reference_type, reference_id, user_id, notes
                    )
                    VALUES ($1, $2, $3, $4, $5, 'invoice', $6, $7, $8)
                    "#,
                )
                .bind(item.product_id)
                .bind(MovementType::Exit.as_str())
                .bind(-item.quantity)
                .bind(new_stock + item.quantity)
                .bind(new_stock)
                .bind(invoice_id)
                .bind(user_id)
                .bind(format!("Venta en factura {}", invoice_number))
                .execute(&self.db)
                .await
                .map(|_| ()),
                Err(error) => Err(error),
            };

            if let Err(error) = result {
                tracing::warn!(
                    invoice_number,
                    product_id = %item.product_id,
                    error = %error,
                    "invoice committed but stock movement row failed"
                );
            }
        }
    }

    /// List invoices with search, status and date filters, newest first
    pub async fn list_invoices(
        &self,
        query: InvoiceQuery,
    ) -> AppResult<PaginatedResponse<InvoiceRecord>> {
        let pagination = Pagination {
            page: query.page.unwrap_or(1).max(1),
            per_page: query.per_page.unwrap_or(20).clamp(1, 100),
        };

        let status_filter = match query.status.as_deref() {
            None | Some("") | Some("all") => None,
            Some(raw) => Some(
                InvoiceStatus::parse(raw)
                    .ok_or_else(|| AppError::Validation {
                        field: "status".to_string(),
                        message: "Unknown invoice status".to_string(),
                        message_es: "Estado de factura desconocido".to_string(),
                    })?
                    .as_str()
                    .to_string(),
            ),
        };

        // Free text matches the number and customer name; a Spanish or
        // English status word ("pagada", "pending") also matches by status.
        let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let search_pattern = search.map(|s| format!("%{}%", s));
        let search_status = search
            .and_then(InvoiceStatus::from_search_term)
            .map(|s| s.as_str().to_string());

        let total_items = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM invoices
            WHERE ($1::text IS NULL
                   OR invoice_number ILIKE $1 OR customer_name ILIKE $1
                   OR status = $2)
              AND ($3::text IS NULL OR status = $3)
              AND ($4::date IS NULL OR invoice_date >= $4)
              AND ($5::date IS NULL OR invoice_date <= $5)
            "#,
        )
        .bind(&search_pattern)
        .bind(&search_status)
        .bind(&status_filter)
        .bind(query.from)
        .bind(query.to)
        .fetch_one(&self.db)
        .await?;

        let invoices = sqlx::query_as::<_, InvoiceRecord>(
            r#"
            SELECT id, invoice_number, customer_id, customer_name, invoice_date, due_date,
                   status, subtotal, tax_rate, tax_amount, discount, total,
                   payment_method, notes, created_by, created_at, updated_at
            FROM invoices
            WHERE ($1::text IS NULL
                   OR invoice_number ILIKE $1 OR customer_name ILIKE $1
                   OR status = $2)
              AND ($3::text IS NULL OR status = $3)
              AND ($4::date IS NULL OR invoice_date >= $4)
              AND ($5::date IS NULL OR invoice_date <= $5)
            ORDER BY created_at DESC
            LIMIT $6 OFFSET $7
            "#,
        )
        .bind(&search_pattern)
        .bind(&search_status)
        .bind(&status_filter)
        .bind(query.from)
        .bind(query.to)
        .bind(pagination.per_page as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(&self.db)
        .await?;

        Ok(PaginatedResponse {
            data: invoices,
            pagination: PaginationMeta::new(&pagination, total_items as u64),
        })
    }

    /// Get an invoice with its lines
    pub async fn get_invoice(&self, invoice_id: Uuid) -> AppResult<InvoiceWithItems> {
        let invoice = sqlx::query_as::<_, InvoiceRecord>(
            r#"
            SELECT id, invoice_number, customer_id, customer_name, invoice_date, due_date,
                   status, subtotal, tax_rate, tax_amount, discount, total,
                   payment_method, notes, created_by, created_at, updated_at
            FROM invoices
            WHERE id = $1
            "#,
        )
        .bind(invoice_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Invoice".to_string()))?;

        let items = sqlx::query_as::<_, InvoiceItemRecord>(
            r#"
            SELECT id, invoice_id, product_id, product_code, product_name,
                   quantity, unit_price, discount, line_total
            FROM invoice_items
            WHERE invoice_id = $1
            ORDER BY product_name ASC
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.db)
        .await?;

        Ok(InvoiceWithItems { invoice, items })
    }

    /// Change an invoice's status
    pub async fn update_status(
        &self,
        invoice_id: Uuid,
        input: UpdateStatusInput,
    ) -> AppResult<InvoiceWithItems> {
        let status = InvoiceStatus::parse(&input.status).ok_or_else(|| AppError::Validation {
            field: "status".to_string(),
            message: "Status must be pending, paid, cancelled or overdue".to_string(),
            message_es: "El estado debe ser pending, paid, cancelled u overdue".to_string(),
        })?;

        let result =
            sqlx::query("UPDATE invoices SET status = $1, updated_at = NOW() WHERE id = $2")
                .bind(status.as_str())
                .bind(invoice_id)
                .execute(&self.db)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Invoice".to_string()));
        }

        self.get_invoice(invoice_id).await
    }

    /// Counts and billed totals per status
    pub async fn stats(&self) -> AppResult<BillingStats> {
        let row: (i64, Decimal, i64, Decimal, i64, Decimal, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COALESCE(SUM(total), 0),
                   COUNT(*) FILTER (WHERE status = 'paid'),
                   COALESCE(SUM(total) FILTER (WHERE status = 'paid'), 0),
                   COUNT(*) FILTER (WHERE status = 'pending'),
                   COALESCE(SUM(total) FILTER (WHERE status = 'pending'), 0),
                   COUNT(*) FILTER (WHERE status = 'cancelled'),
                   COUNT(*) FILTER (WHERE status = 'overdue')
            FROM invoices
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        Ok(BillingStats {
            total_invoices: row.0,
            total_billed: row.1,
            paid_count: row.2,
            paid_total: row.3,
            pending_count: row.4,
            pending_total: row.5,
            cancelled_count: row.6,
            overdue_count: row.7,
        })
    }

    /// Configured default tax rate, falling back when the setting is
    /// missing or unparseable
    pub async fn default_tax_rate(&self) -> AppResult<Decimal> {
        let raw: Option<String> = sqlx::query_scalar(
            "SELECT setting_value FROM system_settings WHERE setting_key = $1",
        )
        .bind(shared::models::setting_keys::DEFAULT_TAX_RATE)
        .fetch_optional(&self.db)
        .await?;

        let fallback = shared::models::FALLBACK_TAX_RATE;
        Ok(raw
            .as_deref()
            .unwrap_or(fallback)
            .parse::<Decimal>()
            .unwrap_or_else(|_| fallback.parse().unwrap_or_else(|_| Decimal::from(16))))
    }
}
