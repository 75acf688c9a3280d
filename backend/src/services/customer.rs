//! Customer directory and purchase history

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::types::{PaginatedResponse, Pagination, PaginationMeta};
use shared::validation::{validate_colombian_phone, validate_email};

/// Customer service
#[derive(Clone)]
pub struct CustomerService {
    db: PgPool,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CustomerRecord {
    pub id: Uuid,
    pub name: String,
    pub document_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or replacing a customer
#[derive(Debug, Deserialize)]
pub struct CustomerInput {
    pub name: String,
    pub document_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CustomerQuery {
    pub search: Option<String>,
    pub include_inactive: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Purchase summary for one customer
#[derive(Debug, Serialize)]
pub struct CustomerStats {
    pub purchase_count: i64,
    pub total_spent: Decimal,
    pub last_purchase: Option<DateTime<Utc>>,
}

impl CustomerService {
    /// Create a new CustomerService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List customers with search and pagination
    pub async fn list(&self, query: CustomerQuery) -> AppResult<PaginatedResponse<CustomerRecord>> {
        let pagination = Pagination {
            page: query.page.unwrap_or(1).max(1),
            per_page: query.per_page.unwrap_or(20).clamp(1, 100),
        };
        let search = query
            .search
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| format!("%{}%", s.trim()));
        let include_inactive = query.include_inactive.unwrap_or(false);

        let total_items = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM customers
            WHERE ($1::text IS NULL
                   OR name ILIKE $1 OR document_id ILIKE $1
                   OR email ILIKE $1 OR phone ILIKE $1)
              AND ($2 OR is_active = TRUE)
            "#,
        )
        .bind(&search)
        .bind(include_inactive)
        .fetch_one(&self.db)
        .await?;

        let customers = sqlx::query_as::<_, CustomerRecord>(
            r#"
            SELECT id, name, document_id, email, phone, address, city,
                   is_active, created_at, updated_at
            FROM customers
            WHERE ($1::text IS NULL
                   OR name ILIKE $1 OR document_id ILIKE $1
                   OR email ILIKE $1 OR phone ILIKE $1)
              AND ($2 OR is_active = TRUE)
            ORDER BY name ASC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(&search)
        .bind(include_inactive)
        .bind(pagination.per_page as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(&self.db)
        .await?;

        Ok(PaginatedResponse {
            data: customers,
            pagination: PaginationMeta::new(&pagination, total_items as u64),
        })
    }

    /// Get one customer by id
    pub async fn get(&self, customer_id: Uuid) -> AppResult<CustomerRecord> {
        sqlx::query_as::<_, CustomerRecord>(
            r#"
            SELECT id, name, document_id, email, phone, address, city,
                   is_active, created_at, updated_at
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(customer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_string()))
    }

    /// Create a customer
    pub async fn create(&self, input: CustomerInput) -> AppResult<CustomerRecord> {
        Self::validate(&input)?;

        let customer_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO customers (name, document_id, email, phone, address, city)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(input.name.trim())
        .bind(&input.document_id)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(&input.city)
        .fetch_one(&self.db)
        .await?;

        self.get(customer_id).await
    }

    /// Replace a customer's fields
    pub async fn update(&self, customer_id: Uuid, input: CustomerInput) -> AppResult<CustomerRecord> {
        Self::validate(&input)?;

        let result = sqlx::query(
            r#"
            UPDATE customers
            SET name = $1, document_id = $2, email = $3, phone = $4,
                address = $5, city = $6, updated_at = NOW()
            WHERE id = $7
            "#,
        )
        .bind(input.name.trim())
        .bind(&input.document_id)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(&input.city)
        .bind(customer_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        self.get(customer_id).await
    }

    /// Deactivate a customer. Their invoices stay linked.
    pub async fn delete(&self, customer_id: Uuid) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE customers SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
                .bind(customer_id)
                .execute(&self.db)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        Ok(())
    }

    /// Purchase history summary. Cancelled invoices do not count.
    pub async fn stats(&self, customer_id: Uuid) -> AppResult<CustomerStats> {
        self.get(customer_id).await?;

        let row: (i64, Decimal, Option<DateTime<Utc>>) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COALESCE(SUM(total), 0),
                   MAX(created_at)
            FROM invoices
            WHERE customer_id = $1 AND status <> 'cancelled'
            "#,
        )
        .bind(customer_id)
        .fetch_one(&self.db)
        .await?;

        Ok(CustomerStats {
            purchase_count: row.0,
            total_spent: row.1,
            last_purchase: row.2,
        })
    }

    fn validate(input: &CustomerInput) -> AppResult<()> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Customer name is required".to_string(),
                message_es: "El nombre del cliente es obligatorio".to_string(),
            });
        }
        if let Some(email) = input.email.as_deref().filter(|e| !e.is_empty()) {
            if let Err(message) = validate_email(email) {
                return Err(AppError::Validation {
                    field: "email".to_string(),
                    message: message.to_string(),
                    message_es: "El correo electrónico no es válido".to_string(),
                });
            }
        }
        if let Some(phone) = input.phone.as_deref().filter(|p| !p.is_empty()) {
            if let Err(message) = validate_colombian_phone(phone) {
                return Err(AppError::Validation {
                    field: "phone".to_string(),
                    message: message.to_string(),
                    message_es: "El teléfono no es un número colombiano válido".to_string(),
                });
            }
        }
        Ok(())
    }
}
