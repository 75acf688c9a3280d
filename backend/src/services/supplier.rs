//! Supplier directory

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::types::{PaginatedResponse, Pagination, PaginationMeta};
use shared::validation::{validate_colombian_phone, validate_email, validate_nit};

/// Supplier service
#[derive(Clone)]
pub struct SupplierService {
    db: PgPool,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SupplierRecord {
    pub id: Uuid,
    pub name: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub nit: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or replacing a supplier
#[derive(Debug, Deserialize)]
pub struct SupplierInput {
    pub name: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub nit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SupplierQuery {
    pub search: Option<String>,
    pub include_inactive: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// A product as listed under its supplier
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SuppliedProduct {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub stock: i32,
    pub min_stock: i32,
    pub price: rust_decimal::Decimal,
    pub is_active: bool,
}

impl SupplierService {
    /// Create a new SupplierService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List suppliers with search and pagination
    pub async fn list(&self, query: SupplierQuery) -> AppResult<PaginatedResponse<SupplierRecord>> {
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
            FROM suppliers
            WHERE ($1::text IS NULL
                   OR name ILIKE $1 OR contact_name ILIKE $1
                   OR email ILIKE $1 OR nit ILIKE $1)
              AND ($2 OR is_active = TRUE)
            "#,
        )
        .bind(&search)
        .bind(include_inactive)
        .fetch_one(&self.db)
        .await?;

        let suppliers = sqlx::query_as::<_, SupplierRecord>(
            r#"
            SELECT id, name, contact_name, email, phone, address, nit,
                   is_active, created_at, updated_at
            FROM suppliers
            WHERE ($1::text IS NULL
                   OR name ILIKE $1 OR contact_name ILIKE $1
                   OR email ILIKE $1 OR nit ILIKE $1)
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
            data: suppliers,
            pagination: PaginationMeta::new(&pagination, total_items as u64),
        })
    }

    /// Get one supplier by id
    pub async fn get(&self, supplier_id: Uuid) -> AppResult<SupplierRecord> {
        sqlx::query_as::<_, SupplierRecord>(
            r#"
            SELECT id, name, contact_name, email, phone, address, nit,
                   is_active, created_at, updated_at
            FROM suppliers
            WHERE id = $1
            "#,
        )
        .bind(supplier_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Supplier".to_string()))
    }

    /// Create a supplier
    pub async fn create(&self, input: SupplierInput) -> AppResult<SupplierRecord> {
        Self::validate(&input)?;

        let supplier_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO suppliers (name, contact_name, email, phone, address, nit)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(input.name.trim())
        .bind(&input.contact_name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(&input.nit)
        .fetch_one(&self.db)
        .await?;

        self.get(supplier_id).await
    }

    /// Replace a supplier's fields
    pub async fn update(&self, supplier_id: Uuid, input: SupplierInput) -> AppResult<SupplierRecord> {
        Self::validate(&input)?;

        let result = sqlx::query(
            r#"
            UPDATE suppliers
            SET name = $1, contact_name = $2, email = $3, phone = $4,
                address = $5, nit = $6, updated_at = NOW()
            WHERE id = $7
            "#,
        )
        .bind(input.name.trim())
        .bind(&input.contact_name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(&input.nit)
        .bind(supplier_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Supplier".to_string()));
        }

        self.get(supplier_id).await
    }

    /// Deactivate a supplier. Products keep their reference.
    pub async fn delete(&self, supplier_id: Uuid) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE suppliers SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
                .bind(supplier_id)
                .execute(&self.db)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Supplier".to_string()));
        }

        Ok(())
    }

    /// Products sourced from this supplier
    pub async fn products(&self, supplier_id: Uuid) -> AppResult<Vec<SuppliedProduct>> {
        self.get(supplier_id).await?;

        let products = sqlx::query_as::<_, SuppliedProduct>(
            r#"
            SELECT id, code, name, stock, min_stock, price, is_active
            FROM products
            WHERE supplier_id = $1
            ORDER BY name ASC
            "#,
        )
        .bind(supplier_id)
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }

    fn validate(input: &SupplierInput) -> AppResult<()> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Supplier name is required".to_string(),
                message_es: "El nombre del proveedor es obligatorio".to_string(),
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
        if let Some(nit) = input.nit.as_deref().filter(|n| !n.is_empty()) {
            if let Err(message) = validate_nit(nit) {
                return Err(AppError::Validation {
                    field: "nit".to_string(),
                    message: message.to_string(),
                    message_es: "El NIT no es válido".to_string(),
                });
            }
        }
        Ok(())
    }
}
