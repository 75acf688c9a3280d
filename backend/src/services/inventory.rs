//! Inventory service for the product catalog, categories, and stock tracking

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::MovementType;
use shared::types::{PaginatedResponse, Pagination, PaginationMeta};
use shared::validation::{validate_hex_color, validate_price};

/// Inventory service for products and categories
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

/// A catalog product, with its category and supplier names joined in
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductRecord {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub supplier_id: Option<Uuid>,
    pub supplier_name: Option<String>,
    pub brand: Option<String>,
    pub stock: i32,
    pub min_stock: i32,
    pub price: Decimal,
    pub cost: Decimal,
    pub location: Option<String>,
    pub barcode: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const PRODUCT_COLUMNS: &str = r#"
    p.id, p.code, p.name, p.description,
    p.category_id, c.name AS category_name,
    p.supplier_id, s.name AS supplier_name,
    p.brand, p.stock, p.min_stock, p.price, p.cost,
    p.location, p.barcode, p.image_url, p.is_active,
    p.created_at, p.updated_at
"#;

/// Input for creating or replacing a product
#[derive(Debug, Deserialize)]
pub struct ProductInput {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub brand: Option<String>,
    pub stock: i32,
    pub min_stock: i32,
    pub price: Decimal,
    pub cost: Decimal,
    pub location: Option<String>,
    pub barcode: Option<String>,
    pub image_url: Option<String>,
}

/// Query parameters for the product listing
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub include_inactive: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Input for setting a product's stock to an absolute value
#[derive(Debug, Deserialize)]
pub struct SetStockInput {
    pub new_stock: i32,
    /// Defaults to "adjustment" when omitted
    pub movement_type: Option<String>,
    pub notes: Option<String>,
}

/// A category with how many products reference it
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CategoryRecord {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub product_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Input for creating or updating a category
#[derive(Debug, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
    pub color: String,
}

/// A recorded stock change
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockMovementRecord {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub movement_type: String,
    pub quantity: i32,
    pub previous_stock: i32,
    pub new_stock: i32,
    pub reference_type: Option<String>,
    pub reference_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Entry from the low stock view
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LowStockEntry {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub stock: i32,
    pub min_stock: i32,
    pub location: Option<String>,
    pub category_name: Option<String>,
    pub supplier_name: Option<String>,
    pub stock_status: String,
}

/// Aggregate catalog numbers for the inventory header cards
#[derive(Debug, Serialize)]
pub struct InventoryMetrics {
    pub total_products: i64,
    pub active_products: i64,
    pub total_value: Decimal,
    pub low_stock_count: i64,
}

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List products with search, filters, and pagination
    pub async fn list_products(
        &self,
        query: ProductQuery,
    ) -> AppResult<PaginatedResponse<ProductRecord>> {
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
            FROM products p
            WHERE ($1::text IS NULL
                   OR p.code ILIKE $1 OR p.name ILIKE $1
                   OR p.brand ILIKE $1 OR p.barcode ILIKE $1)
              AND ($2::uuid IS NULL OR p.category_id = $2)
              AND ($3::uuid IS NULL OR p.supplier_id = $3)
              AND ($4 OR p.is_active = TRUE)
            "#,
        )
        .bind(&search)
        .bind(query.category_id)
        .bind(query.supplier_id)
        .bind(include_inactive)
        .fetch_one(&self.db)
        .await?;

        let products = sqlx::query_as::<_, ProductRecord>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            LEFT JOIN suppliers s ON s.id = p.supplier_id
            WHERE ($1::text IS NULL
                   OR p.code ILIKE $1 OR p.name ILIKE $1
                   OR p.brand ILIKE $1 OR p.barcode ILIKE $1)
              AND ($2::uuid IS NULL OR p.category_id = $2)
              AND ($3::uuid IS NULL OR p.supplier_id = $3)
              AND ($4 OR p.is_active = TRUE)
            ORDER BY p.name ASC
            LIMIT $5 OFFSET $6
            "#
        ))
        .bind(&search)
        .bind(query.category_id)
        .bind(query.supplier_id)
        .bind(include_inactive)
        .bind(pagination.per_page as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(&self.db)
        .await?;

        Ok(PaginatedResponse {
            data: products,
            pagination: PaginationMeta::new(&pagination, total_items as u64),
        })
    }

    /// Get one product by id
    pub async fn get_product(&self, product_id: Uuid) -> AppResult<ProductRecord> {
        sqlx::query_as::<_, ProductRecord>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            LEFT JOIN suppliers s ON s.id = p.supplier_id
            WHERE p.id = $1
            "#
        ))
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }

    /// Create a product
    pub async fn create_product(&self, input: ProductInput) -> AppResult<ProductRecord> {
        Self::validate_product(&input)?;

        let code_taken =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE code = $1")
                .bind(&input.code)
                .fetch_one(&self.db)
                .await?;

        if code_taken > 0 {
            return Err(AppError::DuplicateEntry("product code".to_string()));
        }

        let product_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO products (
                code, name, description, category_id, supplier_id, brand,
                stock, min_stock, price, cost, location, barcode, image_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id
            "#,
        )
        .bind(&input.code)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.category_id)
        .bind(input.supplier_id)
        .bind(&input.brand)
        .bind(input.stock)
        .bind(input.min_stock)
        .bind(input.price)
        .bind(input.cost)
        .bind(&input.location)
        .bind(&input.barcode)
        .bind(&input.image_url)
        .fetch_one(&self.db)
        .await?;

        self.get_product(product_id).await
    }

    /// Replace a product's catalog fields
    pub async fn update_product(
        &self,
        product_id: Uuid,
        input: ProductInput,
    ) -> AppResult<ProductRecord> {
        Self::validate_product(&input)?;

        let code_taken = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE code = $1 AND id <> $2",
        )
        .bind(&input.code)
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        if code_taken > 0 {
            return Err(AppError::DuplicateEntry("product code".to_string()));
        }

        let result = sqlx::query(
            r#"
            UPDATE products
            SET code = $1, name = $2, description = $3, category_id = $4,
                supplier_id = $5, brand = $6, stock = $7, min_stock = $8,
                price = $9, cost = $10, location = $11, barcode = $12,
                image_url = $13, updated_at = NOW()
            WHERE id = $14
            "#,
        )
        .bind(&input.code)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.category_id)
        .bind(input.supplier_id)
        .bind(&input.brand)
        .bind(input.stock)
        .bind(input.min_stock)
        .bind(input.price)
        .bind(input.cost)
        .bind(&input.location)
        .bind(&input.barcode)
        .bind(&input.image_url)
        .bind(product_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        self.get_product(product_id).await
    }

    /// Deactivate a product, keeping its history
    pub async fn delete_product(&self, product_id: Uuid) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE products SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
                .bind(product_id)
                .execute(&self.db)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        Ok(())
    }

    /// Set a product's stock to an absolute value and record the movement.
    ///
    /// The stock write commits first; the audit row is best effort and a
    /// failure there never undoes the stock change.
    pub async fn set_stock(
        &self,
        product_id: Uuid,
        user_id: Uuid,
        input: SetStockInput,
    ) -> AppResult<ProductRecord> {
        if input.new_stock < 0 {
            return Err(AppError::Validation {
                field: "new_stock".to_string(),
                message: "Stock cannot be negative".to_string(),
                message_es: "El stock no puede ser negativo".to_string(),
            });
        }
        let movement_type = match input.movement_type.as_deref() {
            None => MovementType::Adjustment,
            Some(raw) => MovementType::parse(raw).ok_or_else(|| AppError::Validation {
                field: "movement_type".to_string(),
                message: "Movement type must be entry, exit or adjustment".to_string(),
                message_es: "El tipo de movimiento debe ser entry, exit o adjustment".to_string(),
            })?,
        };

        let mut tx = self.db.begin().await?;

        let previous_stock = sqlx::query_scalar::<_, i32>(
            "SELECT stock FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        sqlx::query("UPDATE products SET stock = $1, updated_at = NOW() WHERE id = $2")
            .bind(input.new_stock)
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let movement = self
            .record_movement(
                product_id,
                movement_type,
                input.new_stock - previous_stock,
                previous_stock,
                input.new_stock,
                None,
                None,
                Some(user_id),
                input.notes.as_deref(),
            )
            .await;

        if let Err(error) = movement {
            tracing::warn!(
                product_id = %product_id,
                error = %error,
                "stock updated but movement audit row failed"
            );
        }

        self.get_product(product_id).await
    }

    /// Insert one stock movement audit row
    #[allow(clippy::too_many_arguments)]
    pub async fn record_movement(
        &self,
        product_id: Uuid,
        movement_type: MovementType,
        quantity: i32,
        previous_stock: i32,
        new_stock: i32,
        reference_type: Option<&str>,
        reference_id: Option<Uuid>,
        user_id: Option<Uuid>,
        notes: Option<&str>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO stock_movements (
                product_id, movement_type, quantity, previous_stock, new_stock,
                reference_type, reference_id, user_id, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(product_id)
        .bind(movement_type.as_str())
        .bind(quantity)
        .bind(previous_stock)
        .bind(new_stock)
        .bind(reference_type)
        .bind(reference_id)
        .bind(user_id)
        .bind(notes)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// List recent stock movements, optionally for one product
    pub async fn list_movements(
        &self,
        product_id: Option<Uuid>,
        limit: i64,
    ) -> AppResult<Vec<StockMovementRecord>> {
        let movements = sqlx::query_as::<_, StockMovementRecord>(
            r#"
            SELECT m.id, m.product_id, p.name AS product_name, m.movement_type,
                   m.quantity, m.previous_stock, m.new_stock,
                   m.reference_type, m.reference_id, m.user_id, m.notes, m.created_at
            FROM stock_movements m
            JOIN products p ON p.id = m.product_id
            WHERE $1::uuid IS NULL OR m.product_id = $1
            ORDER BY m.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(product_id)
        .bind(limit.clamp(1, 500))
        .fetch_all(&self.db)
        .await?;

        Ok(movements)
    }

    /// Products at or below their minimum stock
    pub async fn low_stock(&self) -> AppResult<Vec<LowStockEntry>> {
        let entries = sqlx::query_as::<_, LowStockEntry>(
            r#"
            SELECT id, code, name, stock, min_stock, location,
                   category_name, supplier_name, stock_status
            FROM low_stock_products
            ORDER BY CASE stock_status
                WHEN 'critical' THEN 0
                WHEN 'low' THEN 1
                ELSE 2
            END, stock ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }

    /// Aggregate counts and inventory value for the header cards
    pub async fn metrics(&self) -> AppResult<InventoryMetrics> {
        let (total_products, active_products): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE is_active) AS active
            FROM products
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        let total_value: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(stock * price), 0) FROM products WHERE is_active = TRUE",
        )
        .fetch_one(&self.db)
        .await?;

        let low_stock_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM low_stock_products")
                .fetch_one(&self.db)
                .await?;

        Ok(InventoryMetrics {
            total_products,
            active_products,
            total_value,
            low_stock_count,
        })
    }

    // ------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------

    /// List categories with product counts
    pub async fn list_categories(&self) -> AppResult<Vec<CategoryRecord>> {
        let categories = sqlx::query_as::<_, CategoryRecord>(
            r#"
            SELECT c.id, c.name, c.description, c.color,
                   COUNT(p.id) AS product_count,
                   c.created_at
            FROM categories c
            LEFT JOIN products p ON p.category_id = c.id AND p.is_active = TRUE
            GROUP BY c.id, c.name, c.description, c.color, c.created_at
            ORDER BY c.name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(categories)
    }

    /// Create a category. Both the name and the badge color must be unique.
    pub async fn create_category(&self, input: CategoryInput) -> AppResult<CategoryRecord> {
        Self::validate_category(&input)?;
        self.check_category_conflicts(&input, None).await?;

        let category_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO categories (name, description, color)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.color)
        .fetch_one(&self.db)
        .await?;

        self.get_category(category_id).await
    }

    /// Update a category, re-checking name and color uniqueness
    pub async fn update_category(
        &self,
        category_id: Uuid,
        input: CategoryInput,
    ) -> AppResult<CategoryRecord> {
        Self::validate_category(&input)?;
        self.check_category_conflicts(&input, Some(category_id)).await?;

        let result = sqlx::query(
            "UPDATE categories SET name = $1, description = $2, color = $3 WHERE id = $4",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.color)
        .bind(category_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Category".to_string()));
        }

        self.get_category(category_id).await
    }

    /// Delete a category, refusing while products still reference it
    pub async fn delete_category(&self, category_id: Uuid) -> AppResult<()> {
        let in_use = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE category_id = $1",
        )
        .bind(category_id)
        .fetch_one(&self.db)
        .await?;

        if in_use > 0 {
            return Err(AppError::Conflict {
                resource: "category".to_string(),
                message: "Category still has products assigned".to_string(),
                message_es: "La categoría todavía tiene productos asignados".to_string(),
            });
        }

        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(category_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Category".to_string()));
        }

        Ok(())
    }

    async fn get_category(&self, category_id: Uuid) -> AppResult<CategoryRecord> {
        sqlx::query_as::<_, CategoryRecord>(
            r#"
            SELECT c.id, c.name, c.description, c.color,
                   COUNT(p.id) AS product_count,
                   c.created_at
            FROM categories c
            LEFT JOIN products p ON p.category_id = c.id AND p.is_active = TRUE
            WHERE c.id = $1
            GROUP BY c.id, c.name, c.description, c.color, c.created_at
            "#,
        )
        .bind(category_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Category".to_string()))
    }

    async fn check_category_conflicts(
        &self,
        input: &CategoryInput,
        exclude_id: Option<Uuid>,
    ) -> AppResult<()> {
        let name_taken = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM categories WHERE name = $1 AND ($2::uuid IS NULL OR id <> $2)",
        )
        .bind(&input.name)
        .bind(exclude_id)
        .fetch_one(&self.db)
        .await?;

        if name_taken > 0 {
            return Err(AppError::DuplicateEntry("category name".to_string()));
        }

        let color_taken = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM categories WHERE color = $1 AND ($2::uuid IS NULL OR id <> $2)",
        )
        .bind(&input.color)
        .bind(exclude_id)
        .fetch_one(&self.db)
        .await?;

        if color_taken > 0 {
            return Err(AppError::Conflict {
                resource: "color".to_string(),
                message: "Color is already used by another category".to_string(),
                message_es: "El color ya está en uso por otra categoría".to_string(),
            });
        }

        Ok(())
    }

    fn validate_product(input: &ProductInput) -> AppResult<()> {
        if input.code.trim().is_empty() {
            return Err(AppError::Validation {
                field: "code".to_string(),
                message: "Product code is required".to_string(),
                message_es: "El código del producto es obligatorio".to_string(),
            });
        }
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Product name is required".to_string(),
                message_es: "El nombre del producto es obligatorio".to_string(),
            });
        }
        if input.stock < 0 || input.min_stock < 0 {
            return Err(AppError::Validation {
                field: "stock".to_string(),
                message: "Stock values cannot be negative".to_string(),
                message_es: "Los valores de stock no pueden ser negativos".to_string(),
            });
        }
        for (field, value) in [("price", input.price), ("cost", input.cost)] {
            if let Err(message) = validate_price(value) {
                return Err(AppError::Validation {
                    field: field.to_string(),
                    message: message.to_string(),
                    message_es: "El valor no puede ser negativo".to_string(),
                });
            }
        }
        Ok(())
    }

    fn validate_category(input: &CategoryInput) -> AppResult<()> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Category name is required".to_string(),
                message_es: "El nombre de la categoría es obligatorio".to_string(),
            });
        }
        if let Err(message) = validate_hex_color(&input.color) {
            return Err(AppError::Validation {
                field: "color".to_string(),
                message: message.to_string(),
                message_es: "El color debe ser un valor hexadecimal de 6 dígitos".to_string(),
            });
        }
        Ok(())
    }
}
