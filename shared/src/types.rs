//! Common types used across the system

use serde::{Deserialize, Serialize};

/// Pagination parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
        }
    }
}

impl Pagination {
    /// Offset into the result set for the current page
    pub fn offset(&self) -> u32 {
        self.page.saturating_sub(1) * self.per_page
    }
}

/// Paginated response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(pagination: &Pagination, total_items: u64) -> Self {
        let per_page = pagination.per_page.max(1);
        let total_pages = ((total_items + per_page as u64 - 1) / per_page as u64) as u32;
        Self {
            page: pagination.page,
            per_page,
            total_items,
            total_pages,
        }
    }
}
