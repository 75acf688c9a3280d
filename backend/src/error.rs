//! Error handling for the Ferreteria Management System
//!
//! Provides consistent error responses in Spanish and English

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::billing::DraftError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
        message_es: String,
    },

    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_es: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Conflict: {message}")]
    Conflict {
        resource: String,
        message: String,
        message_es: String,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Business logic errors
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl From<DraftError> for AppError {
    fn from(err: DraftError) -> Self {
        match err {
            DraftError::InsufficientStock { product_name, .. } => {
                AppError::InsufficientStock(product_name)
            }
            other => AppError::ValidationError(other.to_string()),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_es: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "INVALID_CREDENTIALS".to_string(),
                    message_en: "Invalid username or password".to_string(),
                    message_es: "Usuario o contraseña incorrectos".to_string(),
                    field: None,
                },
            ),
            AppError::InsufficientPermissions => (
                StatusCode::FORBIDDEN,
                ErrorDetail {
                    code: "INSUFFICIENT_PERMISSIONS".to_string(),
                    message_en: "You do not have permission to perform this action".to_string(),
                    message_es: "No tienes permiso para realizar esta acción".to_string(),
                    field: None,
                },
            ),
            AppError::Unauthorized { message, message_es } => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "UNAUTHORIZED".to_string(),
                    message_en: message.clone(),
                    message_es: message_es.clone(),
                    field: None,
                },
            ),
            AppError::Validation { field, message, message_es } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_es: message_es.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_es: format!("Datos inválidos: {}", msg),
                    field: None,
                },
            ),
            AppError::DuplicateEntry(field) => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "DUPLICATE_ENTRY".to_string(),
                    message_en: format!("A record with this {} already exists", field),
                    message_es: format!("Ya existe un registro con este {}", field),
                    field: Some(field.clone()),
                },
            ),
            AppError::Conflict { resource, message, message_es } => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "CONFLICT".to_string(),
                    message_en: message.clone(),
                    message_es: message_es.clone(),
                    field: Some(resource.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", resource),
                    message_es: format!("No se encontró {}", resource),
                    field: None,
                },
            ),
            AppError::InsufficientStock(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "INSUFFICIENT_STOCK".to_string(),
                    message_en: format!("Insufficient stock: {}", msg),
                    message_es: format!("Stock insuficiente: {}", msg),
                    field: None,
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message_en: "A database error occurred".to_string(),
                    message_es: "Ocurrió un error de base de datos".to_string(),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_es: "Ocurrió un error interno del servidor".to_string(),
                    field: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: "An internal server error occurred".to_string(),
                    message_es: "Ocurrió un error interno del servidor".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
