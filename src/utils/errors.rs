//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.
//!
//! El campo `error` del cuerpo siempre lleva el mensaje legible, de modo que
//! un cliente puede mostrar `error` y `details` tal cual.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] validator::ValidationErrors),

    /// Fallo del validador de formularios: el mensaje es el primer error encontrado
    #[error("{0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Conflict: {0}")]
    ConflictWithDetails(String, serde_json::Value),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Hash error: {0}")]
    Hash(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    code: &'static str,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) | AppError::Hash(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::InvalidInput(_) | AppError::Validation(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized(_) | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) | AppError::ConflictWithDetails(..) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            AppError::Database(e) => {
                error!("Database error: {}", e);
                ErrorResponse {
                    error: "An error occurred while accessing the database".to_string(),
                    message: "Database Error".to_string(),
                    details: None,
                    code: "DB_ERROR",
                }
            }

            AppError::InvalidInput(e) => {
                warn!("Invalid input: {}", e);
                ErrorResponse {
                    error: "The provided data is invalid".to_string(),
                    message: "Validation Error".to_string(),
                    details: Some(json!(e)),
                    code: "VALIDATION_ERROR",
                }
            }

            AppError::Validation(msg) => ErrorResponse {
                error: msg,
                message: "Validation Error".to_string(),
                details: None,
                code: "VALIDATION_ERROR",
            },

            AppError::Unauthorized(msg) => {
                warn!("Unauthorized access: {}", msg);
                ErrorResponse {
                    error: msg,
                    message: "Unauthorized".to_string(),
                    details: None,
                    code: "UNAUTHORIZED",
                }
            }

            AppError::Forbidden(msg) => {
                warn!("Forbidden access: {}", msg);
                ErrorResponse {
                    error: msg,
                    message: "Forbidden".to_string(),
                    details: None,
                    code: "FORBIDDEN",
                }
            }

            AppError::NotFound(msg) => ErrorResponse {
                error: msg,
                message: "Not Found".to_string(),
                details: None,
                code: "NOT_FOUND",
            },

            AppError::Conflict(msg) => ErrorResponse {
                error: msg,
                message: "Conflict".to_string(),
                details: None,
                code: "CONFLICT",
            },

            AppError::ConflictWithDetails(msg, details) => ErrorResponse {
                error: msg,
                message: "Conflict".to_string(),
                details: Some(details),
                code: "CONFLICT",
            },

            AppError::BadRequest(msg) => ErrorResponse {
                error: msg,
                message: "Bad Request".to_string(),
                details: None,
                code: "BAD_REQUEST",
            },

            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                ErrorResponse {
                    error: "An unexpected error occurred".to_string(),
                    message: "Internal Server Error".to_string(),
                    details: None,
                    code: "INTERNAL_ERROR",
                }
            }

            AppError::Jwt(msg) => {
                warn!("JWT error: {}", msg);
                ErrorResponse {
                    error: msg,
                    message: "Unauthorized".to_string(),
                    details: None,
                    code: "JWT_ERROR",
                }
            }

            AppError::Hash(msg) => {
                error!("Hash error: {}", msg);
                ErrorResponse {
                    error: "An error occurred while processing credentials".to_string(),
                    message: "Internal Server Error".to_string(),
                    details: None,
                    code: "HASH_ERROR",
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de conflicto
pub fn conflict_error(resource: &str, field: &str, value: &str) -> AppError {
    AppError::Conflict(format!("{} with {} '{}' already exists", resource, field, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(not_found_error("Vehicle", "V1").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            conflict_error("Vehicle", "registration number", "AB-1234").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Forbidden("role".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AppError::Jwt("expired".into()).status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_helper_messages() {
        match not_found_error("Driver", "D9") {
            AppError::NotFound(msg) => assert_eq!(msg, "Driver with id 'D9' not found"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_validation_body_carries_message_in_error_field() {
        let response = AppError::Validation("Location is required.".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Location is required.");
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body.get("details").is_none());
    }
}
