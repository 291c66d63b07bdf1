//! Extractor de cuerpos JSON
//!
//! Un cuerpo mal formado o con tipos incorrectos responde con el mismo
//! formato `{error, message, code}` que el resto de errores de la API.

use axum::extract::{rejection::JsonRejection, FromRequest};

use super::errors::AppError;

/// Igual que `axum::Json` pero con el rechazo convertido en `AppError`
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
