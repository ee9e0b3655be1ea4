use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error types for quote operations
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Quote not found")]
    NotFound,

    #[error("Client not found: {0}")]
    ClientNotFound(i32),

    #[error("Catalog item not found: {0}")]
    CatalogItemNotFound(i32),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Pricing configuration error: {0}")]
    PricingError(#[from] crate::pricing::PricingError),
}

impl From<sqlx::Error> for QuoteError {
    fn from(err: sqlx::Error) -> Self {
        QuoteError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for QuoteError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            QuoteError::DatabaseError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            QuoteError::NotFound => (StatusCode::NOT_FOUND, "Quote not found".to_string()),
            QuoteError::ClientNotFound(id) => (
                StatusCode::BAD_REQUEST,
                format!("Client with id {} not found", id),
            ),
            QuoteError::CatalogItemNotFound(id) => (
                StatusCode::BAD_REQUEST,
                format!("Catalog item with id {} not found", id),
            ),
            QuoteError::InvalidQuantity(msg) => (StatusCode::BAD_REQUEST, msg),
            QuoteError::InvalidTransition(msg) => (StatusCode::BAD_REQUEST, msg),
            QuoteError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            QuoteError::PricingError(err) => return err.into_response(),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
