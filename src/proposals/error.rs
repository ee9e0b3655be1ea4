use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error types for proposal operations
#[derive(Debug, thiserror::Error)]
pub enum ProposalError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Proposal not found")]
    NotFound,

    #[error("Client not found: {0}")]
    ClientNotFound(i32),

    #[error("Catalog item not found: {0}")]
    CatalogItemNotFound(i32),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Pricing configuration error: {0}")]
    PricingError(#[from] crate::pricing::PricingError),
}

impl From<sqlx::Error> for ProposalError {
    fn from(err: sqlx::Error) -> Self {
        ProposalError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for ProposalError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ProposalError::DatabaseError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ProposalError::NotFound => (StatusCode::NOT_FOUND, "Proposal not found".to_string()),
            ProposalError::ClientNotFound(id) => (
                StatusCode::BAD_REQUEST,
                format!("Client with id {} not found", id),
            ),
            ProposalError::CatalogItemNotFound(id) => (
                StatusCode::BAD_REQUEST,
                format!("Catalog item with id {} not found", id),
            ),
            ProposalError::InvalidQuantity(msg) => (StatusCode::BAD_REQUEST, msg),
            ProposalError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            ProposalError::PricingError(err) => return err.into_response(),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
