use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error types for client operations
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Client not found")]
    NotFound,

    #[error("Duplicate document: {0}")]
    DuplicateDocument(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<sqlx::Error> for ClientError {
    fn from(err: sqlx::Error) -> Self {
        ClientError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for ClientError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ClientError::DatabaseError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ClientError::NotFound => (StatusCode::NOT_FOUND, "Client not found".to_string()),
            ClientError::DuplicateDocument(document) => (
                StatusCode::CONFLICT,
                format!("Client with document '{}' already exists", document),
            ),
            ClientError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
