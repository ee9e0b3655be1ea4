// Error types for the pricing subsystem
//
// The computation core itself never fails: inputs are coerced defensively and
// degenerate divisions are guarded. These errors belong to the collaborator
// side of the module: loading and validating pricing configuration.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Error type for pricing configuration operations
#[derive(Debug, Error)]
pub enum PricingError {
    /// Database operation errors, converted from sqlx::Error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// Required configuration row is missing
    #[error("Configuration not found: {0}")]
    ConfigurationNotFound(String),

    /// Loaded configuration fails validation checks
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type alias for pricing configuration operations
pub type PricingResult<T> = Result<T, PricingError>;

impl IntoResponse for PricingError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            PricingError::DatabaseError(e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error")
            }
            PricingError::ConfigurationNotFound(_) => {
                (StatusCode::NOT_FOUND, "Configuration not found")
            }
            PricingError::InvalidConfiguration(_) => {
                (StatusCode::BAD_REQUEST, "Invalid configuration")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "details": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = PricingError::ConfigurationNotFound("pricing_defaults".to_string());
        assert_eq!(error.to_string(), "Configuration not found: pricing_defaults");

        let error = PricingError::InvalidConfiguration("negative boleto fee".to_string());
        assert_eq!(error.to_string(), "Invalid configuration: negative boleto fee");
    }

    #[test]
    fn test_error_from_sqlx() {
        let sqlx_error = sqlx::Error::RowNotFound;
        let pricing_error: PricingError = sqlx_error.into();
        assert!(matches!(pricing_error, PricingError::DatabaseError(_)));
    }
}
