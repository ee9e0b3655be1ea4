use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Domain model representing a client in the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Client {
    pub id: i32,
    pub name: String,
    /// Registry document, digits only (CPF or CNPJ)
    pub document: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for creating a new client
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClient {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,
    #[validate(custom = "crate::validation::validate_document")]
    pub document: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(custom = "crate::validation::validate_phone")]
    pub phone: String,
    #[validate(length(min = 1, max = 300, message = "Address must be between 1 and 300 characters"))]
    pub address: String,
    #[validate(length(min = 1, max = 100, message = "City must be between 1 and 100 characters"))]
    pub city: String,
}

/// Request DTO for updating an existing client
///
/// All fields optional to support partial updates.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateClient {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: Option<String>,
    #[validate(custom = "crate::validation::validate_document")]
    pub document: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(custom = "crate::validation::validate_phone")]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 300, message = "Address must be between 1 and 300 characters"))]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 100, message = "City must be between 1 and 100 characters"))]
    pub city: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> CreateClient {
        CreateClient {
            name: "Condomínio Edifício Aurora".to_string(),
            document: "12345678000199".to_string(),
            email: "sindico@aurora.com.br".to_string(),
            phone: "+5511987654321".to_string(),
            address: "Rua das Acácias, 120".to_string(),
            city: "São Paulo".to_string(),
        }
    }

    #[test]
    fn test_create_client_valid() {
        assert!(valid_create().validate().is_ok());
    }

    #[test]
    fn test_create_client_rejects_bad_document() {
        let mut client = valid_create();
        client.document = "12.345.678/0001-99".to_string();
        assert!(client.validate().is_err());
    }

    #[test]
    fn test_create_client_rejects_bad_email() {
        let mut client = valid_create();
        client.email = "not-an-email".to_string();
        assert!(client.validate().is_err());
    }

    #[test]
    fn test_update_client_partial() {
        let json = r#"{"phone": "1134567890"}"#;
        let update: UpdateClient = serde_json::from_str(json).unwrap();

        assert_eq!(update.phone, Some("1134567890".to_string()));
        assert_eq!(update.name, None);
        assert!(update.validate().is_ok());
    }
}
