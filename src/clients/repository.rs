use sqlx::PgPool;

use crate::clients::error::ClientError;
use crate::clients::{Client, CreateClient, UpdateClient};

const CLIENT_COLUMNS: &str = "id, name, document, email, phone, address, city, \
     created_at, updated_at";

/// Repository for client operations
#[derive(Clone)]
pub struct ClientsRepository {
    pool: PgPool,
}

impl ClientsRepository {
    /// Create a new ClientsRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Check if a client with the given document already exists
    pub async fn document_exists(
        &self,
        document: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, ClientError> {
        let exists: Option<bool> = match exclude_id {
            Some(id) => {
                sqlx::query_scalar(
                    "SELECT EXISTS(SELECT 1 FROM clients WHERE document = $1 AND id != $2)",
                )
                .bind(document)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM clients WHERE document = $1)")
                    .bind(document)
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(exists.unwrap_or(false))
    }

    /// Insert a new client
    pub async fn create(&self, client: &CreateClient) -> Result<Client, ClientError> {
        let created = sqlx::query_as::<_, Client>(&format!(
            r#"
            INSERT INTO clients (name, document, email, phone, address, city)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            CLIENT_COLUMNS
        ))
        .bind(&client.name)
        .bind(&client.document)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.address)
        .bind(&client.city)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Find a client by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Client>, ClientError> {
        let client = sqlx::query_as::<_, Client>(&format!(
            "SELECT {} FROM clients WHERE id = $1",
            CLIENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    /// List all clients ordered by name
    pub async fn find_all(&self) -> Result<Vec<Client>, ClientError> {
        let clients = sqlx::query_as::<_, Client>(&format!(
            "SELECT {} FROM clients ORDER BY name",
            CLIENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    /// Update a client, keeping existing values for omitted fields
    pub async fn update(&self, id: i32, update: &UpdateClient) -> Result<Client, ClientError> {
        let existing = self.find_by_id(id).await?.ok_or(ClientError::NotFound)?;

        let updated = sqlx::query_as::<_, Client>(&format!(
            r#"
            UPDATE clients
            SET name = $1, document = $2, email = $3, phone = $4,
                address = $5, city = $6, updated_at = NOW()
            WHERE id = $7
            RETURNING {}
            "#,
            CLIENT_COLUMNS
        ))
        .bind(update.name.clone().unwrap_or(existing.name))
        .bind(update.document.clone().unwrap_or(existing.document))
        .bind(update.email.clone().unwrap_or(existing.email))
        .bind(update.phone.clone().unwrap_or(existing.phone))
        .bind(update.address.clone().unwrap_or(existing.address))
        .bind(update.city.clone().unwrap_or(existing.city))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Delete a client; returns false when no row was removed
    pub async fn delete(&self, id: i32) -> Result<bool, ClientError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
