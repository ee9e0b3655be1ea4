use sqlx::PgPool;
use uuid::Uuid;

use crate::pricing::BudgetTotals;
use crate::quotes::error::QuoteError;
use crate::quotes::{Quote, QuoteStatus};

const QUOTE_COLUMNS: &str = "id, client_id, status, items, terms, labor_subtotal, \
     material_subtotal, service_tax_value, material_tax_value, interest_value, \
     travel_cost, discount_total, grand_total, created_at, updated_at";

/// Repository for quote operations
#[derive(Clone)]
pub struct QuotesRepository {
    pool: PgPool,
}

impl QuotesRepository {
    /// Create a new QuotesRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new quote with its serialized items and totals snapshot
    pub async fn create(
        &self,
        client_id: i32,
        status: QuoteStatus,
        items: serde_json::Value,
        terms: serde_json::Value,
        totals: &BudgetTotals,
    ) -> Result<Quote, QuoteError> {
        let quote = sqlx::query_as::<_, Quote>(&format!(
            r#"
            INSERT INTO quotes (client_id, status, items, terms, labor_subtotal,
                material_subtotal, service_tax_value, material_tax_value,
                interest_value, travel_cost, discount_total, grand_total)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {}
            "#,
            QUOTE_COLUMNS
        ))
        .bind(client_id)
        .bind(status)
        .bind(items)
        .bind(terms)
        .bind(totals.labor_subtotal)
        .bind(totals.material_subtotal)
        .bind(totals.service_tax_value)
        .bind(totals.material_tax_value)
        .bind(totals.interest_value)
        .bind(totals.travel_cost)
        .bind(totals.discount_total)
        .bind(totals.grand_total)
        .fetch_one(&self.pool)
        .await?;

        Ok(quote)
    }

    /// Find a quote by ID
    pub async fn find_by_id(&self, quote_id: Uuid) -> Result<Option<Quote>, QuoteError> {
        let quote = sqlx::query_as::<_, Quote>(&format!(
            "SELECT {} FROM quotes WHERE id = $1",
            QUOTE_COLUMNS
        ))
        .bind(quote_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quote)
    }

    /// Find quotes with optional client and status filters
    pub async fn find_all(
        &self,
        client_id: Option<i32>,
        status: Option<QuoteStatus>,
    ) -> Result<Vec<Quote>, QuoteError> {
        let quotes = match (client_id, status) {
            (Some(client_id), Some(status)) => {
                sqlx::query_as::<_, Quote>(&format!(
                    "SELECT {} FROM quotes WHERE client_id = $1 AND status = $2 \
                     ORDER BY created_at DESC",
                    QUOTE_COLUMNS
                ))
                .bind(client_id)
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            (Some(client_id), None) => {
                sqlx::query_as::<_, Quote>(&format!(
                    "SELECT {} FROM quotes WHERE client_id = $1 ORDER BY created_at DESC",
                    QUOTE_COLUMNS
                ))
                .bind(client_id)
                .fetch_all(&self.pool)
                .await?
            }
            (None, Some(status)) => {
                sqlx::query_as::<_, Quote>(&format!(
                    "SELECT {} FROM quotes WHERE status = $1 ORDER BY created_at DESC",
                    QUOTE_COLUMNS
                ))
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            (None, None) => {
                sqlx::query_as::<_, Quote>(&format!(
                    "SELECT {} FROM quotes ORDER BY created_at DESC",
                    QUOTE_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(quotes)
    }

    /// Update quote status
    pub async fn update_status(
        &self,
        quote_id: Uuid,
        new_status: QuoteStatus,
    ) -> Result<Quote, QuoteError> {
        let quote = sqlx::query_as::<_, Quote>(&format!(
            r#"
            UPDATE quotes
            SET status = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {}
            "#,
            QUOTE_COLUMNS
        ))
        .bind(new_status)
        .bind(quote_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(QuoteError::NotFound)?;

        Ok(quote)
    }
}

#[cfg(test)]
mod tests {
    // Repository methods are exercised through service-level integration
    // tests against a live database; nothing here is testable without one.
}
