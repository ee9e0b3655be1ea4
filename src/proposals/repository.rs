use sqlx::PgPool;
use uuid::Uuid;

use crate::pricing::ProposalTotals;
use crate::proposals::error::ProposalError;
use crate::proposals::Proposal;

const PROPOSAL_COLUMNS: &str = "id, client_id, items, terms, gross_equipment_value, \
     net_equipment_value, discount_total, travel_cost, visit_discount_value, \
     grand_total, created_at, updated_at";

/// Repository for proposal operations
#[derive(Clone)]
pub struct ProposalsRepository {
    pool: PgPool,
}

impl ProposalsRepository {
    /// Create a new ProposalsRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new proposal with its serialized items and totals snapshot
    pub async fn create(
        &self,
        client_id: i32,
        items: serde_json::Value,
        terms: serde_json::Value,
        totals: &ProposalTotals,
    ) -> Result<Proposal, ProposalError> {
        let proposal = sqlx::query_as::<_, Proposal>(&format!(
            r#"
            INSERT INTO proposals (client_id, items, terms, gross_equipment_value,
                net_equipment_value, discount_total, travel_cost,
                visit_discount_value, grand_total)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            PROPOSAL_COLUMNS
        ))
        .bind(client_id)
        .bind(items)
        .bind(terms)
        .bind(totals.gross_equipment_value)
        .bind(totals.net_equipment_value)
        .bind(totals.discount_total)
        .bind(totals.travel_cost)
        .bind(totals.visit_discount_value)
        .bind(totals.grand_total)
        .fetch_one(&self.pool)
        .await?;

        Ok(proposal)
    }

    /// Find a proposal by ID
    pub async fn find_by_id(&self, proposal_id: Uuid) -> Result<Option<Proposal>, ProposalError> {
        let proposal = sqlx::query_as::<_, Proposal>(&format!(
            "SELECT {} FROM proposals WHERE id = $1",
            PROPOSAL_COLUMNS
        ))
        .bind(proposal_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(proposal)
    }

    /// Find proposals with an optional client filter
    pub async fn find_all(&self, client_id: Option<i32>) -> Result<Vec<Proposal>, ProposalError> {
        let proposals = match client_id {
            Some(client_id) => {
                sqlx::query_as::<_, Proposal>(&format!(
                    "SELECT {} FROM proposals WHERE client_id = $1 ORDER BY created_at DESC",
                    PROPOSAL_COLUMNS
                ))
                .bind(client_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Proposal>(&format!(
                    "SELECT {} FROM proposals ORDER BY created_at DESC",
                    PROPOSAL_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(proposals)
    }
}

#[cfg(test)]
mod tests {
    // Repository methods are exercised through service-level integration
    // tests against a live database; nothing here is testable without one.
}
