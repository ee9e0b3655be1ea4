use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::pricing::{PricedLineItem, ProposalTerms, ProposalTotals};

/// Domain model representing a contract proposal row in the database
///
/// Same persistence shape as a quote: serialized items and terms plus a
/// totals snapshot taken at save time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Proposal {
    pub id: Uuid,
    pub client_id: i32,
    pub items: serde_json::Value,
    pub terms: serde_json::Value,
    pub gross_equipment_value: Decimal,
    pub net_equipment_value: Decimal,
    pub discount_total: Decimal,
    pub travel_cost: Decimal,
    pub visit_discount_value: Decimal,
    pub grand_total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Proposal {
    /// Parse the persisted line items; malformed payloads degrade to empty
    pub fn line_items(&self) -> Vec<PricedLineItem> {
        serde_json::from_value(self.items.clone()).unwrap_or_default()
    }

    /// Parse the persisted pricing terms, falling back to defaults
    pub fn proposal_terms(&self) -> ProposalTerms {
        serde_json::from_value(self.terms.clone()).unwrap_or_default()
    }
}

/// Request DTO for one selected catalog item
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProposalItemRequest {
    pub catalog_item_id: i32,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

/// User-editable terms of a proposal
///
/// The per-km rate and the visit-count discount table come from the pricing
/// defaults store, not from the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProposalTermsRequest {
    #[serde(default)]
    #[validate(custom = "crate::validation::validate_non_negative_money")]
    pub distance_km: Decimal,
    #[serde(default)]
    #[validate(range(min = 0, message = "Visit count must not be negative"))]
    pub visit_count: i32,
}

/// Request DTO for creating a new proposal
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProposalRequest {
    pub client_id: i32,
    #[validate(length(min = 1, message = "Proposal must contain at least one item"))]
    pub items: Vec<ProposalItemRequest>,
    #[serde(default)]
    pub terms: ProposalTermsRequest,
}

/// Request DTO for previewing proposal totals without persisting
#[derive(Debug, Deserialize, Validate)]
pub struct ProposalPreviewRequest {
    #[validate(length(min = 1, message = "Proposal must contain at least one item"))]
    pub items: Vec<ProposalItemRequest>,
    #[serde(default)]
    pub terms: ProposalTermsRequest,
}

/// Response DTO for a proposal with its priced items and totals
#[derive(Debug, Serialize)]
pub struct ProposalResponse {
    pub id: Uuid,
    pub client_id: i32,
    pub items: Vec<PricedLineItem>,
    pub totals: ProposalTotals,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response DTO for a preview: totals only, nothing persisted
#[derive(Debug, Serialize)]
pub struct ProposalPreviewResponse {
    pub items: Vec<PricedLineItem>,
    pub totals: ProposalTotals,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_terms_request_defaults() {
        let terms: ProposalTermsRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(terms.distance_km, Decimal::ZERO);
        assert_eq!(terms.visit_count, 0);
    }

    #[test]
    fn test_terms_request_validation() {
        let bad = ProposalTermsRequest {
            distance_km: dec!(-5),
            visit_count: 1,
        };
        assert!(bad.validate().is_err());

        let negative_visits = ProposalTermsRequest {
            distance_km: dec!(10),
            visit_count: -1,
        };
        assert!(negative_visits.validate().is_err());
    }

    #[test]
    fn test_malformed_items_degrade_to_empty() {
        let proposal = Proposal {
            id: Uuid::new_v4(),
            client_id: 1,
            items: json!(12345),
            terms: json!(null),
            gross_equipment_value: Decimal::ZERO,
            net_equipment_value: Decimal::ZERO,
            discount_total: Decimal::ZERO,
            travel_cost: Decimal::ZERO,
            visit_discount_value: Decimal::ZERO,
            grand_total: Decimal::ZERO,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(proposal.line_items().is_empty());
        assert_eq!(proposal.proposal_terms().visit_count, 0);
    }
}
