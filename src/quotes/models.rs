use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::pricing::{BudgetTerms, BudgetTotals, PricedLineItem};

/// Quote status enum representing the lifecycle of a quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    Draft,
    Sent,
    Accepted,
    Rejected,
    Expired,
}

impl QuoteStatus {
    /// Convert status to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Draft => "draft",
            QuoteStatus::Sent => "sent",
            QuoteStatus::Accepted => "accepted",
            QuoteStatus::Rejected => "rejected",
            QuoteStatus::Expired => "expired",
        }
    }
}

impl Default for QuoteStatus {
    fn default() -> Self {
        QuoteStatus::Draft
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Domain model representing a quote row in the database
///
/// `items` and `terms` hold the serialized pricing payload; the totals
/// columns are a snapshot of the engine output at save time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Quote {
    pub id: Uuid,
    pub client_id: i32,
    pub status: QuoteStatus,
    pub items: serde_json::Value,
    pub terms: serde_json::Value,
    pub labor_subtotal: Decimal,
    pub material_subtotal: Decimal,
    pub service_tax_value: Decimal,
    pub material_tax_value: Decimal,
    pub interest_value: Decimal,
    pub travel_cost: Decimal,
    pub discount_total: Decimal,
    pub grand_total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quote {
    /// Parse the persisted line items
    ///
    /// Malformed payloads degrade to an empty list instead of failing the
    /// whole read; a broken snapshot must not take the quote down with it.
    pub fn line_items(&self) -> Vec<PricedLineItem> {
        serde_json::from_value(self.items.clone()).unwrap_or_default()
    }

    /// Parse the persisted pricing terms, falling back to defaults
    pub fn budget_terms(&self) -> BudgetTerms {
        serde_json::from_value(self.terms.clone()).unwrap_or_default()
    }
}

/// Request DTO for one selected catalog item
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuoteItemRequest {
    pub catalog_item_id: i32,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

/// User-editable pricing terms of a quote
///
/// Rates and percentages configured in the back office (rate per km, boleto
/// fee, taxes, interest) are not part of the request; the service merges them
/// in from the pricing defaults store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct QuoteTermsRequest {
    #[serde(default)]
    #[validate(custom = "crate::validation::validate_non_negative_money")]
    pub distance_km: Decimal,
    #[serde(default)]
    #[validate(range(min = 0, message = "Term days must not be negative"))]
    pub term_days: i32,
    #[serde(default)]
    #[validate(custom = "crate::validation::validate_percent_range")]
    pub labor_discount_percent: Decimal,
    #[serde(default)]
    #[validate(range(min = 0, message = "Installments must not be negative"))]
    pub labor_installments: i32,
    #[serde(default)]
    #[validate(range(min = 0, message = "Installments must not be negative"))]
    pub material_installments: i32,
    #[serde(default)]
    pub material_cash: bool,
    #[serde(default)]
    #[validate(custom = "crate::validation::validate_non_negative_money")]
    pub manual_discount: Decimal,
}

impl QuoteTermsRequest {
    /// Merge the request terms with the configured defaults into engine terms
    pub fn into_budget_terms(self, defaults: &crate::pricing::PricingDefaults) -> BudgetTerms {
        BudgetTerms {
            distance_km: self.distance_km,
            term_days: self.term_days,
            rate_per_km: defaults.rate_per_km,
            boleto_fee: defaults.boleto_fee,
            monthly_interest_percent: defaults.monthly_interest_percent,
            service_tax_percent: defaults.service_tax_percent,
            material_tax_percent: defaults.material_tax_percent,
            labor_discount_percent: self.labor_discount_percent,
            labor_installments: self.labor_installments,
            material_installments: self.material_installments,
            material_cash: self.material_cash,
            manual_discount: self.manual_discount,
        }
    }
}

/// Request DTO for creating a new quote
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuoteRequest {
    pub client_id: i32,
    #[validate(length(min = 1, message = "Quote must contain at least one item"))]
    pub items: Vec<QuoteItemRequest>,
    #[serde(default)]
    pub terms: QuoteTermsRequest,
}

/// Request DTO for previewing quote totals without persisting
#[derive(Debug, Deserialize, Validate)]
pub struct QuotePreviewRequest {
    #[validate(length(min = 1, message = "Quote must contain at least one item"))]
    pub items: Vec<QuoteItemRequest>,
    #[serde(default)]
    pub terms: QuoteTermsRequest,
}

/// Request DTO for updating quote status
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateQuoteStatusRequest {
    pub status: QuoteStatus,
}

/// Response DTO for a quote with its priced items and totals
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub id: Uuid,
    pub client_id: i32,
    pub status: QuoteStatus,
    pub items: Vec<PricedLineItem>,
    pub totals: BudgetTotals,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response DTO for a preview: totals only, nothing persisted
#[derive(Debug, Serialize)]
pub struct QuotePreviewResponse {
    pub items: Vec<PricedLineItem>,
    pub totals: BudgetTotals,
}
