// Pricing Engine Module
//
// Computation core for quotes and contract proposals. Four stages run on
// every pricing pass, with no cached intermediate state:
// - Discount engine: quantity tiers and category-completion bonuses per line
// - Aggregator: gross/net equipment value, discount total, labor value
// - Surcharge/tax engine: travel, installment interest, boleto fees and tax
//   pass-through, in a proposal profile and a budget profile
// - Proration engine: invoice-adjusted unit prices on demand
//
// The stages are pure functions: the same selection and terms always produce
// the same totals. Database access (catalog rows, configured defaults) happens
// in the services before the engine runs, never inside it.

pub mod aggregate;
pub mod config_store;
pub mod discount;
pub mod error;
pub mod handlers;
pub mod line_item;
pub mod proration;
pub mod surcharge;

// Re-export commonly used types for convenience
pub use aggregate::{Aggregator, EquipmentTotals};
pub use config_store::{PricingDefaults, PricingDefaultsStore, UpdatePricingDefaults, VisitDiscount};
pub use discount::DiscountEngine;
pub use error::{PricingError, PricingResult};
pub use line_item::{AdjustedLineItem, PricedLineItem, SelectedLineItem};
pub use proration::ProrationEngine;
pub use surcharge::{BudgetTerms, BudgetTotals, ProposalTerms, ProposalTotals, SurchargeEngine};

use crate::models::CatalogItem;
use rust_decimal::Decimal;

/// Result of pricing a quote (budget flow)
#[derive(Debug, Clone)]
pub struct QuotePricing {
    pub items: Vec<PricedLineItem>,
    pub totals: BudgetTotals,
}

/// Result of pricing a contract proposal
#[derive(Debug, Clone)]
pub struct ProposalPricing {
    pub items: Vec<PricedLineItem>,
    pub totals: ProposalTotals,
}

/// Pricing Engine
///
/// Facade over the four stages. Callers hand in the full catalog (category
/// completeness is a property of the whole catalog, not of the selection),
/// the selected line items and the flow terms, and get every derived value
/// back recomputed.
pub struct PricingEngine;

impl PricingEngine {
    /// Price a service quote (budget flow)
    pub fn price_budget(
        catalog: &[CatalogItem],
        selection: &[SelectedLineItem],
        terms: &BudgetTerms,
    ) -> QuotePricing {
        let items = DiscountEngine::price_items(catalog, selection);
        let equipment = Aggregator::totals(&items);
        let totals = SurchargeEngine::budget_totals(&equipment, terms);

        QuotePricing { items, totals }
    }

    /// Price a maintenance-contract proposal
    pub fn price_proposal(
        catalog: &[CatalogItem],
        selection: &[SelectedLineItem],
        terms: &ProposalTerms,
    ) -> ProposalPricing {
        let items = DiscountEngine::price_items(catalog, selection);
        let equipment = Aggregator::totals(&items);
        let per_visit = Aggregator::scale_for_visits(&equipment, terms.visit_count);
        let totals = SurchargeEngine::proposal_totals(&per_visit, terms);

        ProposalPricing { items, totals }
    }

    /// Invoice-adjusted line items for a priced quote
    pub fn invoice_items(
        items: &[PricedLineItem],
        material_subtotal: Decimal,
    ) -> Vec<AdjustedLineItem> {
        ProrationEngine::invoice_items(items, material_subtotal)
    }
}
