// Surcharge/Tax Engine
//
// Two profiles over the same aggregates: the proposal profile (per-visit
// contract pricing with a visit-count discount) and the budget profile
// (labor/material split with installment interest, boleto fees and tax
// pass-through). The budget chain is order-sensitive: each step feeds the
// tax bases of the steps after it.

use crate::pricing::aggregate::EquipmentTotals;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Terms for pricing a maintenance-contract proposal
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProposalTerms {
    #[serde(default)]
    pub distance_km: Decimal,
    #[serde(default)]
    pub visit_count: i32,
    #[serde(default)]
    pub rate_per_km: Decimal,
    #[serde(default)]
    pub visit_discount_percent: Decimal,
}

/// Terms for pricing a service quote (budget flow)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetTerms {
    #[serde(default)]
    pub distance_km: Decimal,
    #[serde(default)]
    pub term_days: i32,
    #[serde(default)]
    pub rate_per_km: Decimal,
    /// Fixed fee charged per boleto installment
    #[serde(default)]
    pub boleto_fee: Decimal,
    #[serde(default)]
    pub monthly_interest_percent: Decimal,
    #[serde(default)]
    pub service_tax_percent: Decimal,
    #[serde(default)]
    pub material_tax_percent: Decimal,
    #[serde(default)]
    pub labor_discount_percent: Decimal,
    /// Zero means the labor side is not being charged
    #[serde(default)]
    pub labor_installments: i32,
    /// Zero means the material side is not being charged, unless paid cash
    #[serde(default)]
    pub material_installments: i32,
    #[serde(default)]
    pub material_cash: bool,
    #[serde(default)]
    pub manual_discount: Decimal,
}

/// Derived totals of the proposal flow
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProposalTotals {
    pub gross_equipment_value: Decimal,
    pub net_equipment_value: Decimal,
    pub discount_total: Decimal,
    pub travel_cost: Decimal,
    /// Negative value: a credit added into the total
    pub visit_discount_value: Decimal,
    pub grand_total: Decimal,
}

/// Derived totals of the budget flow
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetTotals {
    pub gross_equipment_value: Decimal,
    pub net_equipment_value: Decimal,
    pub discount_total: Decimal,
    pub labor_value: Decimal,
    pub labor_discount_value: Decimal,
    pub travel_cost: Decimal,
    pub boleto_fee_labor: Decimal,
    pub service_tax_value: Decimal,
    pub labor_subtotal: Decimal,
    /// Material base: the post-discount equipment value
    pub material_value: Decimal,
    pub interest_value: Decimal,
    pub boleto_fee_material: Decimal,
    pub material_tax_value: Decimal,
    pub material_subtotal: Decimal,
    pub manual_discount: Decimal,
    pub grand_total: Decimal,
}

/// Surcharge/Tax Engine
pub struct SurchargeEngine;

impl SurchargeEngine {
    /// Proposal profile
    ///
    /// Expects equipment totals already scaled by the visit count. Travel is
    /// a round trip per visit; the visit discount is produced as a negative
    /// value and added into the total.
    pub fn proposal_totals(equipment: &EquipmentTotals, terms: &ProposalTerms) -> ProposalTotals {
        let hundred = Decimal::from(100);
        let visits = Decimal::from(terms.visit_count.max(0));

        let travel_cost = terms.distance_km * Decimal::from(2) * terms.rate_per_km * visits;
        let visit_discount_value =
            -(equipment.gross_value * terms.visit_discount_percent / hundred);
        let grand_total = equipment.net_value + travel_cost + visit_discount_value;

        ProposalTotals {
            gross_equipment_value: equipment.gross_value,
            net_equipment_value: equipment.net_value,
            discount_total: equipment.discount_total,
            travel_cost,
            visit_discount_value,
            grand_total,
        }
    }

    /// Budget profile
    ///
    /// The sequence below is part of the contract: labor discount, travel,
    /// labor boleto fees and the service tax build on each other, then the
    /// material side adds interest, boleto fees and its own tax on top of the
    /// post-discount equipment value. Zero installments is a valid "no
    /// charge" configuration for either side, not an error; travel is billed
    /// once and follows whichever side is actually charged.
    pub fn budget_totals(equipment: &EquipmentTotals, terms: &BudgetTerms) -> BudgetTotals {
        let hundred = Decimal::from(100);
        let labor_value = equipment.labor_value;
        let material_value = equipment.net_value;

        let labor_charged = terms.labor_installments != 0;
        let material_charged = terms.material_cash || terms.material_installments != 0;

        // 1. labor discount
        let labor_discount_value = labor_value * terms.labor_discount_percent / hundred;

        // 2. travel: round trip per service day
        let travel_cost = terms.distance_km
            * Decimal::from(2)
            * terms.rate_per_km
            * Decimal::from(terms.term_days.max(0));

        // 3. labor boleto fees
        let boleto_fee_labor = Decimal::from(terms.labor_installments.max(0)) * terms.boleto_fee;

        // 4-5. service tax over the discounted labor plus travel and fees
        let service_tax_base = labor_value - labor_discount_value + travel_cost + boleto_fee_labor;
        let service_tax_value = service_tax_base * terms.service_tax_percent / hundred;

        // 6. labor subtotal, zeroed when labor is not charged
        let labor_subtotal = if labor_charged {
            labor_value - labor_discount_value + travel_cost + boleto_fee_labor + service_tax_value
        } else {
            Decimal::ZERO
        };

        // 7. installment interest over the material base
        let interest_value = if terms.material_cash || terms.material_installments == 0 {
            Decimal::ZERO
        } else {
            Decimal::from(
                (terms.labor_installments.max(0) + terms.material_installments.max(0) - 1).max(0),
            ) * terms.monthly_interest_percent
                / hundred
                * material_value
        };

        // 8. material boleto fees: cash pays a single slip
        let boleto_fee_material = if terms.material_cash {
            terms.boleto_fee
        } else if terms.material_installments == 0 {
            Decimal::ZERO
        } else {
            Decimal::from(terms.material_installments.max(0)) * terms.boleto_fee
        };

        // 9. material tax over base + interest + fees
        let material_tax_value = if material_charged {
            (material_value + interest_value + boleto_fee_material) * terms.material_tax_percent
                / hundred
        } else {
            Decimal::ZERO
        };

        // 10. travel billed once: it shifts onto material when labor carries
        // no charge
        let extra_travel_for_material = if labor_charged {
            Decimal::ZERO
        } else {
            travel_cost
        };

        // 11. material subtotal, zeroed when material is not charged
        let material_subtotal = if material_charged {
            material_value
                + interest_value
                + boleto_fee_material
                + material_tax_value
                + extra_travel_for_material
        } else {
            Decimal::ZERO
        };

        // 12. grand total
        let grand_total = labor_subtotal + material_subtotal - terms.manual_discount;

        BudgetTotals {
            gross_equipment_value: equipment.gross_value,
            net_equipment_value: equipment.net_value,
            discount_total: equipment.discount_total,
            labor_value,
            labor_discount_value,
            travel_cost,
            boleto_fee_labor,
            service_tax_value,
            labor_subtotal,
            material_value,
            interest_value,
            boleto_fee_material,
            material_tax_value,
            material_subtotal,
            manual_discount: terms.manual_discount,
            grand_total,
        }
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    /// Zero labor installments always produce a zero labor subtotal,
    /// whatever the other inputs
    #[test]
    fn prop_zero_labor_installments_is_no_charge() {
        proptest!(|(
            labor_cents in 0u32..=10_000_000u32,
            distance in 0u32..=1000u32,
            days in 0i32..=60,
            discount_pct in 0u32..=100u32
        )| {
            let terms = BudgetTerms {
                distance_km: Decimal::from(distance),
                term_days: days,
                rate_per_km: Decimal::new(15, 1),
                boleto_fee: Decimal::new(35, 1),
                service_tax_percent: Decimal::from(10),
                labor_discount_percent: Decimal::from(discount_pct),
                labor_installments: 0,
                material_installments: 1,
                ..BudgetTerms::default()
            };
            let equipment = EquipmentTotals {
                gross_value: Decimal::from(100),
                net_value: Decimal::from(100),
                discount_total: Decimal::ZERO,
                labor_value: Decimal::from(labor_cents) / Decimal::from(100),
            };

            let totals = SurchargeEngine::budget_totals(&equipment, &terms);

            prop_assert_eq!(totals.labor_subtotal, Decimal::ZERO);
            // Travel lands on the material side instead
            prop_assert!(totals.material_subtotal >= totals.travel_cost);
        });
    }

    /// The grand total is always the sum of the two subtotals minus the
    /// manual discount
    #[test]
    fn prop_grand_total_composition() {
        proptest!(|(
            net_cents in 0u32..=10_000_000u32,
            labor_cents in 0u32..=10_000_000u32,
            labor_inst in 0i32..=12,
            material_inst in 0i32..=12,
            cash in any::<bool>()
        )| {
            let terms = BudgetTerms {
                boleto_fee: Decimal::new(35, 1),
                monthly_interest_percent: Decimal::TWO,
                service_tax_percent: Decimal::from(11),
                material_tax_percent: Decimal::from(13),
                labor_installments: labor_inst,
                material_installments: material_inst,
                material_cash: cash,
                ..BudgetTerms::default()
            };
            let equipment = EquipmentTotals {
                gross_value: Decimal::from(net_cents) / Decimal::from(100),
                net_value: Decimal::from(net_cents) / Decimal::from(100),
                discount_total: Decimal::ZERO,
                labor_value: Decimal::from(labor_cents) / Decimal::from(100),
            };

            let totals = SurchargeEngine::budget_totals(&equipment, &terms);

            prop_assert_eq!(
                totals.grand_total,
                totals.labor_subtotal + totals.material_subtotal - totals.manual_discount
            );
        });
    }
}
