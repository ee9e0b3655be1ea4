// Discount Engine
//
// Computes per-line discounts: a quantity-tiered discount and, on top of it,
// a category-completion discount unlocked when the selection covers every
// catalog item of that category.

use crate::models::{CatalogItem, ItemCategory};
use crate::pricing::line_item::{PricedLineItem, SelectedLineItem};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

/// Extra discount applied when a category is fully selected
const CATEGORY_COMPLETION_PERCENT: u32 = 10;

/// Discount Engine
///
/// Stateless: completeness is derived fresh from (catalog, selection) on every
/// call, so adding or removing any item anywhere in the selection is reflected
/// on all sibling lines of the affected category.
pub struct DiscountEngine;

impl DiscountEngine {
    /// Quantity discount tier, in percent
    ///
    /// 1 unit pays list price; the tier grows with quantity and caps at 30%.
    pub fn quantity_discount_percent(quantity: i32) -> Decimal {
        match quantity {
            i32::MIN..=1 => Decimal::ZERO,
            2 => Decimal::from(10),
            3 | 4 => Decimal::from(20),
            _ => Decimal::from(30),
        }
    }

    /// Categories whose every catalog item appears in the selection
    pub fn complete_categories(
        catalog: &[CatalogItem],
        selection: &[SelectedLineItem],
    ) -> HashSet<ItemCategory> {
        let selected_ids: HashSet<i32> = selection.iter().map(|item| item.item_id).collect();

        let mut counts: HashMap<ItemCategory, (usize, usize)> = HashMap::new();
        for item in catalog {
            let entry = counts.entry(item.category).or_insert((0, 0));
            entry.0 += 1;
            if selected_ids.contains(&item.id) {
                entry.1 += 1;
            }
        }

        counts
            .into_iter()
            .filter(|(_, (total, selected))| *total > 0 && selected == total)
            .map(|(category, _)| category)
            .collect()
    }

    /// Recompute all derived pricing fields for the selection
    ///
    /// Composition order: the quantity tier discounts the list price, then the
    /// category-completion discount applies on the already-discounted unit
    /// price. The two discounts compound; they are never summed as independent
    /// percentages off the original price.
    pub fn price_items(
        catalog: &[CatalogItem],
        selection: &[SelectedLineItem],
    ) -> Vec<PricedLineItem> {
        let complete = Self::complete_categories(catalog, selection);
        let categories: HashMap<i32, ItemCategory> = catalog
            .iter()
            .map(|item| (item.id, item.category))
            .collect();

        selection
            .iter()
            .map(|item| Self::price_item(item, &categories, &complete))
            .collect()
    }

    fn price_item(
        item: &SelectedLineItem,
        categories: &HashMap<i32, ItemCategory>,
        complete: &HashSet<ItemCategory>,
    ) -> PricedLineItem {
        let hundred = Decimal::from(100);
        let quantity = Decimal::from(item.quantity.max(0));

        let qty_pct = Self::quantity_discount_percent(item.quantity);
        let cat_pct = match categories.get(&item.item_id) {
            Some(category) if complete.contains(category) => {
                Decimal::from(CATEGORY_COMPLETION_PERCENT)
            }
            _ => Decimal::ZERO,
        };

        let net_after_qty = item.unit_price * (Decimal::ONE - qty_pct / hundred);
        let net_unit_price = net_after_qty * (Decimal::ONE - cat_pct / hundred);

        let quantity_discount = item.unit_price * qty_pct / hundred * quantity;
        let category_discount = net_after_qty * cat_pct / hundred * quantity;
        let total_value = net_unit_price * quantity;

        PricedLineItem {
            item_id: item.item_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
            labor_rate: item.labor_rate,
            quantity_discount,
            category_discount,
            net_unit_price,
            total_value,
        }
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    /// Tier monotonicity: a larger quantity never earns a smaller discount
    #[test]
    fn prop_tier_monotonicity() {
        proptest!(|(q1 in 1i32..=500, q2 in 1i32..=500)| {
            let (lo, hi) = if q1 <= q2 { (q1, q2) } else { (q2, q1) };
            prop_assert!(
                DiscountEngine::quantity_discount_percent(lo)
                    <= DiscountEngine::quantity_discount_percent(hi)
            );
        });
    }

    /// Net total never exceeds the list total and never goes negative
    #[test]
    fn prop_net_total_bounded() {
        proptest!(|(quantity in 1i32..=50, price_cents in 1u32..=1_000_000u32)| {
            let unit_price = Decimal::from(price_cents) / Decimal::from(100);
            let catalog = vec![];
            let selection = vec![SelectedLineItem {
                item_id: 1,
                quantity,
                unit_price,
                labor_rate: Decimal::ZERO,
            }];

            let priced = DiscountEngine::price_items(&catalog, &selection);
            let gross = unit_price * Decimal::from(quantity);

            prop_assert!(priced[0].total_value <= gross);
            prop_assert!(priced[0].total_value >= Decimal::ZERO);
        });
    }

    /// Discount amounts plus net total always reconstruct the gross total
    #[test]
    fn prop_discounts_account_for_delta() {
        proptest!(|(quantity in 1i32..=50, price_cents in 1u32..=1_000_000u32)| {
            let unit_price = Decimal::from(price_cents) / Decimal::from(100);
            // Single-item catalog: the category is always complete, so both
            // discounts are in play
            let catalog = vec![CatalogItem {
                id: 1,
                name: "item".to_string(),
                category: crate::models::ItemCategory::Pump,
                unit_rate: unit_price,
                labor_rate: Decimal::ZERO,
                created_at: chrono::Utc::now(),
                updated_at: chrono::Utc::now(),
            }];
            let selection = vec![SelectedLineItem {
                item_id: 1,
                quantity,
                unit_price,
                labor_rate: Decimal::ZERO,
            }];

            let priced = DiscountEngine::price_items(&catalog, &selection);
            let gross = unit_price * Decimal::from(quantity);
            let reconstructed =
                priced[0].total_value + priced[0].quantity_discount + priced[0].category_discount;

            let delta = (reconstructed - gross).abs();
            prop_assert!(delta < Decimal::new(1, 6), "delta too large: {}", delta);
        });
    }
}
