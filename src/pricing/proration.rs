// Proration Engine
//
// Rescales line-item unit prices so that the summed line totals reproduce the
// adjusted material subtotal. Invoices must show per-line prices that add up
// to the charged amount, so the interest/fee/tax delta is spread across the
// lines in proportion to their value.

use crate::pricing::line_item::{AdjustedLineItem, PricedLineItem};
use rust_decimal::Decimal;

/// Proration Engine
pub struct ProrationEngine;

impl ProrationEngine {
    /// Compute invoice-adjusted line items
    ///
    /// `material_subtotal` is the charged material amount from the surcharge
    /// engine. When either the subtotal or the summed line value is zero the
    /// original prices are returned unchanged; the division is never allowed
    /// to produce a non-finite factor.
    pub fn invoice_items(
        items: &[PricedLineItem],
        material_subtotal: Decimal,
    ) -> Vec<AdjustedLineItem> {
        let gross: Decimal = items.iter().map(|item| item.total_value).sum();

        if gross.is_zero() || material_subtotal.is_zero() {
            return items.iter().map(Self::unadjusted).collect();
        }

        let factor = material_subtotal / gross;

        items
            .iter()
            .map(|item| {
                let unit_price = item.net_unit_price * factor;
                AdjustedLineItem {
                    item_id: item.item_id,
                    quantity: item.quantity,
                    unit_price,
                    total_value: Decimal::from(item.quantity.max(0)) * unit_price,
                }
            })
            .collect()
    }

    fn unadjusted(item: &PricedLineItem) -> AdjustedLineItem {
        AdjustedLineItem {
            item_id: item.item_id,
            quantity: item.quantity,
            unit_price: item.net_unit_price,
            total_value: item.total_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn priced(item_id: i32, quantity: i32, net_unit_price: Decimal) -> PricedLineItem {
        PricedLineItem {
            item_id,
            quantity,
            unit_price: net_unit_price,
            labor_rate: Decimal::ZERO,
            quantity_discount: Decimal::ZERO,
            category_discount: Decimal::ZERO,
            net_unit_price,
            total_value: Decimal::from(quantity) * net_unit_price,
        }
    }

    #[test]
    fn test_identity_when_subtotal_matches_gross() {
        let items = vec![priced(1, 2, dec!(100)), priced(2, 1, dec!(50))];

        let adjusted = ProrationEngine::invoice_items(&items, dec!(250));

        assert_eq!(adjusted[0].unit_price, dec!(100));
        assert_eq!(adjusted[0].total_value, dec!(200));
        assert_eq!(adjusted[1].unit_price, dec!(50));
        assert_eq!(adjusted[1].total_value, dec!(50));
    }

    #[test]
    fn test_inflated_subtotal_scales_unit_prices() {
        let items = vec![priced(1, 1, dec!(200))];

        // Interest, fees and tax pushed 200 worth of material to 233.8525
        let adjusted = ProrationEngine::invoice_items(&items, dec!(233.8525));

        assert_eq!(adjusted[0].unit_price, dec!(233.8525));
        assert_eq!(adjusted[0].total_value, dec!(233.8525));
    }

    #[test]
    fn test_adjusted_totals_reproduce_subtotal() {
        let items = vec![
            priced(1, 3, dec!(119.90)),
            priced(2, 1, dec!(45.00)),
            priced(3, 7, dec!(12.35)),
        ];
        let subtotal = dec!(520.77);

        let adjusted = ProrationEngine::invoice_items(&items, subtotal);
        let sum: Decimal = adjusted.iter().map(|item| item.total_value).sum();

        let delta = (sum - subtotal).abs();
        assert!(delta < dec!(0.000001), "delta too large: {}", delta);
    }

    #[test]
    fn test_zero_gross_returns_items_unchanged() {
        let items = vec![priced(1, 0, dec!(0))];

        let adjusted = ProrationEngine::invoice_items(&items, dec!(100));

        assert_eq!(adjusted.len(), 1);
        assert_eq!(adjusted[0].unit_price, Decimal::ZERO);
        assert_eq!(adjusted[0].total_value, Decimal::ZERO);
    }

    #[test]
    fn test_zero_subtotal_returns_items_unchanged() {
        let items = vec![priced(1, 2, dec!(80))];

        let adjusted = ProrationEngine::invoice_items(&items, Decimal::ZERO);

        assert_eq!(adjusted[0].unit_price, dec!(80));
        assert_eq!(adjusted[0].total_value, dec!(160));
    }

    #[test]
    fn test_empty_selection() {
        let adjusted = ProrationEngine::invoice_items(&[], dec!(100));
        assert!(adjusted.is_empty());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    /// Summed adjusted totals reproduce the material subtotal for any
    /// non-degenerate selection
    #[test]
    fn prop_proration_round_trip() {
        proptest!(|(
            lines in prop::collection::vec((1i32..=20, 1u32..=100_000u32), 1..=10),
            subtotal_cents in 1u32..=100_000_000u32
        )| {
            let items: Vec<PricedLineItem> = lines
                .iter()
                .enumerate()
                .map(|(index, (quantity, price_cents))| {
                    let net_unit_price = Decimal::from(*price_cents) / Decimal::from(100);
                    PricedLineItem {
                        item_id: index as i32 + 1,
                        quantity: *quantity,
                        unit_price: net_unit_price,
                        labor_rate: Decimal::ZERO,
                        quantity_discount: Decimal::ZERO,
                        category_discount: Decimal::ZERO,
                        net_unit_price,
                        total_value: Decimal::from(*quantity) * net_unit_price,
                    }
                })
                .collect();
            let subtotal = Decimal::from(subtotal_cents) / Decimal::from(100);

            let adjusted = ProrationEngine::invoice_items(&items, subtotal);
            let sum: Decimal = adjusted.iter().map(|item| item.total_value).sum();

            let delta = (sum - subtotal).abs();
            prop_assert!(delta < Decimal::new(1, 6), "delta too large: {}", delta);
        });
    }

    /// A subtotal equal to the gross value leaves every unit price unchanged
    #[test]
    fn prop_proration_identity() {
        proptest!(|(
            lines in prop::collection::vec((1i32..=20, 1u32..=100_000u32), 1..=10)
        )| {
            let items: Vec<PricedLineItem> = lines
                .iter()
                .enumerate()
                .map(|(index, (quantity, price_cents))| {
                    let net_unit_price = Decimal::from(*price_cents) / Decimal::from(100);
                    PricedLineItem {
                        item_id: index as i32 + 1,
                        quantity: *quantity,
                        unit_price: net_unit_price,
                        labor_rate: Decimal::ZERO,
                        quantity_discount: Decimal::ZERO,
                        category_discount: Decimal::ZERO,
                        net_unit_price,
                        total_value: Decimal::from(*quantity) * net_unit_price,
                    }
                })
                .collect();
            let gross: Decimal = items.iter().map(|item| item.total_value).sum();

            let adjusted = ProrationEngine::invoice_items(&items, gross);

            for (original, adjusted) in items.iter().zip(adjusted.iter()) {
                prop_assert_eq!(adjusted.unit_price, original.net_unit_price);
                prop_assert_eq!(adjusted.total_value, original.total_value);
            }
        });
    }
}
