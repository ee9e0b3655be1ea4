// Aggregator
//
// Sums priced line items into the equipment-level totals consumed by the
// surcharge engines.

use crate::pricing::line_item::PricedLineItem;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Equipment-level totals over a priced selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquipmentTotals {
    /// Pre-discount value: sum of unit_price x quantity
    pub gross_value: Decimal,
    /// Post-discount value: sum of total_value
    pub net_value: Decimal,
    /// Sum of quantity and category discounts
    pub discount_total: Decimal,
    /// Sum of quantity x labor_rate (budget flow)
    pub labor_value: Decimal,
}

/// Aggregator over priced line items
pub struct Aggregator;

impl Aggregator {
    /// Compute equipment totals for a priced selection
    pub fn totals(items: &[PricedLineItem]) -> EquipmentTotals {
        let mut totals = EquipmentTotals::default();

        for item in items {
            let quantity = Decimal::from(item.quantity.max(0));
            totals.gross_value += item.unit_price * quantity;
            totals.net_value += item.total_value;
            totals.discount_total += item.quantity_discount + item.category_discount;
            totals.labor_value += item.labor_rate * quantity;
        }

        totals
    }

    /// Scale equipment totals for a per-visit proposal
    ///
    /// Equipment service is billed once per visit, so gross/net/discount all
    /// multiply by the visit count. Labor value is a budget-flow concept and
    /// is left untouched.
    pub fn scale_for_visits(totals: &EquipmentTotals, visit_count: i32) -> EquipmentTotals {
        let visits = Decimal::from(visit_count.max(0));

        EquipmentTotals {
            gross_value: totals.gross_value * visits,
            net_value: totals.net_value * visits,
            discount_total: totals.discount_total * visits,
            labor_value: totals.labor_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn priced(
        quantity: i32,
        unit_price: Decimal,
        labor_rate: Decimal,
        net_unit_price: Decimal,
    ) -> PricedLineItem {
        let q = Decimal::from(quantity);
        PricedLineItem {
            item_id: 1,
            quantity,
            unit_price,
            labor_rate,
            quantity_discount: (unit_price - net_unit_price) * q,
            category_discount: Decimal::ZERO,
            net_unit_price,
            total_value: net_unit_price * q,
        }
    }

    #[test]
    fn test_totals_empty_selection() {
        let totals = Aggregator::totals(&[]);
        assert_eq!(totals.gross_value, Decimal::ZERO);
        assert_eq!(totals.net_value, Decimal::ZERO);
        assert_eq!(totals.discount_total, Decimal::ZERO);
        assert_eq!(totals.labor_value, Decimal::ZERO);
    }

    #[test]
    fn test_totals_sum_over_items() {
        let items = vec![
            priced(2, dec!(100), dec!(40), dec!(90)),
            priced(1, dec!(200), dec!(0), dec!(200)),
        ];

        let totals = Aggregator::totals(&items);

        assert_eq!(totals.gross_value, dec!(400)); // 2x100 + 1x200
        assert_eq!(totals.net_value, dec!(380)); // 2x90 + 200
        assert_eq!(totals.discount_total, dec!(20));
        assert_eq!(totals.labor_value, dec!(80)); // 2x40
    }

    #[test]
    fn test_gross_minus_discount_equals_net() {
        let items = vec![
            priced(3, dec!(150), dec!(0), dec!(120)),
            priced(5, dec!(80), dec!(0), dec!(56)),
        ];

        let totals = Aggregator::totals(&items);

        assert_eq!(totals.gross_value - totals.discount_total, totals.net_value);
    }

    #[test]
    fn test_scale_for_visits() {
        let totals = EquipmentTotals {
            gross_value: dec!(400),
            net_value: dec!(380),
            discount_total: dec!(20),
            labor_value: dec!(80),
        };

        let scaled = Aggregator::scale_for_visits(&totals, 3);

        assert_eq!(scaled.gross_value, dec!(1200));
        assert_eq!(scaled.net_value, dec!(1140));
        assert_eq!(scaled.discount_total, dec!(60));
        // Labor is not a per-visit value
        assert_eq!(scaled.labor_value, dec!(80));
    }

    #[test]
    fn test_scale_for_negative_visits_clamps_to_zero() {
        let totals = EquipmentTotals {
            gross_value: dec!(400),
            net_value: dec!(380),
            discount_total: dec!(20),
            labor_value: dec!(80),
        };

        let scaled = Aggregator::scale_for_visits(&totals, -2);

        assert_eq!(scaled.gross_value, Decimal::ZERO);
        assert_eq!(scaled.net_value, Decimal::ZERO);
    }
}
