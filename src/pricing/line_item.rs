use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Catalog item selected for a quote or proposal
///
/// Carries the values captured at selection time. `unit_price` and
/// `labor_rate` are snapshots of the catalog rates; the catalog may change
/// afterwards without affecting an open quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedLineItem {
    pub item_id: i32,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub unit_price: Decimal,
    /// Labor component per unit (budget flow); zero in the proposal flow
    #[serde(default)]
    pub labor_rate: Decimal,
}

/// Line item with all derived pricing fields recomputed
///
/// Produced by the discount engine on every pricing pass. Derived fields are
/// never persisted as authoritative state; any mutation of the selection or
/// terms yields a fresh set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricedLineItem {
    pub item_id: i32,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub unit_price: Decimal,
    #[serde(default)]
    pub labor_rate: Decimal,
    /// Tiered quantity discount, in currency, over the whole quantity
    #[serde(default)]
    pub quantity_discount: Decimal,
    /// Category-completion discount, in currency, over the whole quantity
    #[serde(default)]
    pub category_discount: Decimal,
    /// Unit price after both discounts
    #[serde(default)]
    pub net_unit_price: Decimal,
    /// quantity x net_unit_price
    #[serde(default)]
    pub total_value: Decimal,
}

impl PricedLineItem {
    /// Labor value contributed by this line (quantity x labor rate)
    pub fn labor_value(&self) -> Decimal {
        Decimal::from(self.quantity) * self.labor_rate
    }
}

/// Line item with the invoice-adjusted unit price
///
/// Output of the proration engine. Display/export only; the authoritative
/// `PricedLineItem` fields are never overwritten by these values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustedLineItem {
    pub item_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_value: Decimal,
}
