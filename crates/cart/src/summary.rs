//! Order summary: subtotal, shipping, and grand total.
//!
//! Both the cart page and the checkout page show the same breakdown. Shipping
//! is a flat rate that is waived once the subtotal goes above a threshold.

use artcrafts_core::{CurrencyCode, Price, ProductId, Quantity};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::item::CartLineItem;

/// Flat-rate shipping with a free-shipping threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingPolicy {
    /// Charged when the subtotal does not exceed `free_threshold`.
    pub flat_rate: Decimal,
    /// Subtotals strictly above this ship free.
    pub free_threshold: Decimal,
}

impl ShippingPolicy {
    /// Standard flat rate, in rupees.
    pub const DEFAULT_FLAT_RATE: Decimal = Decimal::from_parts(99, 0, 0, false, 0);
    /// Standard free-shipping threshold, in rupees.
    pub const DEFAULT_FREE_THRESHOLD: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

    /// Shipping charge for an order with the given subtotal.
    #[must_use]
    pub fn shipping_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal > self.free_threshold {
            Decimal::ZERO
        } else {
            self.flat_rate
        }
    }
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            flat_rate: Self::DEFAULT_FLAT_RATE,
            free_threshold: Self::DEFAULT_FREE_THRESHOLD,
        }
    }
}

/// One line of an order summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    pub id: ProductId,
    pub name: String,
    pub quantity: Quantity,
    pub unit_price: Price,
    pub line_total: Price,
}

/// Priced breakdown of a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub lines: Vec<SummaryLine>,
    pub item_count: u64,
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
}

impl OrderSummary {
    /// Price `items` under `policy`.
    ///
    /// Amounts saturate at [`Decimal::MAX`]; a [`crate::CartStore`] never
    /// holds lines that reach it.
    #[must_use]
    pub fn from_items(
        items: &[CartLineItem],
        policy: &ShippingPolicy,
        currency: CurrencyCode,
    ) -> Self {
        let lines: Vec<SummaryLine> = items
            .iter()
            .map(|item| SummaryLine {
                id: item.id.clone(),
                name: item.name.clone(),
                quantity: item.quantity,
                unit_price: Price::new(item.price, currency),
                line_total: Price::new(item.line_total(), currency),
            })
            .collect();

        let subtotal = lines
            .iter()
            .fold(Decimal::ZERO, |sum, line| sum.saturating_add(line.line_total.amount));
        let shipping = policy.shipping_for(subtotal);
        let item_count = items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum();

        Self {
            lines,
            item_count,
            subtotal: Price::new(subtotal, currency),
            shipping: Price::new(shipping, currency),
            total: Price::new(subtotal.saturating_add(shipping), currency),
        }
    }

    /// Whether shipping was waived.
    #[must_use]
    pub fn has_free_shipping(&self) -> bool {
        self.shipping.amount.is_zero()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::item::Product;

    fn line(id: i64, price: i64, quantity: u32) -> CartLineItem {
        let mut item =
            CartLineItem::from_product(&Product::new(id, format!("Craft #{id}"), Decimal::new(price, 0)));
        item.quantity = Quantity::new(quantity).unwrap();
        item
    }

    #[test]
    fn test_default_policy_constants() {
        let policy = ShippingPolicy::default();
        assert_eq!(policy.flat_rate, Decimal::new(99, 0));
        assert_eq!(policy.free_threshold, Decimal::new(1000, 0));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let policy = ShippingPolicy::default();
        assert_eq!(policy.shipping_for(Decimal::new(1000, 0)), Decimal::new(99, 0));
        assert_eq!(policy.shipping_for(Decimal::new(100001, 2)), Decimal::ZERO);
    }

    #[test]
    fn test_summary_below_threshold() {
        let items = [line(1, 100, 2), line(2, 250, 1)];
        let summary = OrderSummary::from_items(&items, &ShippingPolicy::default(), CurrencyCode::INR);

        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.subtotal.amount, Decimal::new(450, 0));
        assert_eq!(summary.shipping.amount, Decimal::new(99, 0));
        assert_eq!(summary.total.display(), "₹549");
        assert!(!summary.has_free_shipping());
        assert_eq!(summary.lines.len(), 2);
    }

    #[test]
    fn test_summary_above_threshold_ships_free() {
        let items = [line(1, 1250, 1)];
        let summary = OrderSummary::from_items(&items, &ShippingPolicy::default(), CurrencyCode::INR);

        assert!(summary.has_free_shipping());
        assert_eq!(summary.total.amount, Decimal::new(1250, 0));
    }

    #[test]
    fn test_custom_policy() {
        let policy = ShippingPolicy {
            flat_rate: Decimal::new(50, 0),
            free_threshold: Decimal::new(200, 0),
        };
        let items = [line(1, 150, 1)];
        let summary = OrderSummary::from_items(&items, &policy, CurrencyCode::USD);
        assert_eq!(summary.total.display(), "$200");
    }

    #[test]
    fn test_amounts_saturate_instead_of_panicking() {
        let policy = ShippingPolicy {
            flat_rate: Decimal::new(99, 0),
            free_threshold: Decimal::MAX,
        };
        let items = [line(1, 1, 1)];
        let mut huge = items.to_vec();
        huge.push(CartLineItem::from_product(&Product::new(2_i64, "Heirloom", Decimal::MAX)));

        let summary = OrderSummary::from_items(&huge, &policy, CurrencyCode::INR);
        assert_eq!(summary.subtotal.amount, Decimal::MAX);
        assert_eq!(summary.total.amount, Decimal::MAX);
    }
}
