//! Bill arithmetic
//!
//! All money math runs through `Decimal` and is rounded to 2 decimal
//! places with midpoint-away-from-zero, then stored as f64.
//!
//! Item `price` is canonically a unit price; every subtotal is
//! Σ price × quantity.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use super::model::{Discount, OrderItem};

const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal (invalid values become zero)
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64, rounded to 2 decimal places
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Subtotal of a full item list: Σ unit price × quantity
pub fn items_subtotal(items: &[OrderItem]) -> f64 {
    let total = items.iter().fold(Decimal::ZERO, |acc, item| {
        acc + to_decimal(item.price) * Decimal::from(item.quantity)
    });
    to_f64(total)
}

/// Total after applying an optional discount, floored at zero
pub fn discounted_total(total: f64, discount: Option<&Discount>) -> f64 {
    let amount = discount.map(|d| to_decimal(d.amount)).unwrap_or_default();
    to_f64((to_decimal(total) - amount).max(Decimal::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: f64, quantity: u32) -> OrderItem {
        OrderItem {
            name: "item".into(),
            price,
            quantity,
        }
    }

    #[test]
    fn subtotal_multiplies_quantity() {
        let items = vec![item(120.0, 2), item(35.5, 1)];
        assert_eq!(items_subtotal(&items), 275.5);
    }

    #[test]
    fn subtotal_rounds_to_cents() {
        // 3 × 1.115 = 3.345 → 3.35 (midpoint away from zero)
        let items = vec![item(1.115, 3)];
        assert_eq!(items_subtotal(&items), 3.35);
    }

    #[test]
    fn empty_items_sum_to_zero() {
        assert_eq!(items_subtotal(&[]), 0.0);
    }

    #[test]
    fn discounted_total_subtracts_amount() {
        let discount = Discount {
            coupon_code: "SAVE10".into(),
            amount: 25.0,
        };
        assert_eq!(discounted_total(250.0, Some(&discount)), 225.0);
        assert_eq!(discounted_total(250.0, None), 250.0);
    }

    #[test]
    fn discount_never_goes_negative() {
        let discount = Discount {
            coupon_code: "BIG".into(),
            amount: 500.0,
        };
        assert_eq!(discounted_total(100.0, Some(&discount)), 0.0);
    }
}
