//! Pricing Engine
//!
//! Pure functions over exact decimals. The rules are fixed:
//! - subtotal is the sum of line totals (empty cart -> 0)
//! - a percentage discount applies once, to the summed subtotal,
//!   never per line
//! - no rounding here; amounts are rounded to 2 places only at the
//!   presentation and payment-gateway boundaries

use rust_decimal::Decimal;

use crate::domain::entity::cart::CartItem;

/// Sum of `price * quantity` over all items
pub fn subtotal(items: &[CartItem]) -> Decimal {
    items.iter().map(CartItem::line_total).sum()
}

/// Apply an optional percentage discount to a subtotal
///
/// `discount_percentage` is expected in 0-100; `None` means no coupon
/// (an expired or inactive coupon must be mapped to `None` by the caller
/// before pricing).
pub fn total(subtotal: Decimal, discount_percentage: Option<Decimal>) -> Decimal {
    match discount_percentage {
        Some(pct) => subtotal * (Decimal::ONE - pct / Decimal::ONE_HUNDRED),
        None => subtotal,
    }
}

/// Decimal amount to integer cents, for payment processors that only
/// take minor units. Rounds half-up at the second decimal place.
pub fn to_cents(amount: Decimal) -> i64 {
    use rust_decimal::RoundingStrategy;
    use rust_decimal::prelude::ToPrimitive;

    (amount * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::product::Product;
    use rust_decimal_macros::dec;

    fn item(price: Decimal, quantity: i32) -> CartItem {
        CartItem {
            product: Product::new(
                "Item".to_string(),
                String::new(),
                price,
                "misc".to_string(),
                String::new(),
                100,
            )
            .unwrap(),
            quantity,
        }
    }

    #[test]
    fn test_empty_cart_subtotal_is_zero() {
        assert_eq!(subtotal(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_subtotal_sums_line_totals() {
        let items = vec![item(dec!(10), 2), item(dec!(5.50), 1)];
        assert_eq!(subtotal(&items), dec!(25.50));
    }

    #[test]
    fn test_twenty_percent_off_one_hundred_is_eighty() {
        assert_eq!(total(dec!(100), Some(dec!(20))), dec!(80));
    }

    #[test]
    fn test_discount_on_zero_is_zero() {
        assert_eq!(total(Decimal::ZERO, Some(dec!(50))), Decimal::ZERO);
    }

    #[test]
    fn test_no_coupon_leaves_subtotal_unchanged() {
        assert_eq!(total(dec!(50), None), dec!(50));
    }

    #[test]
    fn test_discount_applies_to_sum_not_per_line() {
        // 3 * 0.10 with 33% off: sum first (0.30 -> 0.201), not
        // per-line truncation
        let items = vec![item(dec!(0.10), 3)];
        let t = total(subtotal(&items), Some(dec!(33)));
        assert_eq!(t, dec!(0.2010));
    }

    #[test]
    fn test_to_cents_rounds_half_up() {
        assert_eq!(to_cents(dec!(19.99)), 1999);
        assert_eq!(to_cents(dec!(0.005)), 1);
        assert_eq!(to_cents(dec!(0.2010)), 20);
        assert_eq!(to_cents(Decimal::ZERO), 0);
    }
}
