//! Cart Types
//!
//! A cart is not stored as one aggregate blob. Each line lives in its own
//! row keyed by (user, product) so mutations can be single atomic
//! statements; `CartItem` is the read model after joining lines with the
//! current catalog.

use rust_decimal::Decimal;

use crate::domain::entity::product::Product;

/// A cart line joined with its current product row
///
/// Invariant: quantity >= 1. A quantity that would drop to zero deletes
/// the stored line instead.
#[derive(Debug, Clone)]
pub struct CartItem {
    pub product: Product,
    pub quantity: i32,
}

impl CartItem {
    /// Line total at current catalog price
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}
