//! Order Entity

use chrono::{DateTime, Utc};
use kernel::id::{Id, OrderId, ProductId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One purchased line, frozen at purchase time
///
/// `price` is the unit price the buyer actually paid; later catalog edits
/// must not rewrite order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Decimal,
}

/// A completed purchase. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub lines: Vec<OrderLine>,
    pub total: Decimal,
    /// The external checkout session that produced this order.
    /// Unique in storage; this is the checkout idempotency key.
    pub checkout_session_id: String,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn new(
        user_id: UserId,
        lines: Vec<OrderLine>,
        total: Decimal,
        checkout_session_id: String,
    ) -> Self {
        Self {
            order_id: Id::new(),
            user_id,
            lines,
            total,
            checkout_session_id,
            created_at: Utc::now(),
        }
    }
}
