//! Checkout Session Entity

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::entity::order::OrderLine;

/// Lifecycle of a checkout session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStatus {
    Pending,
    Completed,
}

impl CheckoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStatus::Pending => "pending",
            CheckoutStatus::Completed => "completed",
        }
    }

    pub fn from_str_db(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(CheckoutStatus::Pending),
            "completed" => Some(CheckoutStatus::Completed),
            _ => None,
        }
    }
}

/// Bridge between creating a hosted checkout and its success callback
///
/// Keyed by the payment processor's own session id. The line snapshot is
/// taken at session creation so the order written on confirmation reflects
/// what the buyer saw and paid, even if the cart or catalog changed in
/// between. Exactly one `Pending -> Completed` transition is allowed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub session_id: String,
    pub user_id: UserId,
    pub coupon_code: Option<String>,
    pub lines: Vec<OrderLine>,
    pub total: Decimal,
    pub status: CheckoutStatus,
    pub created_at: DateTime<Utc>,
}

impl CheckoutSession {
    pub fn pending(
        session_id: String,
        user_id: UserId,
        coupon_code: Option<String>,
        lines: Vec<OrderLine>,
        total: Decimal,
    ) -> Self {
        Self {
            session_id,
            user_id,
            coupon_code,
            lines,
            total,
            status: CheckoutStatus::Pending,
            created_at: Utc::now(),
        }
    }
}
