//! Coupon Entity

use chrono::{DateTime, Utc};
use kernel::id::{CouponId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-user percentage coupon
///
/// A coupon is applied transiently: nothing is stored on the cart, and the
/// code is re-validated server-side at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    pub coupon_id: CouponId,
    pub user_id: UserId,
    pub code: String,
    /// Percentage discount, 0-100
    pub discount_percentage: Decimal,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
}

impl Coupon {
    /// Whether the coupon can still be applied at `now`
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at > now
    }

    /// Whether the coupon is active but past its expiry (needs deactivation)
    pub fn is_lapsed(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use kernel::id::Id;
    use rust_decimal_macros::dec;

    fn coupon(expires_in: Duration, is_active: bool) -> Coupon {
        Coupon {
            coupon_id: Id::new(),
            user_id: Id::new(),
            code: "GIFT20".to_string(),
            discount_percentage: dec!(20),
            expires_at: Utc::now() + expires_in,
            is_active,
        }
    }

    #[test]
    fn test_active_unexpired_coupon_is_valid() {
        assert!(coupon(Duration::days(1), true).is_valid(Utc::now()));
    }

    #[test]
    fn test_expired_coupon_is_lapsed_not_valid() {
        let c = coupon(Duration::days(-1), true);
        let now = Utc::now();
        assert!(!c.is_valid(now));
        assert!(c.is_lapsed(now));
    }

    #[test]
    fn test_inactive_coupon_is_neither_valid_nor_lapsed() {
        let c = coupon(Duration::days(1), false);
        let now = Utc::now();
        assert!(!c.is_valid(now));
        assert!(!c.is_lapsed(now));
    }
}
