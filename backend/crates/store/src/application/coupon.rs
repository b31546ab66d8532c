//! Coupon Use Cases

use std::sync::Arc;

use chrono::Utc;
use kernel::id::UserId;

use crate::domain::entity::coupon::Coupon;
use crate::domain::repository::CouponRepository;
use crate::error::{StoreError, StoreResult};

pub struct CouponUseCase<C>
where
    C: CouponRepository,
{
    coupons: Arc<C>,
}

impl<C> CouponUseCase<C>
where
    C: CouponRepository + Sync,
{
    pub fn new(coupons: Arc<C>) -> Self {
        Self { coupons }
    }

    /// The user's currently active coupon, if any
    pub async fn active_for_user(&self, user_id: &UserId) -> StoreResult<Option<Coupon>> {
        self.coupons.find_active_for_user(user_id).await
    }

    /// Resolve a code for this user and check it is still usable.
    ///
    /// A coupon found active but past its expiry gets deactivated here so
    /// it stops showing up as the user's active coupon.
    pub async fn validate(&self, user_id: &UserId, code: &str) -> StoreResult<Coupon> {
        let coupon = self
            .coupons
            .find_by_code(user_id, code)
            .await?
            .ok_or(StoreError::CouponNotFound)?;

        let now = Utc::now();
        if coupon.is_lapsed(now) {
            self.coupons.deactivate(&coupon.coupon_id).await?;
            tracing::debug!(coupon_id = %coupon.coupon_id, "Deactivated lapsed coupon");
            return Err(StoreError::CouponExpired);
        }
        if !coupon.is_valid(now) {
            return Err(StoreError::CouponNotFound);
        }

        Ok(coupon)
    }
}
