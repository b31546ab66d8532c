//! Checkout Orchestrator
//!
//! Two-step flow against a hosted payment page:
//!
//! 1. `create_session` snapshots the cart, prices it against the current
//!    catalog, asks the gateway for a hosted session, and persists a
//!    `Pending` session keyed by the gateway's id.
//! 2. `confirm` runs on the success callback. Completion is idempotent:
//!    the atomic `Pending -> Completed` transition admits exactly one
//!    caller, which writes exactly one order and clears the cart. Every
//!    later (or concurrent losing) call returns the existing order with
//!    no side effects.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::UserId;
use rust_decimal::Decimal;

use crate::domain::entity::checkout_session::CheckoutSession;
use crate::domain::entity::order::{Order, OrderLine};
use crate::domain::gateway::{
    GatewayCheckoutRequest, GatewayLineItem, GatewaySession, PaymentGateway,
};
use crate::domain::pricing;
use crate::domain::repository::{
    CartRepository, CheckoutSessionRepository, CouponRepository, OrderRepository,
};
use crate::error::{StoreError, StoreResult};

/// What the client needs to continue checkout
#[derive(Debug, Clone)]
pub struct CheckoutHandle {
    pub session_id: String,
    pub redirect_url: String,
    pub total: Decimal,
}

pub struct CheckoutUseCase<Ca, Co, Or, Se, G>
where
    Ca: CartRepository,
    Co: CouponRepository,
    Or: OrderRepository,
    Se: CheckoutSessionRepository,
    G: PaymentGateway,
{
    carts: Arc<Ca>,
    coupons: Arc<Co>,
    orders: Arc<Or>,
    sessions: Arc<Se>,
    gateway: Arc<G>,
}

impl<Ca, Co, Or, Se, G> CheckoutUseCase<Ca, Co, Or, Se, G>
where
    Ca: CartRepository + Sync,
    Co: CouponRepository + Sync,
    Or: OrderRepository + Sync,
    Se: CheckoutSessionRepository + Sync,
    G: PaymentGateway + Sync,
{
    pub fn new(
        carts: Arc<Ca>,
        coupons: Arc<Co>,
        orders: Arc<Or>,
        sessions: Arc<Se>,
        gateway: Arc<G>,
    ) -> Self {
        Self {
            carts,
            coupons,
            orders,
            sessions,
            gateway,
        }
    }

    /// Start a checkout for the user's current cart
    pub async fn create_session(
        &self,
        user_id: &UserId,
        coupon_code: Option<String>,
    ) -> StoreResult<CheckoutHandle> {
        let items = self.carts.list(user_id).await?;
        if items.is_empty() {
            return Err(StoreError::EmptyCart);
        }

        // Coupons are re-validated here no matter what the client claims
        let coupon = match coupon_code.as_deref() {
            Some(code) => {
                let coupon = self
                    .coupons
                    .find_by_code(user_id, code)
                    .await?
                    .filter(|c| c.is_valid(Utc::now()))
                    .ok_or(StoreError::InvalidCoupon)?;
                Some(coupon)
            }
            None => None,
        };
        let discount = coupon.as_ref().map(|c| c.discount_percentage);

        let total = pricing::total(pricing::subtotal(&items), discount);

        let line_items = items
            .iter()
            .map(|item| GatewayLineItem {
                name: item.product.name.clone(),
                image_url: item.product.image_url.clone(),
                unit_amount_cents: pricing::to_cents(item.product.price),
                quantity: i64::from(item.quantity),
            })
            .collect();

        let GatewaySession {
            session_id,
            redirect_url,
        } = self
            .gateway
            .create_checkout_session(GatewayCheckoutRequest {
                line_items,
                discount_percentage: discount,
            })
            .await?;

        // Snapshot the lines at current prices. The order written at
        // confirmation uses this snapshot, not whatever the cart or
        // catalog looks like by then.
        let lines = items
            .iter()
            .map(|item| OrderLine {
                product_id: item.product.product_id,
                quantity: item.quantity,
                price: item.product.price,
            })
            .collect();

        let session = CheckoutSession::pending(
            session_id.clone(),
            *user_id,
            coupon.map(|c| c.code),
            lines,
            total,
        );
        self.sessions.create(&session).await?;

        tracing::info!(session_id = %session_id, user_id = %user_id, "Checkout session created");

        Ok(CheckoutHandle {
            session_id,
            redirect_url,
            total,
        })
    }

    /// Complete a checkout. Safe to call any number of times with the
    /// same session id; exactly one order results.
    pub async fn confirm(&self, user_id: &UserId, session_id: &str) -> StoreResult<Order> {
        let session = self
            .sessions
            .find(session_id)
            .await?
            .ok_or(StoreError::SessionNotFound)?;

        // Another user's session id looks exactly like an unknown one
        if session.user_id != *user_id {
            return Err(StoreError::SessionNotFound);
        }

        if self.sessions.complete(session_id).await? {
            let order = Order::new(
                session.user_id,
                session.lines,
                session.total,
                session.session_id,
            );
            // A failed order write must not strand the session in
            // Completed with no order behind it; put it back to Pending
            // so a retry runs the whole transition again.
            if let Err(err) = self.orders.create(&order).await {
                if let Err(revert) = self.sessions.reopen(session_id).await {
                    tracing::error!(
                        session_id = %session_id,
                        error = %revert,
                        "Failed to reopen checkout session after order write failure"
                    );
                }
                return Err(err);
            }
            self.carts.clear(user_id).await?;

            tracing::info!(
                order_id = %order.order_id,
                session_id = %session_id,
                "Order created from checkout session"
            );
            return Ok(order);
        }

        // Already completed: hand back the order that first call created
        self.orders
            .find_by_session(session_id)
            .await?
            .ok_or_else(|| {
                StoreError::Internal(format!(
                    "Completed checkout session {session_id} has no order"
                ))
            })
    }
}
