//! Payment Gateway Port
//!
//! The checkout orchestrator only ever talks to this trait. The production
//! implementation posts to a hosted-checkout REST API; tests use a
//! recording fake. Amounts cross this boundary in integer cents because
//! that is what payment processors take.

use rust_decimal::Decimal;

use crate::error::StoreResult;

/// One display line for the hosted checkout page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayLineItem {
    pub name: String,
    pub image_url: String,
    /// Unit price in minor units (cents)
    pub unit_amount_cents: i64,
    pub quantity: i64,
}

/// What the orchestrator asks the processor to host
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayCheckoutRequest {
    pub line_items: Vec<GatewayLineItem>,
    /// Percentage discount (0-100) already validated by the caller
    pub discount_percentage: Option<Decimal>,
}

/// The processor's answer: its session id plus where to send the buyer
#[derive(Debug, Clone)]
pub struct GatewaySession {
    pub session_id: String,
    pub redirect_url: String,
}

/// External payment processor, reduced to the one call checkout needs
#[trait_variant::make(PaymentGateway: Send)]
pub trait LocalPaymentGateway {
    async fn create_checkout_session(
        &self,
        request: GatewayCheckoutRequest,
    ) -> StoreResult<GatewaySession>;
}
