//! Stripe-style Payment Gateway
//!
//! Implements the [`PaymentGateway`] port against a hosted-checkout REST
//! API: form-encoded POSTs, bearer-authenticated with the secret key.
//! When a discount applies, a one-off percentage coupon is created first
//! and attached to the session.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::gateway::{GatewayCheckoutRequest, GatewaySession, PaymentGateway};
use crate::error::{StoreError, StoreResult};

/// Connection settings for the payment processor
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// API base, overridable so tests can point at a local stub
    pub api_base: String,
    pub secret_key: String,
    /// Where the processor sends the buyer on success; the session id is
    /// appended as a query parameter by the processor
    pub success_url: String,
    pub cancel_url: String,
}

impl StripeConfig {
    pub fn new(secret_key: String, success_url: String, cancel_url: String) -> Self {
        Self {
            api_base: "https://api.stripe.com".to_string(),
            secret_key,
            success_url,
            cancel_url,
        }
    }
}

/// Production [`PaymentGateway`] over HTTP
#[derive(Clone)]
pub struct StripeGateway {
    client: reqwest::Client,
    config: StripeConfig,
}

impl StripeGateway {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn post_form<T>(&self, path: &str, params: &[(String, String)]) -> StoreResult<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.config.api_base, path);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.secret_key)
            .form(params)
            .send()
            .await
            .map_err(|e| StoreError::PaymentGateway(format!("POST {path}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::PaymentGateway(format!(
                "POST {path} returned {status}: {body}"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::PaymentGateway(format!("POST {path}: bad response: {e}")))
    }
}

impl PaymentGateway for StripeGateway {
    async fn create_checkout_session(
        &self,
        request: GatewayCheckoutRequest,
    ) -> StoreResult<GatewaySession> {
        let mut params: Vec<(String, String)> = vec![
            ("mode".to_string(), "payment".to_string()),
            (
                "success_url".to_string(),
                format!(
                    "{}?session_id={{CHECKOUT_SESSION_ID}}",
                    self.config.success_url
                ),
            ),
            ("cancel_url".to_string(), self.config.cancel_url.clone()),
        ];

        for (i, item) in request.line_items.iter().enumerate() {
            params.push((
                format!("line_items[{i}][price_data][currency]"),
                "usd".to_string(),
            ));
            params.push((
                format!("line_items[{i}][price_data][product_data][name]"),
                item.name.clone(),
            ));
            if !item.image_url.is_empty() {
                params.push((
                    format!("line_items[{i}][price_data][product_data][images][0]"),
                    item.image_url.clone(),
                ));
            }
            params.push((
                format!("line_items[{i}][price_data][unit_amount]"),
                item.unit_amount_cents.to_string(),
            ));
            params.push((format!("line_items[{i}][quantity]"), item.quantity.to_string()));
        }

        if let Some(pct) = request.discount_percentage {
            let coupon: CreatedCoupon = self
                .post_form(
                    "/v1/coupons",
                    &[
                        ("percent_off".to_string(), pct.to_string()),
                        ("duration".to_string(), "once".to_string()),
                    ],
                )
                .await?;
            params.push(("discounts[0][coupon]".to_string(), coupon.id));
        }

        let session: CreatedSession = self.post_form("/v1/checkout/sessions", &params).await?;

        tracing::debug!(session_id = %session.id, "Hosted checkout session created");

        Ok(GatewaySession {
            session_id: session.id,
            redirect_url: session.url,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CreatedCoupon {
    id: String,
}

#[derive(Debug, Deserialize)]
struct CreatedSession {
    id: String,
    url: String,
}
