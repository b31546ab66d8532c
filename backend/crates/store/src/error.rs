//! Store Error Types
//!
//! Store-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Store-specific result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Store-specific error variants
#[derive(Debug, Error)]
pub enum StoreError {
    /// Referenced product does not exist
    #[error("Product not found")]
    ProductNotFound,

    /// Quantity update for a product with no cart line
    #[error("Product not found in cart")]
    LineNotFound,

    /// Checkout attempted with no resolvable cart lines
    #[error("Cart is empty")]
    EmptyCart,

    /// Coupon code does not resolve for this user
    #[error("Coupon not found")]
    CouponNotFound,

    /// Coupon resolved but is past its expiry (now deactivated)
    #[error("Coupon expired")]
    CouponExpired,

    /// Coupon supplied at checkout does not resolve or is no longer valid
    #[error("Invalid or expired coupon")]
    InvalidCoupon,

    /// Unknown checkout session id on the success callback
    #[error("Checkout session not found")]
    SessionNotFound,

    /// Order lookup outside the owner's scope, or unknown id
    #[error("Order not found")]
    OrderNotFound,

    /// Missing/malformed input, surfaced with a field-level message
    #[error("{0}")]
    Validation(String),

    /// Payment processor call failed. The detail stays in server logs;
    /// clients get one generic retryable message.
    #[error("Payment gateway error: {0}")]
    PaymentGateway(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            StoreError::ProductNotFound
            | StoreError::LineNotFound
            | StoreError::CouponNotFound
            | StoreError::SessionNotFound
            | StoreError::OrderNotFound => StatusCode::NOT_FOUND,
            StoreError::EmptyCart
            | StoreError::CouponExpired
            | StoreError::InvalidCoupon
            | StoreError::Validation(_) => StatusCode::BAD_REQUEST,
            StoreError::PaymentGateway(_) => StatusCode::BAD_GATEWAY,
            StoreError::Database(_) | StoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::ProductNotFound
            | StoreError::LineNotFound
            | StoreError::CouponNotFound
            | StoreError::SessionNotFound
            | StoreError::OrderNotFound => ErrorKind::NotFound,
            StoreError::EmptyCart
            | StoreError::CouponExpired
            | StoreError::InvalidCoupon
            | StoreError::Validation(_) => ErrorKind::BadRequest,
            StoreError::PaymentGateway(_) => ErrorKind::BadGateway,
            StoreError::Database(_) | StoreError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError. Gateway failures are replaced by a generic
    /// client-facing message; the underlying detail is only logged.
    pub fn to_app_error(&self) -> AppError {
        match self {
            StoreError::PaymentGateway(_) => AppError::new(
                ErrorKind::BadGateway,
                "Payment service is unavailable, please try again",
            ),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            StoreError::Database(e) => {
                tracing::error!(error = %e, "Store database error");
            }
            StoreError::Internal(msg) => {
                tracing::error!(message = %msg, "Store internal error");
            }
            StoreError::PaymentGateway(detail) => {
                tracing::error!(detail = %detail, "Payment gateway call failed");
            }
            _ => {
                tracing::debug!(error = %self, "Store error");
            }
        }
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Internal(format!("Serialization error: {err}"))
    }
}
