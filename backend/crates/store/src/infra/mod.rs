//! Infrastructure Layer

pub mod postgres;
pub mod stripe;

pub use postgres::{
    PgCartRepository, PgCheckoutSessionRepository, PgCouponRepository, PgOrderRepository,
    PgProductRepository,
};
pub use stripe::{StripeConfig, StripeGateway};
