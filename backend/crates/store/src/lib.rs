//! Store Backend Module
//!
//! Product catalog, carts, coupons, orders, and checkout against an
//! external payment processor's hosted session.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, pure pricing functions, repository and gateway
//!   traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations and the payment gateway client
//! - `presentation/` - HTTP handlers, DTOs, routers
//!
//! ## Key invariants
//! - At most one cart line per (user, product); quantities are always >= 1
//! - Cart mutations are single atomic statements; concurrent adds both
//!   count
//! - Discounts apply once to the summed subtotal, never per line
//! - One checkout session produces at most one order, no matter how many
//!   times the success callback fires
//! - Order lines freeze the price at purchase time

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::StoreConfig;
pub use application::{
    CartUseCase, CatalogUseCase, CheckoutHandle, CheckoutUseCase, CouponUseCase, OrdersUseCase,
};
pub use error::{StoreError, StoreResult};
pub use infra::postgres::{
    PgCartRepository, PgCheckoutSessionRepository, PgCouponRepository, PgOrderRepository,
    PgProductRepository,
};
pub use infra::stripe::{StripeConfig, StripeGateway};
pub use presentation::router::{
    carts_router, coupons_router, orders_router, payments_router, products_router,
};

// Convenience re-exports
pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}
