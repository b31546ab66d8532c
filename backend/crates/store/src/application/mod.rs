//! Application Layer

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod coupon;
pub mod orders;

pub use cart::CartUseCase;
pub use catalog::{CatalogUseCase, CreateProductInput};
pub use checkout::{CheckoutHandle, CheckoutUseCase};
pub use config::StoreConfig;
pub use coupon::CouponUseCase;
pub use orders::OrdersUseCase;
