//! Domain Entities

pub mod cart;
pub mod checkout_session;
pub mod coupon;
pub mod order;
pub mod product;

pub use cart::CartItem;
pub use checkout_session::{CheckoutSession, CheckoutStatus};
pub use coupon::Coupon;
pub use order::{Order, OrderLine};
pub use product::Product;
