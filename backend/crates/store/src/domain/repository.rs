//! Repository Traits
//!
//! Storage ports for the store domain. Implementations must keep every
//! mutation a single atomic statement (or one transaction) so concurrent
//! requests cannot lose updates; there is no read-modify-write of a whole
//! user aggregate anywhere in this interface.

use kernel::id::{CouponId, OrderId, ProductId, UserId};

use crate::domain::entity::cart::CartItem;
use crate::domain::entity::checkout_session::CheckoutSession;
use crate::domain::entity::coupon::Coupon;
use crate::domain::entity::order::Order;
use crate::domain::entity::product::Product;
use crate::error::StoreResult;

/// Product catalog storage
#[trait_variant::make(ProductRepository: Send)]
pub trait LocalProductRepository {
    async fn create(&self, product: &Product) -> StoreResult<()>;

    async fn find_all(&self) -> StoreResult<Vec<Product>>;

    async fn find_by_id(&self, product_id: &ProductId) -> StoreResult<Option<Product>>;

    async fn find_by_category(&self, category: &str) -> StoreResult<Vec<Product>>;

    async fn find_featured(&self) -> StoreResult<Vec<Product>>;

    /// Oldest products first, capped at `limit`
    async fn find_recommended(&self, limit: i64) -> StoreResult<Vec<Product>>;

    /// Flip the featured flag in place; `None` when the product is unknown
    async fn toggle_featured(&self, product_id: &ProductId) -> StoreResult<Option<Product>>;

    /// `false` when the product was already absent
    async fn delete(&self, product_id: &ProductId) -> StoreResult<bool>;
}

/// Cart line storage
///
/// Lines are keyed by (user, product); implementations enforce at most one
/// line per product per user and quantity >= 1.
#[trait_variant::make(CartRepository: Send)]
pub trait LocalCartRepository {
    /// Add one unit: insert a fresh line at quantity 1, or bump an
    /// existing line by 1, atomically.
    async fn add_line(&self, user_id: &UserId, product_id: &ProductId) -> StoreResult<()>;

    /// Overwrite a line's quantity (callers route qty <= 0 to
    /// [`Self::remove_line`] instead); `false` when no line exists
    async fn set_quantity(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        quantity: i32,
    ) -> StoreResult<bool>;

    /// `false` when the line was already absent
    async fn remove_line(&self, user_id: &UserId, product_id: &ProductId) -> StoreResult<bool>;

    async fn clear(&self, user_id: &UserId) -> StoreResult<()>;

    /// The user's lines joined with current product rows. Lines whose
    /// product no longer resolves are dropped silently.
    async fn list(&self, user_id: &UserId) -> StoreResult<Vec<CartItem>>;
}

/// Coupon storage
#[trait_variant::make(CouponRepository: Send)]
pub trait LocalCouponRepository {
    async fn find_active_for_user(&self, user_id: &UserId) -> StoreResult<Option<Coupon>>;

    async fn find_by_code(&self, user_id: &UserId, code: &str) -> StoreResult<Option<Coupon>>;

    async fn deactivate(&self, coupon_id: &CouponId) -> StoreResult<()>;
}

/// Order storage. Orders are append-only.
#[trait_variant::make(OrderRepository: Send)]
pub trait LocalOrderRepository {
    /// Persist the order and all its lines in one transaction
    async fn create(&self, order: &Order) -> StoreResult<()>;

    /// Newest first
    async fn list_for_user(&self, user_id: &UserId) -> StoreResult<Vec<Order>>;

    /// Owner-scoped lookup
    async fn find_for_user(
        &self,
        user_id: &UserId,
        order_id: &OrderId,
    ) -> StoreResult<Option<Order>>;

    async fn find_by_session(&self, session_id: &str) -> StoreResult<Option<Order>>;
}

/// Checkout session storage
#[trait_variant::make(CheckoutSessionRepository: Send)]
pub trait LocalCheckoutSessionRepository {
    async fn create(&self, session: &CheckoutSession) -> StoreResult<()>;

    async fn find(&self, session_id: &str) -> StoreResult<Option<CheckoutSession>>;

    /// Atomic `Pending -> Completed` transition. Returns `true` for the
    /// one caller that performed the transition, `false` when the session
    /// was already completed. Concurrent confirmations of one session get
    /// at most one `true` between them.
    async fn complete(&self, session_id: &str) -> StoreResult<bool>;

    /// Atomic `Completed -> Pending` transition, the compensation for a
    /// `complete` whose follow-up order write failed. Returns `true` when
    /// the session was reverted.
    async fn reopen(&self, session_id: &str) -> StoreResult<bool>;
}
