//! Cart Use Cases
//!
//! Every mutation returns the refreshed cart view so clients never have
//! to guess at resulting state. The mutations themselves are delegated to
//! the repository as single atomic statements; two concurrent adds of the
//! same product both land.

use std::sync::Arc;

use kernel::id::{ProductId, UserId};

use crate::domain::entity::cart::CartItem;
use crate::domain::repository::{CartRepository, ProductRepository};
use crate::error::{StoreError, StoreResult};

pub struct CartUseCase<P, C>
where
    P: ProductRepository,
    C: CartRepository,
{
    products: Arc<P>,
    carts: Arc<C>,
}

impl<P, C> CartUseCase<P, C>
where
    P: ProductRepository + Sync,
    C: CartRepository + Sync,
{
    pub fn new(products: Arc<P>, carts: Arc<C>) -> Self {
        Self { products, carts }
    }

    pub async fn view(&self, user_id: &UserId) -> StoreResult<Vec<CartItem>> {
        self.carts.list(user_id).await
    }

    /// Add one unit of a product. Unknown product ids are rejected before
    /// any line is written.
    pub async fn add(&self, user_id: &UserId, product_id: &ProductId) -> StoreResult<Vec<CartItem>> {
        self.products
            .find_by_id(product_id)
            .await?
            .ok_or(StoreError::ProductNotFound)?;

        self.carts.add_line(user_id, product_id).await?;
        self.carts.list(user_id).await
    }

    /// Set a line's quantity; zero or below removes the line
    pub async fn update_quantity(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        quantity: i32,
    ) -> StoreResult<Vec<CartItem>> {
        let found = if quantity <= 0 {
            self.carts.remove_line(user_id, product_id).await?
        } else {
            self.carts.set_quantity(user_id, product_id, quantity).await?
        };

        if !found {
            return Err(StoreError::LineNotFound);
        }
        self.carts.list(user_id).await
    }

    /// Remove one line, or everything when no product id is given.
    /// Removing an absent line is a no-op success.
    pub async fn remove(
        &self,
        user_id: &UserId,
        product_id: Option<&ProductId>,
    ) -> StoreResult<Vec<CartItem>> {
        match product_id {
            Some(product_id) => {
                self.carts.remove_line(user_id, product_id).await?;
            }
            None => self.carts.clear(user_id).await?,
        }
        self.carts.list(user_id).await
    }

    pub async fn clear(&self, user_id: &UserId) -> StoreResult<()> {
        self.carts.clear(user_id).await
    }
}
