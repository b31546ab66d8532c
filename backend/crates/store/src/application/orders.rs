//! Order Use Cases

use std::sync::Arc;

use kernel::id::{OrderId, UserId};

use crate::domain::entity::order::Order;
use crate::domain::repository::OrderRepository;
use crate::error::{StoreError, StoreResult};

pub struct OrdersUseCase<O>
where
    O: OrderRepository,
{
    orders: Arc<O>,
}

impl<O> OrdersUseCase<O>
where
    O: OrderRepository + Sync,
{
    pub fn new(orders: Arc<O>) -> Self {
        Self { orders }
    }

    /// Order history, newest first
    pub async fn list_for_user(&self, user_id: &UserId) -> StoreResult<Vec<Order>> {
        self.orders.list_for_user(user_id).await
    }

    /// One order, scoped to its owner. Another user's order id is
    /// indistinguishable from an unknown one.
    pub async fn get(&self, user_id: &UserId, order_id: &OrderId) -> StoreResult<Order> {
        self.orders
            .find_for_user(user_id, order_id)
            .await?
            .ok_or(StoreError::OrderNotFound)
    }
}
