//! Persistence port for the order lifecycle engine.
//!
//! The engine talks to storage through [`OrderStore`] only. Each operation is
//! atomic on its own document; the engine composes them with a compensating
//! action instead of relying on cross-document transactions, so the port can
//! be backed by any store with per-record conditional writes.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::status::OrderStatus;
use crate::models::{CreateOrderEntity, MenuItemEntity, OrderEntity, RestaurantEntity};

pub mod memory;
pub mod pg;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("record already exists")]
    AlreadyExists,
    #[error(transparent)]
    Io(#[from] anyhow::Error),
}

/// Outcome of a conditional status write.
#[derive(Debug)]
pub enum StatusUpdate {
    Applied(OrderEntity),
    /// The row existed but its status no longer matched the expected value.
    Conflict { actual: OrderStatus },
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn get_order(&self, order_id: Uuid) -> Result<OrderEntity, StoreError>;

    async fn put_order(&self, order: CreateOrderEntity) -> Result<OrderEntity, StoreError>;

    /// Compare-and-swap on the order's status: the write applies only if the
    /// persisted status still equals `expected`.
    async fn update_order_status(
        &self,
        order_id: Uuid,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> Result<StatusUpdate, StoreError>;

    async fn delete_order(&self, order_id: Uuid) -> Result<OrderEntity, StoreError>;

    async fn get_restaurant(&self, restaurant_id: Uuid) -> Result<RestaurantEntity, StoreError>;

    async fn get_menu_item(
        &self,
        restaurant_id: Uuid,
        item_id: Uuid,
    ) -> Result<MenuItemEntity, StoreError>;

    /// Atomically decrements the item's available quantity, floored at zero.
    /// Returns the quantity remaining after the write.
    async fn decrement_menu_item_quantity(
        &self,
        restaurant_id: Uuid,
        item_id: Uuid,
        amount: i32,
    ) -> Result<i32, StoreError>;

    /// Drops the user's open cart for the restaurant, if any.
    async fn clear_cart(&self, user_id: &str, restaurant_id: Uuid) -> Result<(), StoreError>;
}
