//! In-memory [`OrderStore`] used by the engine's unit tests.
//!
//! Mirrors the conditional-write semantics of the Postgres store (CAS on
//! status, clamped decrement) over a mutex-guarded map, so the engine can be
//! exercised without a database.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::availability::OpeningHours;
use crate::domain::status::OrderStatus;
use crate::models::{
    CreateOrderEntity, MenuItemEntity, OrderEntity, RestaurantEntity, SizeOption,
};
use crate::store::{OrderStore, StatusUpdate, StoreError};

#[derive(Default)]
struct Inner {
    orders: HashMap<Uuid, OrderEntity>,
    restaurants: HashMap<Uuid, RestaurantEntity>,
    menu_items: HashMap<(Uuid, Uuid), MenuItemEntity>,
    carts: HashSet<(String, Uuid)>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_restaurant(
        &self,
        opening_hours: &OpeningHours,
        manual_status_override: &str,
        approval_status: &str,
    ) -> RestaurantEntity {
        let now = Utc::now();
        let restaurant = RestaurantEntity {
            id: Uuid::new_v4(),
            owner_id: "owner-1".to_string(),
            name: "Test Kitchen".to_string(),
            phone: "555-0100".to_string(),
            address: "1 Campus Way".to_string(),
            opening_hours: serde_json::to_value(opening_hours).expect("serializable hours"),
            manual_status_override: manual_status_override.to_string(),
            approval_status: approval_status.to_string(),
            created_at: now,
            updated_at: now,
        };
        let mut inner = self.inner.lock().unwrap();
        inner.restaurants.insert(restaurant.id, restaurant.clone());
        restaurant
    }

    pub fn insert_menu_item(
        &self,
        restaurant_id: Uuid,
        name: &str,
        sizes: &[SizeOption],
        available_quantity: i32,
        availability: bool,
    ) -> MenuItemEntity {
        let now = Utc::now();
        let item = MenuItemEntity {
            id: Uuid::new_v4(),
            restaurant_id,
            name: name.to_string(),
            sizes: serde_json::to_value(sizes).expect("serializable sizes"),
            available_quantity,
            availability,
            created_at: now,
            updated_at: now,
        };
        let mut inner = self.inner.lock().unwrap();
        inner.menu_items.insert((restaurant_id, item.id), item.clone());
        item
    }

    pub fn insert_cart(&self, user_id: &str, restaurant_id: Uuid) {
        let mut inner = self.inner.lock().unwrap();
        inner.carts.insert((user_id.to_string(), restaurant_id));
    }

    pub fn has_cart(&self, user_id: &str, restaurant_id: Uuid) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.carts.contains(&(user_id.to_string(), restaurant_id))
    }

    pub fn menu_item_quantity(&self, restaurant_id: Uuid, item_id: Uuid) -> Option<i32> {
        let inner = self.inner.lock().unwrap();
        inner
            .menu_items
            .get(&(restaurant_id, item_id))
            .map(|item| item.available_quantity)
    }

    pub fn order_count(&self) -> usize {
        self.inner.lock().unwrap().orders.len()
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn get_order(&self, order_id: Uuid) -> Result<OrderEntity, StoreError> {
        let inner = self.inner.lock().unwrap();
        inner.orders.get(&order_id).cloned().ok_or(StoreError::NotFound)
    }

    async fn put_order(&self, order: CreateOrderEntity) -> Result<OrderEntity, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.orders.contains_key(&order.id) {
            return Err(StoreError::AlreadyExists);
        }
        let now = Utc::now();
        let entity = OrderEntity {
            id: order.id,
            user_id: order.user_id,
            user_name: order.user_name,
            restaurant_id: order.restaurant_id,
            restaurant_name: order.restaurant_name,
            items: order.items,
            total: order.total,
            status: order.status,
            payment_method: order.payment_method,
            created_at: now,
            updated_at: now,
        };
        inner.orders.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn update_order_status(
        &self,
        order_id: Uuid,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> Result<StatusUpdate, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let order = inner.orders.get_mut(&order_id).ok_or(StoreError::NotFound)?;
        if order.status != expected.as_str() {
            let actual = OrderStatus::parse(&order.status).ok_or_else(|| {
                StoreError::Io(anyhow::anyhow!(
                    "order {} has unknown status {:?}",
                    order_id,
                    order.status
                ))
            })?;
            return Ok(StatusUpdate::Conflict { actual });
        }
        order.status = next.as_str().to_string();
        order.updated_at = Utc::now();
        Ok(StatusUpdate::Applied(order.clone()))
    }

    async fn delete_order(&self, order_id: Uuid) -> Result<OrderEntity, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.orders.remove(&order_id).ok_or(StoreError::NotFound)
    }

    async fn get_restaurant(&self, restaurant_id: Uuid) -> Result<RestaurantEntity, StoreError> {
        let inner = self.inner.lock().unwrap();
        inner
            .restaurants
            .get(&restaurant_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_menu_item(
        &self,
        restaurant_id: Uuid,
        item_id: Uuid,
    ) -> Result<MenuItemEntity, StoreError> {
        let inner = self.inner.lock().unwrap();
        inner
            .menu_items
            .get(&(restaurant_id, item_id))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn decrement_menu_item_quantity(
        &self,
        restaurant_id: Uuid,
        item_id: Uuid,
        amount: i32,
    ) -> Result<i32, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let item = inner
            .menu_items
            .get_mut(&(restaurant_id, item_id))
            .ok_or(StoreError::NotFound)?;
        item.available_quantity = (item.available_quantity - amount).max(0);
        item.updated_at = Utc::now();
        Ok(item.available_quantity)
    }

    async fn clear_cart(&self, user_id: &str, restaurant_id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.carts.remove(&(user_id.to_string(), restaurant_id));
        Ok(())
    }
}
