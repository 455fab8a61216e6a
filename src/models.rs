use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::{
    AsChangeset, Selectable,
    prelude::{Identifiable, Insertable, Queryable},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::availability::{OpeningHours, OperationalStatus, resolve_status};

/// Restaurant approval states, admin-controlled and independent of the
/// operational (open/busy/closed) status.
pub const APPROVAL_PENDING: &str = "PENDING";
pub const APPROVAL_APPROVED: &str = "APPROVED";
pub const APPROVAL_REJECTED: &str = "REJECTED";

// Restaurants

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, ToSchema)]
#[diesel(table_name = crate::schema::restaurants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RestaurantEntity {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub opening_hours: Value,
    pub manual_status_override: String,
    pub approval_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RestaurantEntity {
    pub fn is_approved(&self) -> bool {
        self.approval_status == APPROVAL_APPROVED
    }

    /// Resolves the restaurant's operational status at the given local
    /// wall-clock instant. An unparseable schedule resolves to `Closed`.
    pub fn operational_status(&self, now: NaiveDateTime) -> OperationalStatus {
        let hours: OpeningHours =
            serde_json::from_value(self.opening_hours.clone()).unwrap_or_default();
        resolve_status(&hours, &self.manual_status_override, now)
    }
}

#[derive(Insertable, Deserialize, Debug)]
#[diesel(table_name = crate::schema::restaurants)]
pub struct CreateRestaurantEntity {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub opening_hours: Value,
    pub manual_status_override: String,
    pub approval_status: String,
}

#[derive(AsChangeset, Deserialize, Debug)]
#[diesel(table_name = crate::schema::restaurants)]
pub struct UpdateRestaurantEntity {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub opening_hours: Option<Value>,
}

// Menu items

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, ToSchema)]
#[diesel(table_name = crate::schema::menu_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MenuItemEntity {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub sizes: Value,
    pub available_quantity: i32,
    pub availability: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MenuItemEntity {
    pub fn size_options(&self) -> serde_json::Result<Vec<SizeOption>> {
        serde_json::from_value(self.sizes.clone())
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::menu_items)]
pub struct CreateMenuItemEntity {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub sizes: Value,
    pub available_quantity: i32,
    pub availability: bool,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = crate::schema::menu_items)]
pub struct UpdateMenuItemEntity {
    pub name: Option<String>,
    pub sizes: Option<Value>,
    pub available_quantity: Option<i32>,
    pub availability: Option<bool>,
}

/// One purchasable size of a menu item. `size` is unique within an item.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct SizeOption {
    pub size: String,
    pub price: f32,
}

// Carts

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, ToSchema)]
#[diesel(table_name = crate::schema::carts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CartEntity {
    pub id: i32,
    pub user_id: String,
    pub restaurant_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Serialize, Debug, Clone, ToSchema)]
#[diesel(belongs_to(CartEntity, foreign_key = cart_id))]
#[diesel(table_name = crate::schema::cart_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CartItemEntity {
    pub cart_id: i32,
    pub item_id: Uuid,
    pub size: String,
    pub name: String,
    pub quantity: i32,
    pub unit_price: f32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Deserialize, Debug)]
#[diesel(table_name = crate::schema::carts)]
pub struct CreateCartEntity {
    pub user_id: String,
    pub restaurant_id: Uuid,
}

#[derive(Insertable, Deserialize, Debug)]
#[diesel(table_name = crate::schema::cart_items)]
pub struct CreateCartItemEntity {
    pub cart_id: i32,
    pub item_id: Uuid,
    pub size: String,
    pub name: String,
    pub quantity: i32,
    pub unit_price: f32,
}

// Orders

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, ToSchema)]
#[diesel(table_name = crate::schema::orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderEntity {
    pub id: Uuid,
    pub user_id: String,
    pub user_name: String,
    pub restaurant_id: Uuid,
    pub restaurant_name: String,
    pub items: Value,
    pub total: f32,
    pub status: String,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderEntity {
    pub fn line_items(&self) -> serde_json::Result<Vec<OrderLineItem>> {
        serde_json::from_value(self.items.clone())
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::orders)]
pub struct CreateOrderEntity {
    pub id: Uuid,
    pub user_id: String,
    pub user_name: String,
    pub restaurant_id: Uuid,
    pub restaurant_name: String,
    pub items: Value,
    pub total: f32,
    pub status: String,
    pub payment_method: String,
}

/// One line of an order, snapshotted at placement. The stored order keeps
/// these in a JSONB column and they never change afterwards.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct OrderLineItem {
    pub item_id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub unit_price: f32,
    pub selected_size: String,
}
