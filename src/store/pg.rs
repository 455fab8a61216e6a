//! Postgres-backed [`OrderStore`].
//!
//! Conditional `UPDATE ... WHERE status = expected` statements provide the
//! compare-and-swap contract, and `GREATEST(available_quantity - n, 0)`
//! provides the clamped decrement, so no application-side locking is needed.

use anyhow::Context;
use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::sql_types::Integer;
use diesel::{ExpressionMethods, QueryDsl, QueryResult, SelectableHelper};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::core::aliases::{DbPool, DieselError};
use crate::domain::status::OrderStatus;
use crate::models::{CreateOrderEntity, MenuItemEntity, OrderEntity, RestaurantEntity};
use crate::schema::{carts, menu_items, orders};
use crate::store::{OrderStore, StatusUpdate, StoreError};

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn from_diesel(err: DieselError) -> StoreError {
    match err {
        DieselError::NotFound => StoreError::NotFound,
        DieselError::DatabaseError(diesel::result::DatabaseErrorKind::UniqueViolation, _) => {
            StoreError::AlreadyExists
        }
        err => StoreError::Io(err.into()),
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn get_order(&self, order_id: Uuid) -> Result<OrderEntity, StoreError> {
        let conn = &mut self
            .pool
            .get()
            .await
            .context("Failed to obtain a DB connection")?;

        orders::table
            .find(order_id)
            .get_result(conn)
            .await
            .map_err(from_diesel)
    }

    async fn put_order(&self, order: CreateOrderEntity) -> Result<OrderEntity, StoreError> {
        let conn = &mut self
            .pool
            .get()
            .await
            .context("Failed to obtain a DB connection")?;

        diesel::insert_into(orders::table)
            .values(order)
            .returning(OrderEntity::as_returning())
            .get_result(conn)
            .await
            .map_err(from_diesel)
    }

    async fn update_order_status(
        &self,
        order_id: Uuid,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> Result<StatusUpdate, StoreError> {
        let conn = &mut self
            .pool
            .get()
            .await
            .context("Failed to obtain a DB connection")?;

        let updated: QueryResult<OrderEntity> = diesel::update(
            orders::table
                .find(order_id)
                .filter(orders::status.eq(expected.as_str())),
        )
        .set((
            orders::status.eq(next.as_str()),
            orders::updated_at.eq(diesel::dsl::now),
        ))
        .returning(OrderEntity::as_returning())
        .get_result(conn)
        .await;

        match updated {
            Ok(order) => Ok(StatusUpdate::Applied(order)),
            // Zero rows matched: either the order is gone or its status
            // moved on under us. Re-read to tell the two apart.
            Err(DieselError::NotFound) => {
                let current: OrderEntity = orders::table
                    .find(order_id)
                    .get_result(conn)
                    .await
                    .map_err(from_diesel)?;
                let actual = OrderStatus::parse(&current.status).ok_or_else(|| {
                    StoreError::Io(anyhow::anyhow!(
                        "order {} has unknown status {:?}",
                        order_id,
                        current.status
                    ))
                })?;
                Ok(StatusUpdate::Conflict { actual })
            }
            Err(err) => Err(from_diesel(err)),
        }
    }

    async fn delete_order(&self, order_id: Uuid) -> Result<OrderEntity, StoreError> {
        let conn = &mut self
            .pool
            .get()
            .await
            .context("Failed to obtain a DB connection")?;

        diesel::delete(orders::table.find(order_id))
            .returning(OrderEntity::as_returning())
            .get_result(conn)
            .await
            .map_err(from_diesel)
    }

    async fn get_restaurant(&self, restaurant_id: Uuid) -> Result<RestaurantEntity, StoreError> {
        let conn = &mut self
            .pool
            .get()
            .await
            .context("Failed to obtain a DB connection")?;

        crate::schema::restaurants::table
            .find(restaurant_id)
            .get_result(conn)
            .await
            .map_err(from_diesel)
    }

    async fn get_menu_item(
        &self,
        restaurant_id: Uuid,
        item_id: Uuid,
    ) -> Result<MenuItemEntity, StoreError> {
        let conn = &mut self
            .pool
            .get()
            .await
            .context("Failed to obtain a DB connection")?;

        menu_items::table
            .find(item_id)
            .filter(menu_items::restaurant_id.eq(restaurant_id))
            .get_result(conn)
            .await
            .map_err(from_diesel)
    }

    async fn decrement_menu_item_quantity(
        &self,
        restaurant_id: Uuid,
        item_id: Uuid,
        amount: i32,
    ) -> Result<i32, StoreError> {
        let conn = &mut self
            .pool
            .get()
            .await
            .context("Failed to obtain a DB connection")?;

        diesel::update(
            menu_items::table
                .find(item_id)
                .filter(menu_items::restaurant_id.eq(restaurant_id)),
        )
        .set((
            menu_items::available_quantity.eq(sql::<Integer>("GREATEST(available_quantity - ")
                .bind::<Integer, _>(amount)
                .sql(", 0)")),
            menu_items::updated_at.eq(diesel::dsl::now),
        ))
        .returning(menu_items::available_quantity)
        .get_result(conn)
        .await
        .map_err(from_diesel)
    }

    async fn clear_cart(&self, user_id: &str, restaurant_id: Uuid) -> Result<(), StoreError> {
        let conn = &mut self
            .pool
            .get()
            .await
            .context("Failed to obtain a DB connection")?;

        // Cart items cascade with the cart row. Zero rows is fine: the
        // customer may have ordered without ever saving a cart.
        diesel::delete(
            carts::table
                .filter(carts::user_id.eq(user_id))
                .filter(carts::restaurant_id.eq(restaurant_id)),
        )
        .execute(conn)
        .await
        .map_err(from_diesel)?;

        Ok(())
    }
}
