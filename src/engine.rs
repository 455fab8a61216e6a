//! Order lifecycle engine.
//!
//! Owns every order mutation: placement (with its side-effect bundle),
//! status transitions, and deletion. All authorization and state-machine
//! checks live here; HTTP handlers only translate requests and map errors.
//! The engine re-reads persisted state before every mutation and writes
//! status through the store's compare-and-swap, so a caller can never apply
//! a transition on top of a state it has not seen.

use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::availability::OperationalStatus;
use crate::domain::status::{ActingUser, OrderStatus, Role, can_transition, is_legal_edge};
use crate::models::{CreateOrderEntity, OrderEntity, OrderLineItem};
use crate::store::{OrderStore, StatusUpdate, StoreError};

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("{0}")]
    Validation(String),

    #[error("order not found")]
    NotFound,

    #[error("an order in status {from} cannot be advanced")]
    InvalidTransition { from: OrderStatus },

    #[error("a {role} may not move an order from {from} to {to}")]
    TransitionNotAllowed {
        from: OrderStatus,
        to: OrderStatus,
        role: Role,
    },

    #[error("order status changed from {expected} to {actual} while this request was in flight")]
    StaleTransition {
        expected: OrderStatus,
        actual: OrderStatus,
    },

    #[error("you can only delete orders that are 'Placed' (current status: {status})")]
    DeleteNotAllowed { status: OrderStatus },

    #[error("the restaurant is not accepting orders right now ({status})")]
    RestaurantNotAvailable { status: OperationalStatus },

    #[error("not enough stock for {item_name}: {remaining} remaining")]
    InsufficientStock { item_name: String, remaining: i32 },

    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One requested line of a new order. The unit price is resolved
/// server-side from the menu item's size entry, never taken from the caller.
#[derive(Deserialize, Debug, Clone, ToSchema)]
pub struct PlaceOrderItem {
    pub item_id: Uuid,
    pub quantity: i32,
    pub selected_size: String,
}

#[derive(Debug, Clone)]
pub struct PlaceOrderRequest {
    /// Client-supplied order id; checkout flows mint it before confirmation.
    pub order_id: Uuid,
    pub restaurant_id: Uuid,
    pub payment_method: String,
    pub items: Vec<PlaceOrderItem>,
}

pub struct OrderEngine<S> {
    store: S,
}

impl<S: OrderStore> OrderEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Places a new order for `acting` (a customer).
    ///
    /// Preconditions: a non-empty item list, an approved restaurant that
    /// resolves to `Open` at `now`, and sufficient stock for every line.
    /// Side effects apply as a bundle: the order is written in `Placed`,
    /// each item's stock is decremented (floored at zero), and the
    /// customer's cart for the restaurant is cleared. If a stock write
    /// fails after the order exists, the order is cancelled automatically
    /// before the error surfaces.
    pub async fn place_order(
        &self,
        acting: &ActingUser,
        req: PlaceOrderRequest,
        now: NaiveDateTime,
    ) -> Result<OrderEntity, OrderError> {
        if acting.role != Role::Customer {
            return Err(OrderError::Forbidden(
                "only customers can place orders".to_string(),
            ));
        }
        if req.items.is_empty() {
            return Err(OrderError::Validation(
                "an order must contain at least one item".to_string(),
            ));
        }
        if req.payment_method.is_empty() {
            return Err(OrderError::Validation(
                "a payment method is required".to_string(),
            ));
        }
        for item in &req.items {
            if item.quantity < 1 {
                return Err(OrderError::Validation(format!(
                    "invalid quantity {} for item {}",
                    item.quantity, item.item_id
                )));
            }
        }

        let restaurant = match self.store.get_restaurant(req.restaurant_id).await {
            Ok(restaurant) => restaurant,
            Err(StoreError::NotFound) => return Err(OrderError::NotFound),
            Err(err) => return Err(err.into()),
        };
        // An unapproved restaurant is never offered to customers, so it is
        // reported the same way as a closed one.
        if !restaurant.is_approved() {
            return Err(OrderError::RestaurantNotAvailable {
                status: OperationalStatus::Closed,
            });
        }
        let status = restaurant.operational_status(now);
        if status != OperationalStatus::Open {
            return Err(OrderError::RestaurantNotAvailable { status });
        }

        // Resolve every line against the live menu before writing anything,
        // so a rejection leaves inventory untouched.
        let mut line_items = Vec::with_capacity(req.items.len());
        let mut total = 0.0f32;
        for item in &req.items {
            let menu_item = match self.store.get_menu_item(req.restaurant_id, item.item_id).await {
                Ok(menu_item) => menu_item,
                Err(StoreError::NotFound) => {
                    return Err(OrderError::Validation(format!(
                        "menu item {} does not exist",
                        item.item_id
                    )));
                }
                Err(err) => return Err(err.into()),
            };
            if !menu_item.availability {
                return Err(OrderError::Validation(format!(
                    "{} is currently unavailable",
                    menu_item.name
                )));
            }
            let sizes = menu_item
                .size_options()
                .map_err(|err| StoreError::Io(err.into()))?;
            let Some(size) = sizes.iter().find(|s| s.size == item.selected_size) else {
                return Err(OrderError::Validation(format!(
                    "{} has no size {:?}",
                    menu_item.name, item.selected_size
                )));
            };
            if item.quantity > menu_item.available_quantity {
                return Err(OrderError::InsufficientStock {
                    item_name: menu_item.name,
                    remaining: menu_item.available_quantity,
                });
            }
            total += item.quantity as f32 * size.price;
            line_items.push(OrderLineItem {
                item_id: menu_item.id,
                name: menu_item.name,
                quantity: item.quantity,
                unit_price: size.price,
                selected_size: size.size.clone(),
            });
        }

        let items =
            serde_json::to_value(&line_items).map_err(|err| StoreError::Io(err.into()))?;
        let order = match self
            .store
            .put_order(CreateOrderEntity {
                id: req.order_id,
                user_id: acting.id.clone(),
                user_name: acting.name.clone(),
                restaurant_id: restaurant.id,
                restaurant_name: restaurant.name.clone(),
                items,
                total,
                status: OrderStatus::Placed.as_str().to_string(),
                payment_method: req.payment_method,
            })
            .await
        {
            Ok(order) => order,
            Err(StoreError::AlreadyExists) => {
                return Err(OrderError::Validation(format!(
                    "an order with id {} already exists",
                    req.order_id
                )));
            }
            Err(err) => return Err(err.into()),
        };

        for line in &line_items {
            if let Err(err) = self
                .store
                .decrement_menu_item_quantity(restaurant.id, line.item_id, line.quantity)
                .await
            {
                // Compensating action: the order must not stand with
                // unapplied deductions.
                tracing::error!(
                    order_id = %order.id,
                    item_id = %line.item_id,
                    "stock deduction failed, cancelling order: {err}"
                );
                if let Err(cancel_err) = self
                    .store
                    .update_order_status(order.id, OrderStatus::Placed, OrderStatus::Cancelled)
                    .await
                {
                    tracing::error!(
                        order_id = %order.id,
                        "failed to cancel order after deduction failure: {cancel_err}"
                    );
                }
                return Err(err.into());
            }
        }

        self.store.clear_cart(&acting.id, restaurant.id).await?;

        Ok(order)
    }

    /// Moves an order to `requested`, validating the edge and the caller's
    /// role against the freshly-read current status. Advancing the kitchen
    /// flow, cancelling, and a customer's pickup confirmation all go through
    /// here. A concurrent writer surfaces as `StaleTransition`.
    pub async fn transition_order(
        &self,
        acting: &ActingUser,
        order_id: Uuid,
        requested: OrderStatus,
    ) -> Result<OrderEntity, OrderError> {
        let order = self.read_order_for(acting, order_id).await?;
        let current = parse_status(&order)?;

        if !can_transition(current, requested, acting.role) {
            if is_legal_edge(current, requested) {
                return Err(OrderError::TransitionNotAllowed {
                    from: current,
                    to: requested,
                    role: acting.role,
                });
            }
            return Err(OrderError::InvalidTransition { from: current });
        }

        match self
            .store
            .update_order_status(order_id, current, requested)
            .await?
        {
            StatusUpdate::Applied(order) => Ok(order),
            StatusUpdate::Conflict { actual } => Err(OrderError::StaleTransition {
                expected: current,
                actual,
            }),
        }
    }

    /// Hard-deletes an unconfirmed order. Only the ordering customer may
    /// delete, and only while the order is still `Placed`.
    pub async fn delete_order(
        &self,
        acting: &ActingUser,
        order_id: Uuid,
    ) -> Result<OrderEntity, OrderError> {
        if acting.role != Role::Customer {
            return Err(OrderError::Forbidden(
                "only the ordering customer may delete an order".to_string(),
            ));
        }
        let order = self.read_order_for(acting, order_id).await?;
        let current = parse_status(&order)?;
        if current != OrderStatus::Placed {
            return Err(OrderError::DeleteNotAllowed { status: current });
        }
        match self.store.delete_order(order_id).await {
            Ok(order) => Ok(order),
            Err(StoreError::NotFound) => Err(OrderError::NotFound),
            Err(err) => Err(err.into()),
        }
    }

    /// Reads an order, hiding other customers' orders from a customer.
    async fn read_order_for(
        &self,
        acting: &ActingUser,
        order_id: Uuid,
    ) -> Result<OrderEntity, OrderError> {
        let order = match self.store.get_order(order_id).await {
            Ok(order) => order,
            Err(StoreError::NotFound) => return Err(OrderError::NotFound),
            Err(err) => return Err(err.into()),
        };
        if acting.role == Role::Customer && order.user_id != acting.id {
            return Err(OrderError::NotFound);
        }
        Ok(order)
    }
}

fn parse_status(order: &OrderEntity) -> Result<OrderStatus, OrderError> {
    OrderStatus::parse(&order.status).ok_or_else(|| {
        OrderError::Store(StoreError::Io(anyhow::anyhow!(
            "order {} has unknown status {:?}",
            order.id,
            order.status
        )))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::domain::availability::{DaySchedule, OpeningHours};
    use crate::models::{MenuItemEntity, RestaurantEntity, SizeOption};
    use crate::store::memory::MemoryStore;

    fn customer() -> ActingUser {
        ActingUser {
            id: "user-1".to_string(),
            name: "Alex".to_string(),
            role: Role::Customer,
        }
    }

    fn staff() -> ActingUser {
        ActingUser {
            id: "staff-1".to_string(),
            name: "Sam".to_string(),
            role: Role::RestaurantStaff,
        }
    }

    fn monday_at(hour: u32, minute: u32) -> NaiveDateTime {
        // 2025-07-07 is a Monday.
        NaiveDate::from_ymd_opt(2025, 7, 7)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    struct Setup {
        store: MemoryStore,
        engine: OrderEngine<MemoryStore>,
        restaurant: RestaurantEntity,
        item: MenuItemEntity,
    }

    fn setup(manual_override: &str, approval: &str, stock: i32) -> Setup {
        let store = MemoryStore::new();
        let restaurant = store.insert_restaurant(&OpeningHours::new(), manual_override, approval);
        let item = store.insert_menu_item(
            restaurant.id,
            "Pad Thai",
            &[
                SizeOption {
                    size: "M".to_string(),
                    price: 6.5,
                },
                SizeOption {
                    size: "L".to_string(),
                    price: 8.0,
                },
            ],
            stock,
            true,
        );
        let engine = OrderEngine::new(store.clone());
        Setup {
            store,
            engine,
            restaurant,
            item,
        }
    }

    fn order_request(setup: &Setup, quantity: i32, size: &str) -> PlaceOrderRequest {
        PlaceOrderRequest {
            order_id: Uuid::new_v4(),
            restaurant_id: setup.restaurant.id,
            payment_method: "in-store".to_string(),
            items: vec![PlaceOrderItem {
                item_id: setup.item.id,
                quantity,
                selected_size: size.to_string(),
            }],
        }
    }

    async fn placed(setup: &Setup) -> OrderEntity {
        setup
            .engine
            .place_order(&customer(), order_request(setup, 1, "M"), monday_at(12, 0))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn placement_applies_the_full_side_effect_bundle() {
        let s = setup("open", "APPROVED", 2);
        s.store.insert_cart("user-1", s.restaurant.id);

        let order = s
            .engine
            .place_order(&customer(), order_request(&s, 2, "M"), monday_at(12, 0))
            .await
            .unwrap();

        assert_eq!(order.status, "PLACED");
        assert_eq!(order.total, 13.0);
        assert_eq!(order.restaurant_name, s.restaurant.name);
        let lines = order.line_items().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[0].unit_price, 6.5);
        assert_eq!(
            s.store.menu_item_quantity(s.restaurant.id, s.item.id),
            Some(0)
        );
        assert!(!s.store.has_cart("user-1", s.restaurant.id));
    }

    #[tokio::test]
    async fn insufficient_stock_rejects_without_touching_inventory() {
        let s = setup("open", "APPROVED", 1);

        let err = s
            .engine
            .place_order(&customer(), order_request(&s, 2, "M"), monday_at(12, 0))
            .await
            .unwrap_err();

        match err {
            OrderError::InsufficientStock {
                item_name,
                remaining,
            } => {
                assert_eq!(item_name, "Pad Thai");
                assert_eq!(remaining, 1);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
        assert_eq!(
            s.store.menu_item_quantity(s.restaurant.id, s.item.id),
            Some(1)
        );
        assert_eq!(s.store.order_count(), 0);
    }

    #[tokio::test]
    async fn placement_requires_an_open_restaurant() {
        for manual_override in ["busy", "closed"] {
            let s = setup(manual_override, "APPROVED", 5);
            let err = s
                .engine
                .place_order(&customer(), order_request(&s, 1, "M"), monday_at(12, 0))
                .await
                .unwrap_err();
            assert!(
                matches!(err, OrderError::RestaurantNotAvailable { .. }),
                "{manual_override}: got {err:?}"
            );
            assert_eq!(s.store.order_count(), 0);
        }
    }

    #[tokio::test]
    async fn placement_honors_the_weekly_schedule() {
        let store = MemoryStore::new();
        let mut hours = OpeningHours::new();
        hours.insert(
            "monday".to_string(),
            DaySchedule {
                enabled: true,
                open: "09:00".to_string(),
                close: "17:00".to_string(),
            },
        );
        let restaurant = store.insert_restaurant(&hours, "auto", "APPROVED");
        let item = store.insert_menu_item(
            restaurant.id,
            "Soup",
            &[SizeOption {
                size: "M".to_string(),
                price: 4.0,
            }],
            5,
            true,
        );
        let engine = OrderEngine::new(store.clone());
        let req = |id: Uuid| PlaceOrderRequest {
            order_id: id,
            restaurant_id: restaurant.id,
            payment_method: "card-gateway".to_string(),
            items: vec![PlaceOrderItem {
                item_id: item.id,
                quantity: 1,
                selected_size: "M".to_string(),
            }],
        };

        engine
            .place_order(&customer(), req(Uuid::new_v4()), monday_at(10, 0))
            .await
            .unwrap();

        let err = engine
            .place_order(&customer(), req(Uuid::new_v4()), monday_at(18, 0))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OrderError::RestaurantNotAvailable {
                status: OperationalStatus::Closed
            }
        ));
    }

    #[tokio::test]
    async fn unapproved_restaurants_never_accept_orders() {
        // Manual override says open, but approval is still pending.
        let s = setup("open", "PENDING", 5);
        let err = s
            .engine
            .place_order(&customer(), order_request(&s, 1, "M"), monday_at(12, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::RestaurantNotAvailable { .. }));
    }

    #[tokio::test]
    async fn placement_validates_the_request_shape() {
        let s = setup("open", "APPROVED", 5);

        let empty = PlaceOrderRequest {
            items: vec![],
            ..order_request(&s, 1, "M")
        };
        assert!(matches!(
            s.engine
                .place_order(&customer(), empty, monday_at(12, 0))
                .await,
            Err(OrderError::Validation(_))
        ));

        assert!(matches!(
            s.engine
                .place_order(&customer(), order_request(&s, 0, "M"), monday_at(12, 0))
                .await,
            Err(OrderError::Validation(_))
        ));

        assert!(matches!(
            s.engine
                .place_order(&customer(), order_request(&s, 1, "XL"), monday_at(12, 0))
                .await,
            Err(OrderError::Validation(_))
        ));

        assert!(matches!(
            s.engine
                .place_order(&staff(), order_request(&s, 1, "M"), monday_at(12, 0))
                .await,
            Err(OrderError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn kitchen_flow_advances_step_by_step() {
        let s = setup("open", "APPROVED", 5);
        let order = placed(&s).await;

        let order = s
            .engine
            .transition_order(&staff(), order.id, OrderStatus::InKitchen)
            .await
            .unwrap();
        assert_eq!(order.status, "IN_KITCHEN");

        let order = s
            .engine
            .transition_order(&staff(), order.id, OrderStatus::ReadyForPickup)
            .await
            .unwrap();
        assert_eq!(order.status, "READY_FOR_PICKUP");

        // The customer confirms pickup themselves.
        let order = s
            .engine
            .transition_order(&customer(), order.id, OrderStatus::PickedUp)
            .await
            .unwrap();
        assert_eq!(order.status, "PICKED_UP");
    }

    #[tokio::test]
    async fn skipping_a_step_is_rejected() {
        let s = setup("open", "APPROVED", 5);
        let order = placed(&s).await;

        let err = s
            .engine
            .transition_order(&staff(), order.id, OrderStatus::ReadyForPickup)
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn terminal_orders_cannot_move() {
        let s = setup("open", "APPROVED", 5);
        let order = placed(&s).await;
        s.engine
            .transition_order(&staff(), order.id, OrderStatus::Cancelled)
            .await
            .unwrap();

        let err = s
            .engine
            .transition_order(&staff(), order.id, OrderStatus::InKitchen)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OrderError::InvalidTransition {
                from: OrderStatus::Cancelled
            }
        ));
    }

    #[tokio::test]
    async fn customer_cancel_is_limited_to_placed() {
        let s = setup("open", "APPROVED", 5);
        let order = placed(&s).await;

        s.engine
            .transition_order(&staff(), order.id, OrderStatus::InKitchen)
            .await
            .unwrap();

        let err = s
            .engine
            .transition_order(&customer(), order.id, OrderStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::TransitionNotAllowed { .. }));

        // Staff may still cancel mid-preparation.
        let order = s
            .engine
            .transition_order(&staff(), order.id, OrderStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(order.status, "CANCELLED");
    }

    #[tokio::test]
    async fn cancellation_does_not_restore_inventory() {
        let s = setup("open", "APPROVED", 3);
        let order = s
            .engine
            .place_order(&customer(), order_request(&s, 2, "M"), monday_at(12, 0))
            .await
            .unwrap();
        assert_eq!(
            s.store.menu_item_quantity(s.restaurant.id, s.item.id),
            Some(1)
        );

        s.engine
            .transition_order(&customer(), order.id, OrderStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(
            s.store.menu_item_quantity(s.restaurant.id, s.item.id),
            Some(1)
        );
    }

    #[tokio::test]
    async fn customer_cannot_drive_the_kitchen() {
        let s = setup("open", "APPROVED", 5);
        let order = placed(&s).await;

        let err = s
            .engine
            .transition_order(&customer(), order.id, OrderStatus::InKitchen)
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::TransitionNotAllowed { .. }));
    }

    #[tokio::test]
    async fn customers_cannot_see_or_move_others_orders() {
        let s = setup("open", "APPROVED", 5);
        let order = placed(&s).await;

        let other = ActingUser {
            id: "user-2".to_string(),
            name: "Robin".to_string(),
            role: Role::Customer,
        };
        let err = s
            .engine
            .transition_order(&other, order.id, OrderStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::NotFound));
    }

    #[tokio::test]
    async fn delete_is_placed_only_and_customer_only() {
        let s = setup("open", "APPROVED", 5);
        let order = placed(&s).await;

        assert!(matches!(
            s.engine.delete_order(&staff(), order.id).await,
            Err(OrderError::Forbidden(_))
        ));

        s.engine.delete_order(&customer(), order.id).await.unwrap();
        assert_eq!(s.store.order_count(), 0);

        let order = placed(&s).await;
        s.engine
            .transition_order(&staff(), order.id, OrderStatus::InKitchen)
            .await
            .unwrap();
        let err = s
            .engine
            .delete_order(&customer(), order.id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OrderError::DeleteNotAllowed {
                status: OrderStatus::InKitchen
            }
        ));
    }

    /// Delegates to a real store but serves a stale snapshot on reads,
    /// simulating a concurrent writer landing between read and write.
    struct StaleReadStore {
        inner: MemoryStore,
        stale_status: OrderStatus,
    }

    #[async_trait]
    impl OrderStore for StaleReadStore {
        async fn get_order(&self, order_id: Uuid) -> Result<OrderEntity, StoreError> {
            let mut order = self.inner.get_order(order_id).await?;
            order.status = self.stale_status.as_str().to_string();
            Ok(order)
        }

        async fn put_order(
            &self,
            order: crate::models::CreateOrderEntity,
        ) -> Result<OrderEntity, StoreError> {
            self.inner.put_order(order).await
        }

        async fn update_order_status(
            &self,
            order_id: Uuid,
            expected: OrderStatus,
            next: OrderStatus,
        ) -> Result<StatusUpdate, StoreError> {
            self.inner.update_order_status(order_id, expected, next).await
        }

        async fn delete_order(&self, order_id: Uuid) -> Result<OrderEntity, StoreError> {
            self.inner.delete_order(order_id).await
        }

        async fn get_restaurant(
            &self,
            restaurant_id: Uuid,
        ) -> Result<RestaurantEntity, StoreError> {
            self.inner.get_restaurant(restaurant_id).await
        }

        async fn get_menu_item(
            &self,
            restaurant_id: Uuid,
            item_id: Uuid,
        ) -> Result<MenuItemEntity, StoreError> {
            self.inner.get_menu_item(restaurant_id, item_id).await
        }

        async fn decrement_menu_item_quantity(
            &self,
            restaurant_id: Uuid,
            item_id: Uuid,
            amount: i32,
        ) -> Result<i32, StoreError> {
            self.inner
                .decrement_menu_item_quantity(restaurant_id, item_id, amount)
                .await
        }

        async fn clear_cart(&self, user_id: &str, restaurant_id: Uuid) -> Result<(), StoreError> {
            self.inner.clear_cart(user_id, restaurant_id).await
        }
    }

    #[tokio::test]
    async fn concurrent_advance_loses_with_stale_transition() {
        let s = setup("open", "APPROVED", 5);
        let order = placed(&s).await;

        // First caller wins the race.
        s.engine
            .transition_order(&staff(), order.id, OrderStatus::InKitchen)
            .await
            .unwrap();

        // Second caller read `Placed` before the first write landed; its
        // conditional write must fail, not double-apply.
        let stale_engine = OrderEngine::new(StaleReadStore {
            inner: s.store.clone(),
            stale_status: OrderStatus::Placed,
        });
        let err = stale_engine
            .transition_order(&staff(), order.id, OrderStatus::InKitchen)
            .await
            .unwrap_err();
        match err {
            OrderError::StaleTransition { expected, actual } => {
                assert_eq!(expected, OrderStatus::Placed);
                assert_eq!(actual, OrderStatus::InKitchen);
            }
            other => panic!("expected StaleTransition, got {other:?}"),
        }
    }
}
