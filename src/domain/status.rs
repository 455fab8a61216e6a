//! Order status state machine.
//!
//! The single authority on which status changes are legal and who may make
//! them. Every entry point (HTTP handlers, the lifecycle engine) goes through
//! [`can_transition`] rather than re-checking status strings ad hoc.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle states of an order. `Placed` is the sole initial state;
/// `PickedUp` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Placed,
    InKitchen,
    ReadyForPickup,
    PickedUp,
    Cancelled,
}

/// The forward pickup flow. An order advances one position at a time and
/// never skips a step.
const PICKUP_FLOW: [OrderStatus; 4] = [
    OrderStatus::Placed,
    OrderStatus::InKitchen,
    OrderStatus::ReadyForPickup,
    OrderStatus::PickedUp,
];

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "PLACED",
            OrderStatus::InKitchen => "IN_KITCHEN",
            OrderStatus::ReadyForPickup => "READY_FOR_PICKUP",
            OrderStatus::PickedUp => "PICKED_UP",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PLACED" => Some(OrderStatus::Placed),
            "IN_KITCHEN" => Some(OrderStatus::InKitchen),
            "READY_FOR_PICKUP" => Some(OrderStatus::ReadyForPickup),
            "PICKED_UP" => Some(OrderStatus::PickedUp),
            "CANCELLED" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// The immediate successor in the pickup flow, or `None` for the last
    /// step and for `Cancelled`.
    pub fn next(self) -> Option<Self> {
        let index = PICKUP_FLOW.iter().position(|s| *s == self)?;
        PICKUP_FLOW.get(index + 1).copied()
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::PickedUp | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roles supplied by the identity provider. The engine trusts the role for
/// authorization; it is never read from ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Customer,
    RestaurantOwner,
    RestaurantStaff,
    Admin,
}

impl Role {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "customer" => Some(Role::Customer),
            "restaurant-owner" => Some(Role::RestaurantOwner),
            "restaurant-staff" => Some(Role::RestaurantStaff),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::RestaurantOwner => "restaurant-owner",
            Role::RestaurantStaff => "restaurant-staff",
            Role::Admin => "admin",
        }
    }

    /// Owners, staff and admins share the restaurant-side permissions.
    pub fn is_restaurant_side(self) -> bool {
        matches!(
            self,
            Role::RestaurantOwner | Role::RestaurantStaff | Role::Admin
        )
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated caller, passed explicitly into every engine operation.
#[derive(Debug, Clone)]
pub struct ActingUser {
    pub id: String,
    pub name: String,
    pub role: Role,
}

/// Whether `from -> to` is an edge of the state machine for *some* role.
/// Used to distinguish a nonsensical request from a permission problem.
pub fn is_legal_edge(from: OrderStatus, to: OrderStatus) -> bool {
    if from.is_terminal() {
        return false;
    }
    to == OrderStatus::Cancelled || from.next() == Some(to)
}

/// Whether `role` may move an order from `from` to `to`.
///
/// Restaurant-side roles advance the pickup flow one step at a time and may
/// cancel from any non-terminal state. Customers may cancel only while the
/// order is still `Placed`, and may confirm pickup themselves once the order
/// is `ReadyForPickup`.
pub fn can_transition(from: OrderStatus, to: OrderStatus, role: Role) -> bool {
    if from.is_terminal() {
        return false;
    }
    if to == OrderStatus::Cancelled {
        return match role {
            Role::Customer => from == OrderStatus::Placed,
            _ => true,
        };
    }
    if role == Role::Customer {
        return from == OrderStatus::ReadyForPickup && to == OrderStatus::PickedUp;
    }
    from.next() == Some(to)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [OrderStatus; 5] = [
        OrderStatus::Placed,
        OrderStatus::InKitchen,
        OrderStatus::ReadyForPickup,
        OrderStatus::PickedUp,
        OrderStatus::Cancelled,
    ];

    #[test]
    fn pickup_flow_advances_one_step_at_a_time() {
        assert_eq!(OrderStatus::Placed.next(), Some(OrderStatus::InKitchen));
        assert_eq!(
            OrderStatus::InKitchen.next(),
            Some(OrderStatus::ReadyForPickup)
        );
        assert_eq!(
            OrderStatus::ReadyForPickup.next(),
            Some(OrderStatus::PickedUp)
        );
        assert_eq!(OrderStatus::PickedUp.next(), None);
        assert_eq!(OrderStatus::Cancelled.next(), None);
    }

    #[test]
    fn staff_advance_follows_only_forward_edges() {
        for from in ALL {
            for to in ALL {
                let allowed = can_transition(from, to, Role::RestaurantStaff);
                let expected = !from.is_terminal()
                    && (to == OrderStatus::Cancelled || from.next() == Some(to));
                assert_eq!(allowed, expected, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn no_skipping_steps() {
        assert!(!can_transition(
            OrderStatus::Placed,
            OrderStatus::ReadyForPickup,
            Role::RestaurantStaff
        ));
        assert!(!can_transition(
            OrderStatus::Placed,
            OrderStatus::PickedUp,
            Role::RestaurantOwner
        ));
        assert!(!can_transition(
            OrderStatus::InKitchen,
            OrderStatus::PickedUp,
            Role::Admin
        ));
    }

    #[test]
    fn no_moving_backwards() {
        assert!(!can_transition(
            OrderStatus::InKitchen,
            OrderStatus::Placed,
            Role::RestaurantStaff
        ));
        assert!(!can_transition(
            OrderStatus::PickedUp,
            OrderStatus::ReadyForPickup,
            Role::Admin
        ));
    }

    #[test]
    fn terminal_states_reject_everything() {
        for from in [OrderStatus::PickedUp, OrderStatus::Cancelled] {
            for to in ALL {
                for role in [
                    Role::Customer,
                    Role::RestaurantOwner,
                    Role::RestaurantStaff,
                    Role::Admin,
                ] {
                    assert!(!can_transition(from, to, role), "{from} -> {to} as {role}");
                }
            }
        }
    }

    #[test]
    fn customer_cancels_only_while_placed() {
        assert!(can_transition(
            OrderStatus::Placed,
            OrderStatus::Cancelled,
            Role::Customer
        ));
        assert!(!can_transition(
            OrderStatus::InKitchen,
            OrderStatus::Cancelled,
            Role::Customer
        ));
        assert!(!can_transition(
            OrderStatus::ReadyForPickup,
            OrderStatus::Cancelled,
            Role::Customer
        ));
    }

    #[test]
    fn staff_cancel_from_any_non_terminal_state() {
        for from in [
            OrderStatus::Placed,
            OrderStatus::InKitchen,
            OrderStatus::ReadyForPickup,
        ] {
            assert!(can_transition(from, OrderStatus::Cancelled, Role::RestaurantStaff));
            assert!(can_transition(from, OrderStatus::Cancelled, Role::RestaurantOwner));
        }
    }

    #[test]
    fn customer_confirms_pickup_but_cannot_advance_the_kitchen() {
        assert!(can_transition(
            OrderStatus::ReadyForPickup,
            OrderStatus::PickedUp,
            Role::Customer
        ));
        assert!(!can_transition(
            OrderStatus::Placed,
            OrderStatus::InKitchen,
            Role::Customer
        ));
        assert!(!can_transition(
            OrderStatus::InKitchen,
            OrderStatus::ReadyForPickup,
            Role::Customer
        ));
    }

    #[test]
    fn status_strings_round_trip() {
        for status in ALL {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("COOKING"), None);
    }
}
