//! Who may see an order, and which statuses each role may set.

use crate::domain::{CallerIdentity, Order, OrderStatus, UserId, UserRole};

/// Visibility rule.
///
/// `owner_id` is the owner of the order's restaurant, looked up by the caller
/// of this function; `None` when the restaurant no longer exists.
pub fn can_see_order(caller: &CallerIdentity, order: &Order, owner_id: Option<UserId>) -> bool {
    match caller.role {
        UserRole::Client => order.customer_id == Some(caller.id),
        UserRole::Delivery => order.driver_id == Some(caller.id),
        UserRole::Owner => owner_id == Some(caller.id),
    }
}

/// Role-transition table.
pub fn allowed_statuses(role: UserRole) -> &'static [OrderStatus] {
    match role {
        UserRole::Client => &[],
        UserRole::Owner => &[OrderStatus::Cooking, OrderStatus::Cooked],
        UserRole::Delivery => &[OrderStatus::PickedUp, OrderStatus::Delivered],
    }
}

/// Whether `role` may move an order currently in `current` to `target`.
///
/// Only the target is checked against the table; the current status matters
/// only when it is terminal.
// TODO: reject targets that skip a status (Pending -> Cooked today passes).
pub fn can_set_status(role: UserRole, current: OrderStatus, target: OrderStatus) -> bool {
    !current.is_terminal() && allowed_statuses(role).contains(&target)
}
