use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use super::{DishId, RestaurantId, UserId};

pub type OrderId = u64;
pub type OrderItemId = u64;

/// Lifecycle of an order: Pending → Cooking → Cooked → PickedUp → Delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Cooking,
    Cooked,
    PickedUp,
    Delivered,
}

impl OrderStatus {
    #[cfg(test)]
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Cooking,
        OrderStatus::Cooked,
        OrderStatus::PickedUp,
        OrderStatus::Delivered,
    ];

    /// No transition leaves a terminal status.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Cooking => "Cooking",
            OrderStatus::Cooked => "Cooked",
            OrderStatus::PickedUp => "PickedUp",
            OrderStatus::Delivered => "Delivered",
        };
        f.write_str(name)
    }
}

/// Option/choice names picked by the customer for one dish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemOption {
    pub name: String,
    #[serde(default)]
    pub choice: String,
}

impl OrderItemOption {
    pub fn new(name: impl Into<String>, choice: impl Into<String>) -> Self {
        Self { name: name.into(), choice: choice.into() }
    }
}

/// One dish selection inside an order. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub dish_id: DishId,
    pub options: Vec<OrderItemOption>,
}

#[derive(Debug, Clone)]
pub struct OrderItemCreate {
    pub dish_id: DishId,
    pub options: Vec<OrderItemOption>,
}

/// A line of the cart submitted with `create_order`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub dish_id: DishId,
    #[serde(default)]
    pub options: Vec<OrderItemOption>,
}

impl CartItem {
    pub fn new(dish_id: DishId, options: Vec<OrderItemOption>) -> Self {
        Self { dish_id, options }
    }
}

/// Represents a customer order.
///
/// Relations are held by id. `customer_id`, `driver_id` and `restaurant_id`
/// are optional because the referenced record may have been removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: Option<UserId>,
    pub driver_id: Option<UserId>,
    pub restaurant_id: Option<RestaurantId>,
    pub items: Vec<OrderItem>,
    pub total: u64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a new order.
#[derive(Debug)]
pub struct OrderCreate {
    pub customer_id: UserId,
    pub restaurant_id: RestaurantId,
    pub items: Vec<OrderItem>,
    pub total: u64,
}
