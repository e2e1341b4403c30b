use chrono::Utc;
use crate::actor_framework::Entity;
use crate::domain::{
    Order, OrderCreate, OrderId, OrderItem, OrderItemCreate, OrderItemId, OrderStatus,
    RestaurantId, UserId,
};
use super::actions::{OrderAction, OrderActionResult};

impl Entity for Order {
    type Id = OrderId;
    type CreatePayload = OrderCreate;
    type Action = OrderAction;
    type ActionResult = OrderActionResult;

    fn id(&self) -> &OrderId { &self.id }

    /// Every order starts `Pending`, with no driver.
    fn from_create(id: OrderId, payload: OrderCreate) -> Result<Self, String> {
        let now = Utc::now();
        Ok(Self {
            id,
            customer_id: Some(payload.customer_id),
            driver_id: None,
            restaurant_id: Some(payload.restaurant_id),
            items: payload.items,
            total: payload.total,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    fn handle_action(&mut self, action: OrderAction) -> Result<OrderActionResult, String> {
        match action {
            OrderAction::Claim { driver_id } => {
                if let Some(current) = self.driver_id {
                    return Ok(OrderActionResult::AlreadyTaken { driver_id: current });
                }
                self.driver_id = Some(driver_id);
                self.updated_at = Utc::now();
                Ok(OrderActionResult::Claimed(self.clone()))
            }
            OrderAction::SetStatus { expected, status } => {
                if self.status != expected {
                    return Ok(OrderActionResult::StatusChanged { current: self.status });
                }
                self.status = status;
                self.updated_at = Utc::now();
                Ok(OrderActionResult::StatusSet(self.clone()))
            }
        }
    }
}

impl Entity for OrderItem {
    type Id = OrderItemId;
    type CreatePayload = OrderItemCreate;
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &OrderItemId { &self.id }

    fn from_create(id: OrderItemId, payload: OrderItemCreate) -> Result<Self, String> {
        Ok(Self {
            id,
            dish_id: payload.dish_id,
            options: payload.options,
        })
    }

    /// Order items are append-only.
    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Err(format!("Order item {} is immutable", self.id))
    }
}

/// Selection criteria for listing orders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderCriteria {
    pub customer_id: Option<UserId>,
    pub driver_id: Option<UserId>,
    /// When set, only orders from these restaurants match.
    pub restaurant_ids: Option<Vec<RestaurantId>>,
    pub status: Option<OrderStatus>,
}

impl OrderCriteria {
    pub fn matches(&self, order: &Order) -> bool {
        if let Some(customer_id) = self.customer_id {
            if order.customer_id != Some(customer_id) {
                return false;
            }
        }
        if let Some(driver_id) = self.driver_id {
            if order.driver_id != Some(driver_id) {
                return false;
            }
        }
        if let Some(restaurant_ids) = &self.restaurant_ids {
            match order.restaurant_id {
                Some(id) if restaurant_ids.contains(&id) => {}
                _ => return false,
            }
        }
        if let Some(status) = self.status {
            if order.status != status {
                return false;
            }
        }
        true
    }
}
