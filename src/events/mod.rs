//! In-process publish/subscribe for order lifecycle events.

pub mod bus;
pub mod filter;

pub use bus::*;
pub use filter::*;

use serde::Serialize;
use std::fmt;
use crate::domain::{Order, UserId};

/// Named channel on the event bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Topic {
    NewPendingOrder,
    NewCookedOrder,
    NewOrderUpdate,
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Topic::NewPendingOrder => "NewPendingOrder",
            Topic::NewCookedOrder => "NewCookedOrder",
            Topic::NewOrderUpdate => "NewOrderUpdate",
        };
        f.write_str(name)
    }
}

/// Payloads published by the order lifecycle manager.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "topic", content = "payload")]
pub enum OrderEvent {
    /// A customer placed an order; meant for the restaurant owner.
    NewPendingOrder { order: Order, owner_id: UserId },
    /// The kitchen finished an order; meant for drivers.
    NewCookedOrder { order: Order },
    /// Any change to an order; meant for its customer, driver and owner.
    NewOrderUpdate { order: Order, owner_id: Option<UserId> },
}

impl OrderEvent {
    pub fn topic(&self) -> Topic {
        match self {
            OrderEvent::NewPendingOrder { .. } => Topic::NewPendingOrder,
            OrderEvent::NewCookedOrder { .. } => Topic::NewCookedOrder,
            OrderEvent::NewOrderUpdate { .. } => Topic::NewOrderUpdate,
        }
    }

    pub fn order(&self) -> &Order {
        match self {
            OrderEvent::NewPendingOrder { order, .. }
            | OrderEvent::NewCookedOrder { order }
            | OrderEvent::NewOrderUpdate { order, .. } => order,
        }
    }
}
