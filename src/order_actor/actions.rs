use crate::domain::{Order, OrderStatus, UserId};

/// Conditional updates applied to an order inside the order actor.
///
/// Each action checks its precondition and writes in the same step, so two
/// requests racing on one order are decided by arrival order at the actor.
#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Set the driver if, and only if, no driver is set yet.
    Claim { driver_id: UserId },
    /// Set the status if the order still has the status that was authorized.
    SetStatus { expected: OrderStatus, status: OrderStatus },
}

/// Results from OrderActions
#[derive(Debug, Clone, PartialEq)]
pub enum OrderActionResult {
    /// The claim went through; carries the updated order.
    Claimed(Order),
    /// Someone got there first.
    AlreadyTaken { driver_id: UserId },
    /// The status was written; carries the updated order.
    StatusSet(Order),
    /// The status moved since it was read.
    StatusChanged { current: OrderStatus },
}
