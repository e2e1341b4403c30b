use thiserror::Error;
use crate::actor_framework::FrameworkError;
use crate::domain::{DishId, OrderId, OrderStatus, RestaurantId, UserRole};

/// Coarse classification of order failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    NotAuthorized,
    InvalidTransition,
    AlreadyClaimed,
    Conflict,
    PersistenceFailure,
}

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("The restaurant is not found: {0}")]
    RestaurantNotFound(RestaurantId),
    #[error("Couldn't find the dish: {0}")]
    DishNotFound(DishId),
    #[error("The order is not found: {0}")]
    OrderNotFound(OrderId),
    #[error("You're not authorized")]
    NotAuthorized,
    #[error("You can't edit the order: {role} may not set {status}")]
    CannotEditOrder { role: UserRole, status: OrderStatus },
    #[error("The order {0} is already taken by another driver")]
    OrderAlreadyTaken(OrderId),
    #[error("The order {order_id} was modified concurrently, it is now {current}")]
    OrderConflict { order_id: OrderId, current: OrderStatus },
    #[error("Couldn't create the order: {0}")]
    OrderCreationFailed(String),
    #[error("Order store error: {0}")]
    Persistence(String),
}

impl OrderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrderError::RestaurantNotFound(_)
            | OrderError::DishNotFound(_)
            | OrderError::OrderNotFound(_) => ErrorKind::NotFound,
            OrderError::NotAuthorized => ErrorKind::NotAuthorized,
            OrderError::CannotEditOrder { .. } => ErrorKind::InvalidTransition,
            OrderError::OrderAlreadyTaken(_) => ErrorKind::AlreadyClaimed,
            OrderError::OrderConflict { .. } => ErrorKind::Conflict,
            OrderError::OrderCreationFailed(_) | OrderError::Persistence(_) => {
                ErrorKind::PersistenceFailure
            }
        }
    }
}

impl From<FrameworkError> for OrderError {
    fn from(e: FrameworkError) -> Self {
        OrderError::Persistence(e.to_string())
    }
}
