//! Order storage, pricing and the rules of the order state machine.

mod actions;
pub mod entity;
pub mod error;
pub mod pricing;
pub mod rules;

pub use actions::*;
pub use entity::OrderCriteria;
pub use error::*;
