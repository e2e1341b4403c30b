//! Read-mostly restaurant and dish catalog consulted when pricing orders and
//! resolving restaurant ownership.

pub mod entity;
pub mod error;

pub use error::*;
