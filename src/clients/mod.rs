//! Typed handles over the resource actors.

#[macro_use]
mod macros;

pub mod catalog_client;
pub mod order_client;
pub mod user_client;

pub use catalog_client::CatalogClient;
pub use order_client::OrderClient;
pub use user_client::UserClient;
