//! User records and bearer-token lookup for the identity provider.

pub mod entity;
pub mod error;

pub use error::*;
