//! System orchestration, configuration, startup, and shutdown logic.

pub mod config;
pub mod delivery_system;
pub mod error;
pub mod telemetry;

pub use config::*;
pub use delivery_system::*;
pub use error::*;
pub use telemetry::*;
