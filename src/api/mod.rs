//! Resolver boundary: caller resolution, role guards, and the tagged result
//! shape returned to clients.

pub mod guard;
pub mod identity;
pub mod order_resolver;
pub mod output;

pub use guard::*;
pub use identity::*;
pub use order_resolver::*;
pub use output::*;
