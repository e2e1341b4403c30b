pub mod user;
pub mod restaurant;
pub mod order;

pub use user::*;
pub use restaurant::*;
pub use order::*;
