//! Token maintenance endpoints
//!
//! - Token refresh (rotation)
//! - Logout

pub mod logout;
pub mod refresh;

pub use logout::logout;
pub use refresh::refresh;
