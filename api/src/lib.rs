//! HTTP host for the TokenKeep token lifecycle engine
//!
//! - `sessions` - unit-of-work wrapped calls into the engine and access gate
//! - `transport` - cookie or bearer token extraction and delivery
//! - `middleware` - `CurrentSubject` / `AdminSubject` request extractors
//! - `routes` - `/auth/refresh`, `/auth/logout` and the protected demo routes

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod sessions;
pub mod transport;

pub use app::configure;
pub use sessions::{AuthSessions, TokenSessions};
