//! Token lifecycle module
//!
//! This module handles all token-related operations including:
//! - Signed claim encoding and decoding (HMAC only)
//! - Token issuance and persistence
//! - Verification against the store and the subject directory
//! - Blacklisting, refresh rotation and logout

mod codec;
mod config;
mod rotation;
mod service;

#[cfg(test)]
mod tests;

pub use codec::ClaimCodec;
pub use config::TokenServiceConfig;
pub use service::TokenService;
