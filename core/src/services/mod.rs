//! Business services containing the token lifecycle logic.

pub mod access;
pub mod clock;
pub mod token;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use access::AccessGate;
pub use clock::{Clock, FixedClock, SystemClock};
pub use token::{ClaimCodec, TokenService, TokenServiceConfig};
