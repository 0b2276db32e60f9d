//! Access control on top of token verification

mod gate;


pub use gate::AccessGate;
