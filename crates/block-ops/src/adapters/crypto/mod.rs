//! Crypto Adapters
//!
//! Implementations of the `CryptoEngine` trait.

mod standard;

pub use standard::{CryptoConfig, StandardCrypto};
